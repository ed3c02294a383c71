//! Line commands understood by the interactive session.

use quotebook_core::Resolution;
use std::path::PathBuf;

pub const HELP_TEXT: &str = "\
commands:
  show                         show a random quote from the selected category
  add <text> | <category>      add a quote
  categories                   list categories (* marks the selection)
  filter <category|all>        select a category and show a quote from it
  export [dir]                 write quotes.json
  import <path>                import quotes from a JSON file
  sync                         run a sync cycle now
  conflicts                    list conflicts awaiting a decision
  resolve <n> local|remote     settle conflict #n
  status                       show sync status
  help                         show this text
  quit                         leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Add { text: String, category: String },
    Categories,
    Filter(String),
    Export(Option<PathBuf>),
    Import(PathBuf),
    Sync,
    Conflicts,
    Resolve { position: usize, resolution: Resolution },
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line; `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));

        let command = match name.to_ascii_lowercase().as_str() {
            "show" | "new" => Self::Show,
            "add" => {
                let (text, category) = rest
                    .rsplit_once('|')
                    .ok_or_else(|| "usage: add <text> | <category>".to_string())?;
                Self::Add {
                    text: text.trim().to_string(),
                    category: category.trim().to_string(),
                }
            }
            "categories" | "cats" => Self::Categories,
            "filter" => Self::Filter(rest.to_string()),
            "export" => Self::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "import" => {
                if rest.is_empty() {
                    return Err("usage: import <path>".to_string());
                }
                Self::Import(PathBuf::from(rest))
            }
            "sync" => Self::Sync,
            "conflicts" => Self::Conflicts,
            "resolve" => parse_resolve(rest)?,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command `{other}`; type `help`")),
        };
        Ok(Some(command))
    }
}

fn parse_resolve(rest: &str) -> Result<Command, String> {
    const USAGE: &str = "usage: resolve <n> local|remote";
    let mut parts = rest.split_whitespace();
    let position = parts
        .next()
        .and_then(|value| value.trim_start_matches('#').parse::<usize>().ok())
        .ok_or_else(|| USAGE.to_string())?;
    let resolution = parts
        .next()
        .and_then(Resolution::parse)
        .ok_or_else(|| USAGE.to_string())?;
    Ok(Command::Resolve {
        position,
        resolution,
    })
}
