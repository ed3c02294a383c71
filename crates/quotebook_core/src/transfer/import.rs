use crate::model::quote::Quote;
use crate::store::quote_store::QuoteStore;
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Whole-file import failures. The store is untouched in every case.
#[derive(Debug)]
pub enum ImportError {
    /// The document is not valid JSON.
    Parse(serde_json::Error),
    /// The document is valid JSON but not an array.
    Format(&'static str),
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "import file is not valid JSON: {err}"),
            Self::Format(found) => {
                write!(f, "import file must contain a JSON array, found {found}")
            }
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Format(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Skip entries whose text is already stored or appeared earlier in the file.
    pub skip_duplicates: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            skip_duplicates: true,
        }
    }
}

/// Per-entry accounting for one import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped_malformed: usize,
    pub skipped_duplicates: usize,
}

impl ImportReport {
    pub fn total_seen(&self) -> usize {
        self.imported + self.skipped_malformed + self.skipped_duplicates
    }
}

/// Reads an import file from disk.
pub fn read_import_file(path: impl AsRef<Path>) -> Result<String, ImportError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses `contents` and appends every well-formed entry to `store`.
///
/// Entries lacking a non-empty string `text` or `category` are skipped
/// silently; so are duplicates when `options.skip_duplicates` is set.
///
/// # Errors
/// - `Parse` for invalid JSON.
/// - `Format` when the top-level value is not an array.
pub fn import_quotes(
    store: &mut QuoteStore,
    contents: &str,
    options: ImportOptions,
) -> Result<ImportReport, ImportError> {
    let parsed: Value = serde_json::from_str(contents).map_err(|err| {
        warn!("event=quotes_import module=transfer status=error error_code=parse_failed");
        ImportError::Parse(err)
    })?;
    let entries = match parsed {
        Value::Array(entries) => entries,
        other => {
            warn!("event=quotes_import module=transfer status=error error_code=not_an_array");
            return Err(ImportError::Format(json_kind(&other)));
        }
    };

    let mut report = ImportReport::default();
    let mut seen: HashSet<String> = store.all().iter().map(|q| q.text.clone()).collect();

    for entry in &entries {
        let Some(quote) = quote_from_value(entry) else {
            report.skipped_malformed += 1;
            continue;
        };

        if options.skip_duplicates && !seen.insert(quote.text.clone()) {
            debug!("event=quote_import module=transfer status=skip reason=duplicate");
            report.skipped_duplicates += 1;
            continue;
        }
        store.push_unchecked(quote);
        report.imported += 1;
    }

    info!(
        "event=quotes_import module=transfer status=ok imported={} malformed={} duplicates={}",
        report.imported, report.skipped_malformed, report.skipped_duplicates
    );
    Ok(report)
}

fn quote_from_value(value: &Value) -> Option<Quote> {
    let object = value.as_object()?;
    let text = object.get("text")?.as_str()?;
    let category = object.get("category")?.as_str()?;
    let mut quote = Quote::new(text, category).ok()?;
    quote.id = object.get("id").and_then(Value::as_u64);
    Some(quote)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::quote_from_value;
    use serde_json::json;

    #[test]
    fn entries_need_string_text_and_category() {
        assert!(quote_from_value(&json!({"text": "a", "category": "b"})).is_some());
        assert!(quote_from_value(&json!({"text": "a"})).is_none());
        assert!(quote_from_value(&json!({"text": 1, "category": "b"})).is_none());
        assert!(quote_from_value(&json!({"text": "  ", "category": "b"})).is_none());
        assert!(quote_from_value(&json!("a string")).is_none());
    }

    #[test]
    fn numeric_id_is_preserved() {
        let quote = quote_from_value(&json!({"text": "a", "category": "b", "id": 4})).unwrap();
        assert_eq!(quote.id, Some(4));
    }
}
