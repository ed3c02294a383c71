use crate::store::quote_store::QuoteStore;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name offered for downloads.
pub const EXPORT_FILE_NAME: &str = "quotes.json";
/// Media type of the exported document.
pub const EXPORT_MIME_TYPE: &str = "application/json";

#[derive(Debug)]
pub enum ExportError {
    Serialize(serde_json::Error),
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to serialize quotes: {err}"),
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Serializes every quote as an indented JSON array.
pub fn export_quotes(store: &QuoteStore) -> Result<String, ExportError> {
    serde_json::to_string_pretty(store.all()).map_err(ExportError::Serialize)
}

/// Writes `quotes.json` into `dir` and returns the written path.
pub fn write_export(store: &QuoteStore, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    let path = dir.join(EXPORT_FILE_NAME);
    let body = export_quotes(store)?;

    std::fs::create_dir_all(dir)
        .and_then(|()| std::fs::write(&path, body.as_bytes()))
        .map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

    info!(
        "event=quotes_export module=transfer status=ok count={} bytes={} mime={} path={}",
        store.len(),
        body.len(),
        EXPORT_MIME_TYPE,
        path.display()
    );
    Ok(path)
}
