use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cannot resolve '{location}': {reason}")]
    PathResolution { location: String, reason: String },
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
impl SourceError {
    /// The underlying I/O error kind, if this was a read failure.
    pub(crate) fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            SourceError::Io { source, .. } => Some(source.kind()),
            SourceError::PathResolution { .. } => None,
        }
    }
}
