use plainload_source::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Compile error in {name}: {message}")]
    Compile { name: String, message: String },
    #[error("Runtime error in {name}: {message}")]
    Runtime { name: String, message: String },
    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),
}

/// Coarse failure category, for callers that branch on what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PathResolution,
    Io,
    Compile,
    Runtime,
    Lua,
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Source(SourceError::PathResolution { .. }) => ErrorKind::PathResolution,
            LoadError::Source(SourceError::Io { .. }) => ErrorKind::Io,
            LoadError::Compile { .. } => ErrorKind::Compile,
            LoadError::Runtime { .. } => ErrorKind::Runtime,
            LoadError::Lua(_) => ErrorKind::Lua,
        }
    }
}
