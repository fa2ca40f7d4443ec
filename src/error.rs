use std::fmt;
use std::io;

use polars::error::PolarsError;
use tracing_error::SpanTrace;

#[derive(Debug)]
pub enum ViewerError {
    IoError(io::Error),
    PolarsError(PolarsError),
    LoadingFailed(String, SpanTrace),
    FileNotFound(String),
    PermissionDenied(String),
    UnknownFileType(String),
}

impl ViewerError {
    pub fn loading_failed(reason: impl Into<String>) -> Self {
        ViewerError::LoadingFailed(reason.into(), SpanTrace::capture())
    }
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::IoError(e) => write!(f, "I/O error: {e}"),
            ViewerError::PolarsError(e) => write!(f, "Could not read data: {e}"),
            ViewerError::LoadingFailed(reason, trace) => {
                write!(f, "Loading failed: {reason}")?;
                write!(f, "\n{trace}")
            }
            ViewerError::FileNotFound(path) => write!(f, "File not found: {path}"),
            ViewerError::PermissionDenied(path) => write!(f, "Permission denied: {path}"),
            ViewerError::UnknownFileType(path) => write!(f, "Unknown file type: {path}"),
        }
    }
}

impl std::error::Error for ViewerError {}

impl From<io::Error> for ViewerError {
    fn from(err: io::Error) -> Self {
        ViewerError::IoError(err)
    }
}

impl From<PolarsError> for ViewerError {
    fn from(err: PolarsError) -> Self {
        ViewerError::PolarsError(err)
    }
}
