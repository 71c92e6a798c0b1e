use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, summarizing or rendering a report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Input (or config) path does not resolve to a file
    #[error("NotFound: no such file: {}", .path.display())]
    NotFound { path: PathBuf },

    /// A required column is missing from the header
    #[error("SchemaError: {}: missing required column '{column}'", .path.display())]
    Schema { path: PathBuf, column: String },

    /// A required cell is not a number
    #[error(
        "ParseError: {}: column '{column}', data row {row}: '{token}' is not a number",
        .path.display()
    )]
    Parse {
        path: PathBuf,
        column: String,
        /// 1-based data row (the header is not counted)
        row: usize,
        token: String,
    },

    /// The CSV reader rejected the file structure (ragged rows, bad quoting)
    #[error("ParseError: {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },

    /// The input has a header but no data rows
    #[error("EmptyData: {}: no data rows", .path.display())]
    EmptyData { path: PathBuf },

    /// A table has fewer usable data points than an operation needs
    #[error("InsufficientData: {operation} needs at least {required} data point(s), found {found}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        found: usize,
    },

    /// Output not writable, or the drawing/encoding backend failed
    #[error("RenderError: {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    /// Config file unreadable or malformed
    #[error("ConfigError: {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

/// Failure kind, independent of the details carried by each error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    SchemaError,
    ParseError,
    EmptyData,
    InsufficientData,
    RenderError,
    ConfigError,
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::NotFound { .. } => ErrorKind::NotFound,
            ReportError::Schema { .. } => ErrorKind::SchemaError,
            ReportError::Parse { .. } | ReportError::Csv { .. } => ErrorKind::ParseError,
            ReportError::EmptyData { .. } => ErrorKind::EmptyData,
            ReportError::InsufficientData { .. } => ErrorKind::InsufficientData,
            ReportError::Render { .. } => ErrorKind::RenderError,
            ReportError::Config { .. } => ErrorKind::ConfigError,
        }
    }

    pub(crate) fn render(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ReportError::Render {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Type alias for Results using ReportError
pub type Result<T> = std::result::Result<T, ReportError>;
