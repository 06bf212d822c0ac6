use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid export header: {0}")]
    InvalidHeader(String),

    #[error("InfluxDB request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("InfluxDB rejected write (HTTP {status}): {message}")]
    WriteRejected { status: u16, message: String },

    #[error("Output write error: {0}")]
    Output(std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("File discovery error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    /// Errors from the write path abort the whole run; everything else
    /// only affects the file being imported.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProcessingError::Http(_)
                | ProcessingError::WriteRejected { .. }
                | ProcessingError::Output(_)
        )
    }
}
