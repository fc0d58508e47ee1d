use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("chart rendering failed: {0}")]
    Chart(String),
}

impl AppError {
    /// Process exit code reported by `main`.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Io(_) | AppError::Csv(_) => 2,
            AppError::Chart(_) => 3,
            AppError::Http(_) | AppError::Status { .. } => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
