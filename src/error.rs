use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local read failure (uploaded or on-disk CSV)
    #[error("Failed to read file: {0}")]
    Io(String),

    /// Transport failure before any HTTP status was received
    #[error("Network error: {0}")]
    Network(String),

    /// CSV resource missing at the resolved public path
    #[error("CSV file not found, make sure {path} is placed in the public directory")]
    CsvNotFound { path: String },

    /// Any other non-success HTTP response
    #[error("Failed to load data (HTTP status: {status})")]
    Fetch { status: u16 },

    /// First tabular error; `row` is the 1-based data row, 0 for the header
    #[error("CSV parse error: {message} (row: {row})")]
    Parse { message: String, row: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn parse(message: impl Into<String>, row: usize) -> Self {
        AppError::Parse {
            message: message.into(),
            row,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AppError::Fetch {
                status: status.as_u16(),
            },
            None => AppError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// Alias for convenience
pub type Error = AppError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let not_found = AppError::CsvNotFound {
            path: "/stock.csv".to_string(),
        };
        assert!(not_found.to_string().contains("/stock.csv"));

        let fetch = AppError::Fetch { status: 500 };
        assert!(fetch.to_string().contains("500"));

        let parse = AppError::parse("found record with 2 fields", 3);
        assert_eq!(
            parse.to_string(),
            "CSV parse error: found record with 2 fields (row: 3)"
        );
    }

    #[test]
    fn test_io_error_keeps_low_level_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: AppError = io.into();
        assert_eq!(err.to_string(), "Failed to read file: no such file");
    }
}
