use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{input}': expected {expected}")]
    InvalidDate { input: String, expected: &'static str },

    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

impl CoreError {
    pub(crate) fn invalid_date(input: &str, expected: &'static str) -> Self {
        CoreError::InvalidDate {
            input: input.to_string(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
