use podplan_core::CoreError;
use thiserror::Error;

/// Failure reported by an [`crate::EpisodeSource`] implementation.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The episode collection has not been created yet.
    #[error("episode collection does not exist")]
    MissingCollection,

    #[error("episode source failed: {0}")]
    Backend(String),
}

/// Errors that can occur while building calendar grids and views.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Date arithmetic or parsing failed.
    #[error(transparent)]
    Date(#[from] CoreError),

    /// A navigation query parameter could not be parsed.
    #[error("Invalid navigation parameter {name}: {value:?}")]
    InvalidParam { name: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, CalendarError>;
