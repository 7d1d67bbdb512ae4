//! `podplan-core`: domain types, date primitives and configuration shared by
//! every podplan crate.

pub mod config;
pub mod dates;
pub mod error;
pub mod types;

pub use dates::{DateRange, ScheduledDate, YearMonth};
pub use error::{CoreError, Result};
pub use types::{
    non_blank, Classification, Episode, EpisodeForm, EpisodeId, Podcast, PodcastForm, PodcastId,
};
