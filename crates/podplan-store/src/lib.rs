//! `podplan-store`: SQLite persistence for podcasts and their scheduled
//! episodes.
//!
//! Run [`db::init_db`] once at startup, then hand the connection to a
//! [`CatalogStore`]. The store also implements
//! [`podplan_calendar::EpisodeSource`] so calendar views read straight from it.

pub mod catalog;
pub mod db;
pub mod error;

pub use catalog::CatalogStore;
pub use error::{Result, StoreError};
