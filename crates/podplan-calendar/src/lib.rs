//! `podplan-calendar`: calendar grids and scheduler views over scheduled
//! episodes.
//!
//! # Overview
//!
//! The crate never talks to storage directly. Everything it shows is read
//! through the [`source::EpisodeSource`] port, so the same builders run
//! against SQLite in the gateway and against plain vectors in tests.
//!
//! | Builder                  | Output                                              |
//! |--------------------------|-----------------------------------------------------|
//! | [`grid::build_months`]   | Two consecutive month grids with episodes per cell  |
//! | [`views::build_view`]    | Day / week / month / year view with prev/next links |
//! | [`nav::CalendarNav`]     | Offset or explicit month decoded from query params  |

pub mod error;
pub mod grid;
pub mod nav;
pub mod source;
pub mod types;
pub mod views;

pub use error::{CalendarError, Result, SourceError};
pub use grid::build_months;
pub use nav::{CalendarNav, NavParams};
pub use source::EpisodeSource;
pub use types::{CalendarCell, MonthGrid, SchedulerView, ViewData, ViewMode};
pub use views::build_view;
