use podplan_core::YearMonth;
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

/// Raw calendar navigation query parameters, accepted on every page.
///
/// Kept as strings so a malformed value is reported by [`CalendarNav::from_params`]
/// instead of failing the whole query extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavParams {
    pub calnav: Option<String>,
    pub offset: Option<String>,
    pub jump_month: Option<String>,
    pub jump_year: Option<String>,
}

/// Which months the calendar sidebar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CalendarNav {
    /// Steps from the current month, see [`crate::grid::anchor_month`].
    /// Always 0 after a jump.
    pub offset: i32,
    pub jump: Option<YearMonth>,
}

impl CalendarNav {
    /// Decode `calnav` (`prev` | `next` | `jump`) together with the offset it
    /// is relative to. A `jump` without both month and year behaves like no
    /// navigation at all.
    pub fn from_params(params: &NavParams) -> Result<Self> {
        let offset = parse_param::<i32>("offset", params.offset.as_deref())?.unwrap_or(0);
        match params.calnav.as_deref() {
            Some("prev") => Ok(Self {
                offset: offset.saturating_sub(1),
                jump: None,
            }),
            Some("next") => Ok(Self {
                offset: offset.saturating_add(1),
                jump: None,
            }),
            Some("jump") => {
                let month = parse_param::<u32>("jump_month", params.jump_month.as_deref())?;
                let year = parse_param::<i32>("jump_year", params.jump_year.as_deref())?;
                match (year, month) {
                    (Some(year), Some(month)) => Ok(Self {
                        offset: 0,
                        jump: Some(YearMonth::new(year, month)?),
                    }),
                    _ => Ok(Self { offset, jump: None }),
                }
            }
            _ => Ok(Self { offset, jump: None }),
        }
    }
}

/// Blank counts as absent; anything else must parse.
fn parse_param<T: std::str::FromStr>(name: &'static str, raw: Option<&str>) -> Result<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| CalendarError::InvalidParam {
                name,
                value: value.to_string(),
            }),
    }
}
