use chrono::NaiveDate;
use podplan_core::{Classification, Episode, EpisodeId};
use serde::{Deserialize, Serialize};

/// One day slot of a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    /// `None` for slots padding a week that starts or ends outside the month.
    pub date: Option<NaiveDate>,
    pub info: Classification,
    /// Title of the episode shown in this cell, empty when there is none.
    pub episode: String,
    pub episode_id: Option<EpisodeId>,
    /// Further episodes scheduled on the same date that the cell does not show.
    pub also_scheduled: usize,
}

impl CalendarCell {
    pub fn padding() -> Self {
        Self {
            date: None,
            info: Classification::None,
            episode: String::new(),
            episode_id: None,
            also_scheduled: 0,
        }
    }

    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::padding()
        }
    }
}

/// A month laid out as Monday-first weeks of seven cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<CalendarCell>>,
}

/// Granularity of the scheduler view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl ViewMode {
    /// Unknown or missing modes fall back to the month view.
    pub fn from_param(param: Option<&str>) -> Self {
        param.and_then(|p| p.parse().ok()).unwrap_or_default()
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ViewMode::Day => "day",
            ViewMode::Week => "week",
            ViewMode::Month => "month",
            ViewMode::Year => "year",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(ViewMode::Day),
            "week" => Ok(ViewMode::Week),
            "month" => Ok(ViewMode::Month),
            "year" => Ok(ViewMode::Year),
            other => Err(format!("unknown view mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayData {
    pub weekday: String,
    pub day: u32,
    pub month_name: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekData {
    /// ISO-8601 week number of the selected date.
    pub week_number: u32,
    pub month_name: String,
    pub week_days: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthData {
    pub month_name: String,
    pub year: i32,
    /// Raw Monday-first date grid; `None` pads days outside the month.
    pub weeks: Vec<Vec<Option<NaiveDate>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearData {
    pub year: i32,
    /// First day of each month, January through December.
    pub months: Vec<NaiveDate>,
}

/// Mode-specific payload of a [`SchedulerView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ViewData {
    Day(DayData),
    Week(WeekData),
    Month(MonthData),
    Year(YearData),
}

/// Everything a renderer needs to draw one scheduler page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerView {
    pub mode: ViewMode,
    pub selected_date: NaiveDate,
    pub episodes: Vec<Episode>,
    pub calendar_data: ViewData,
    pub prev_anchor: NaiveDate,
    pub next_anchor: NaiveDate,
}
