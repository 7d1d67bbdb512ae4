use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Layouts accepted for a stored `scheduled_date`. Only the calendar date part
/// takes part in matching; the time of day is kept for display.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::invalid_date(input, "YYYY-MM-DD"))
}

/// Move `date` by `days` (negative goes backwards).
pub fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| CoreError::OutOfRange(format!("{date} {days:+} days")))
}

/// English month name, as shown in calendar headers.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    // Going back at most six days never leaves chrono's range in practice,
    // but stay total: fall back to the date itself.
    let back = date.weekday().num_days_from_monday() as i64;
    shift_days(date, -back).unwrap_or(date)
}

/// A calendar month, independent of any day within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidMonth(month));
        }
        let ym = Self { year, month };
        // Reject years chrono cannot represent.
        ym.first_day()?;
        Ok(ym)
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| CoreError::OutOfRange(format!("{}-{:02}", self.year, self.month)))
    }

    pub fn last_day(&self) -> Result<NaiveDate> {
        let next = self.shift(1)?.first_day()?;
        shift_days(next, -1)
    }

    /// Step by `months` calendar months, rolling the year over as needed.
    pub fn shift(&self, months: i32) -> Result<Self> {
        let index = self.year as i64 * 12 + (self.month as i64 - 1) + months as i64;
        let year = i32::try_from(index.div_euclid(12))
            .map_err(|_| CoreError::OutOfRange(format!("{self} {months:+} months")))?;
        let month = index.rem_euclid(12) as u32 + 1;
        let shifted = Self { year, month };
        shifted.first_day()?;
        Ok(shifted)
    }

    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parsed form of an episode's `scheduled_date` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledDate {
    pub date: NaiveDate,
    pub at: Option<NaiveDateTime>,
}

impl FromStr for ScheduledDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self { date, at: None });
        }
        DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|at| Self {
                date: at.date(),
                at: Some(at),
            })
            .ok_or_else(|| CoreError::invalid_date(s, "YYYY-MM-DD or YYYY-MM-DDTHH:MM"))
    }
}

/// Inclusive span of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Monday-to-Sunday week containing `date`.
    pub fn week_of(date: NaiveDate) -> Result<Self> {
        let start = week_start(date);
        Ok(Self {
            start,
            end: shift_days(start, 6)?,
        })
    }

    pub fn month(ym: YearMonth) -> Result<Self> {
        Ok(Self {
            start: ym.first_day()?,
            end: ym.last_day()?,
        })
    }

    pub fn year(year: i32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| CoreError::OutOfRange(year.to_string()))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| CoreError::OutOfRange(year.to_string()))?;
        Ok(Self { start, end })
    }

    /// Interpret a listing filter: `YYYY`, `YYYY-MM`, or a full date
    /// (optionally with a time, which is ignored).
    pub fn parse_filter(input: &str) -> Result<Self> {
        let s = input.trim();
        let digits = |part: &str, len: usize| part.len() == len && part.bytes().all(|b| b.is_ascii_digit());
        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [y] if digits(y, 4) => {
                let year = y.parse().map_err(|_| CoreError::invalid_date(s, "YYYY"))?;
                Self::year(year)
            }
            [y, m] if digits(y, 4) && digits(m, 2) => {
                let year = y.parse().map_err(|_| CoreError::invalid_date(s, "YYYY-MM"))?;
                let month = m.parse().map_err(|_| CoreError::invalid_date(s, "YYYY-MM"))?;
                Self::month(YearMonth::new(year, month)?)
            }
            _ => s
                .parse::<ScheduledDate>()
                .map(|sd| Self::day(sd.date))
                .map_err(|_| CoreError::invalid_date(s, "YYYY, YYYY-MM or YYYY-MM-DD")),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}
