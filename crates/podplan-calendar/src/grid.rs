use std::collections::HashMap;

use chrono::NaiveDate;
use podplan_core::dates::{shift_days, week_start};
use podplan_core::{DateRange, Episode, YearMonth};
use tracing::debug;

use crate::{
    error::Result,
    source::{fetch_or_empty, EpisodeSource},
    types::{CalendarCell, MonthGrid},
};

/// Number of consecutive months rendered by the calendar sidebar.
pub const MONTHS_SHOWN: i32 = 2;

/// Monday-first weeks covering `ym`. Days belonging to neighbouring months
/// are `None`, so every row has exactly seven slots.
pub fn month_layout(ym: YearMonth) -> Result<Vec<Vec<Option<NaiveDate>>>> {
    let first = ym.first_day()?;
    let last = ym.last_day()?;
    let span = DateRange {
        start: week_start(first),
        end: shift_days(week_start(last), 6)?,
    };

    let days: Vec<Option<NaiveDate>> = span
        .days()
        .map(|d| (YearMonth::of(d) == ym).then_some(d))
        .collect();
    Ok(days.chunks(7).map(<[_]>::to_vec).collect())
}

/// Days covered by one `offset` step of the sidebar navigation.
pub const OFFSET_STEP_DAYS: i64 = 32;

/// First month shown for a relative `offset` from the month containing `today`.
///
/// The anchor is the month of `first-of-this-month + 32 * offset days`. This
/// is not calendar month arithmetic: from March, `-1` lands in January and
/// large offsets drift ahead of `YearMonth::shift`. Existing `offset` links
/// depend on exactly these months.
pub fn anchor_month(today: NaiveDate, offset: i32) -> Result<YearMonth> {
    let first = YearMonth::of(today).first_day()?;
    let landed = shift_days(first, OFFSET_STEP_DAYS * i64::from(offset))?;
    Ok(YearMonth::of(landed))
}

/// Build the anchor month and the one after it, each cell annotated with the
/// episode scheduled on that date.
///
/// An explicit `jump` month overrides `offset` entirely.
pub fn build_months<S: EpisodeSource + ?Sized>(
    source: &S,
    today: NaiveDate,
    offset: i32,
    jump: Option<YearMonth>,
) -> Result<Vec<MonthGrid>> {
    let anchor = match jump {
        Some(ym) => ym,
        None => anchor_month(today, offset)?,
    };
    (0..MONTHS_SHOWN)
        .map(|i| build_month(source, anchor.shift(i)?))
        .collect()
}

/// Build a single annotated month grid.
pub fn build_month<S: EpisodeSource + ?Sized>(source: &S, ym: YearMonth) -> Result<MonthGrid> {
    let range = DateRange::month(ym)?;
    let episodes = fetch_or_empty(source, &range)?;
    let by_date = index_by_date(&episodes);
    debug!(month = %ym, episodes = episodes.len(), "building month grid");

    let weeks = month_layout(ym)?
        .into_iter()
        .map(|week| {
            week.into_iter()
                .map(|slot| match slot {
                    None => CalendarCell::padding(),
                    Some(date) => match by_date.get(&date) {
                        Some(&(ep, count)) => CalendarCell {
                            date: Some(date),
                            info: ep.classification(),
                            episode: ep.title.clone(),
                            episode_id: Some(ep.id),
                            also_scheduled: count - 1,
                        },
                        None => CalendarCell::empty(date),
                    },
                })
                .collect()
        })
        .collect();

    Ok(MonthGrid {
        name: ym.name().to_string(),
        year: ym.year,
        month: ym.month,
        weeks,
    })
}

/// Map each date to the episode displayed for it and the number of episodes
/// sharing that date. The last episode in source order is the one displayed.
fn index_by_date(episodes: &[Episode]) -> HashMap<NaiveDate, (&Episode, usize)> {
    let mut by_date: HashMap<NaiveDate, (&Episode, usize)> = HashMap::new();
    for ep in episodes {
        let Some(scheduled) = ep.scheduled() else {
            continue;
        };
        by_date
            .entry(scheduled.date)
            .and_modify(|(shown, count)| {
                *shown = ep;
                *count += 1;
            })
            .or_insert((ep, 1));
    }
    by_date
}
