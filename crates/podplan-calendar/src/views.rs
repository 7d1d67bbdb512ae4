use chrono::{Datelike, NaiveDate};
use podplan_core::dates::{month_name, shift_days, weekday_name};
use podplan_core::{DateRange, YearMonth};
use tracing::debug;

use crate::{
    error::Result,
    grid::month_layout,
    source::{fetch_or_empty, EpisodeSource},
    types::{DayData, MonthData, SchedulerView, ViewData, ViewMode, WeekData, YearData},
};

/// Compute the scheduler page for `mode` around `selected`.
///
/// Every branch reads the episodes of its own date range through `source`
/// and derives the anchors the prev/next links point at.
pub fn build_view<S: EpisodeSource + ?Sized>(
    source: &S,
    mode: ViewMode,
    selected: NaiveDate,
) -> Result<SchedulerView> {
    let (range, calendar_data, prev_anchor, next_anchor) = match mode {
        ViewMode::Day => day_view(selected)?,
        ViewMode::Week => week_view(selected)?,
        ViewMode::Month => month_view(selected)?,
        ViewMode::Year => year_view(selected)?,
    };
    let episodes = fetch_or_empty(source, &range)?;
    debug!(%mode, %selected, episodes = episodes.len(), "scheduler view built");

    Ok(SchedulerView {
        mode,
        selected_date: selected,
        episodes,
        calendar_data,
        prev_anchor,
        next_anchor,
    })
}

type Branch = (DateRange, ViewData, NaiveDate, NaiveDate);

fn day_view(date: NaiveDate) -> Result<Branch> {
    let data = ViewData::Day(DayData {
        weekday: weekday_name(date.weekday()).to_string(),
        day: date.day(),
        month_name: month_name(date.month()).to_string(),
        date,
    });
    Ok((
        DateRange::day(date),
        data,
        shift_days(date, -1)?,
        shift_days(date, 1)?,
    ))
}

fn week_view(date: NaiveDate) -> Result<Branch> {
    let week = DateRange::week_of(date)?;
    let data = ViewData::Week(WeekData {
        week_number: date.iso_week().week(),
        month_name: month_name(date.month()).to_string(),
        week_days: week.days().collect(),
    });
    Ok((
        week,
        data,
        shift_days(week.start, -7)?,
        shift_days(week.start, 7)?,
    ))
}

fn month_view(date: NaiveDate) -> Result<Branch> {
    let ym = YearMonth::of(date);
    let data = ViewData::Month(MonthData {
        month_name: ym.name().to_string(),
        year: ym.year,
        weeks: month_layout(ym)?,
    });
    Ok((
        DateRange::month(ym)?,
        data,
        ym.shift(-1)?.first_day()?,
        ym.shift(1)?.first_day()?,
    ))
}

fn year_view(date: NaiveDate) -> Result<Branch> {
    let year = date.year();
    let months = (1..=12)
        .map(|m| YearMonth::new(year, m)?.first_day())
        .collect::<podplan_core::Result<Vec<_>>>()?;
    let jan_first = |y: i32| DateRange::year(y).map(|r| r.start);
    Ok((
        DateRange::year(year)?,
        ViewData::Year(YearData { year, months }),
        jan_first(year - 1)?,
        jan_first(year + 1)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use podplan_core::Episode;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ep(id: i64, date: &str) -> Episode {
        Episode {
            id,
            podcast_id: None,
            scheduled_date: date.to_string(),
            title: format!("Episode {id}"),
            kind: None,
            guest: None,
            theme: None,
            description: None,
            announcement: None,
        }
    }

    fn catalog() -> Vec<Episode> {
        vec![
            ep(1, "2023-12-31"),
            ep(2, "2024-01-01T09:00"),
            ep(3, "2024-03-10"),
            ep(4, "2024-03-11"),
            ep(5, "2024-03-15T20:00"),
            ep(6, "2024-03-17"),
            ep(7, "2024-03-18"),
            ep(8, "2024-06-10"),
            ep(9, "2025-01-01"),
        ]
    }

    fn ids(view: &SchedulerView) -> Vec<i64> {
        view.episodes.iter().map(|e| e.id).collect()
    }

    #[test]
    fn day_view_neighbours() {
        let d = ymd(2024, 3, 15);
        let view = build_view(&catalog(), ViewMode::Day, d).unwrap();
        assert_eq!(view.prev_anchor, ymd(2024, 3, 14));
        assert_eq!(view.next_anchor, ymd(2024, 3, 16));
        assert_eq!(ids(&view), vec![5]);

        let ViewData::Day(data) = &view.calendar_data else {
            panic!("expected day data");
        };
        assert_eq!(data.weekday, "Friday");
        assert_eq!(data.day, 15);
        assert_eq!(data.month_name, "March");
    }

    #[test]
    fn day_view_round_trips_across_boundaries() {
        for d in [ymd(2024, 2, 29), ymd(2023, 12, 31), ymd(2024, 1, 1), ymd(2024, 3, 15)] {
            let next = build_view(&catalog(), ViewMode::Day, d).unwrap().next_anchor;
            let back = build_view(&catalog(), ViewMode::Day, next).unwrap().prev_anchor;
            assert_eq!(back, d);
        }
    }

    #[test]
    fn week_view_starts_monday_and_is_consecutive() {
        let mut d = ymd(2024, 1, 1);
        while d < ymd(2024, 3, 1) {
            let view = build_view(&Vec::<Episode>::new(), ViewMode::Week, d).unwrap();
            let ViewData::Week(data) = &view.calendar_data else {
                panic!("expected week data");
            };
            assert_eq!(data.week_days.len(), 7);
            assert_eq!(data.week_days[0].weekday(), chrono::Weekday::Mon);
            assert!(data.week_days[0] <= d && d <= data.week_days[6]);
            for pair in data.week_days.windows(2) {
                assert_eq!(shift_days(pair[0], 1).unwrap(), pair[1]);
            }
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn week_view_episodes_and_anchors() {
        // Friday 2024-03-15: week runs Mon 11th to Sun 17th.
        let view = build_view(&catalog(), ViewMode::Week, ymd(2024, 3, 15)).unwrap();
        assert_eq!(ids(&view), vec![4, 5, 6]);
        assert_eq!(view.prev_anchor, ymd(2024, 3, 4));
        assert_eq!(view.next_anchor, ymd(2024, 3, 18));
        let ViewData::Week(data) = &view.calendar_data else {
            panic!("expected week data");
        };
        assert_eq!(data.week_number, 11);
        assert_eq!(data.month_name, "March");
    }

    #[test]
    fn month_view_rolls_over_years() {
        let jan = build_view(&catalog(), ViewMode::Month, ymd(2024, 1, 1)).unwrap();
        assert_eq!(jan.prev_anchor, ymd(2023, 12, 1));
        assert_eq!(jan.next_anchor, ymd(2024, 2, 1));
        assert_eq!(ids(&jan), vec![2]);

        let dec = build_view(&catalog(), ViewMode::Month, ymd(2024, 12, 1)).unwrap();
        assert_eq!(dec.prev_anchor, ymd(2024, 11, 1));
        assert_eq!(dec.next_anchor, ymd(2025, 1, 1));
        assert!(dec.episodes.is_empty());
    }

    #[test]
    fn month_view_carries_raw_grid() {
        let view = build_view(&catalog(), ViewMode::Month, ymd(2024, 3, 20)).unwrap();
        assert_eq!(ids(&view), vec![3, 4, 5, 6, 7]);
        let ViewData::Month(data) = &view.calendar_data else {
            panic!("expected month data");
        };
        assert_eq!(data.month_name, "March");
        assert_eq!(data.year, 2024);
        assert_eq!(data.weeks, month_layout(YearMonth::new(2024, 3).unwrap()).unwrap());
    }

    #[test]
    fn year_view_lists_month_anchors() {
        let view = build_view(&catalog(), ViewMode::Year, ymd(2024, 6, 10)).unwrap();
        assert_eq!(view.prev_anchor, ymd(2023, 1, 1));
        assert_eq!(view.next_anchor, ymd(2025, 1, 1));
        assert_eq!(ids(&view), vec![2, 3, 4, 5, 6, 7, 8]);

        let ViewData::Year(data) = &view.calendar_data else {
            panic!("expected year data");
        };
        assert_eq!(data.year, 2024);
        assert_eq!(data.months.len(), 12);
        for (i, first) in data.months.iter().enumerate() {
            assert_eq!(*first, ymd(2024, i as u32 + 1, 1));
        }
    }

    #[test]
    fn unknown_mode_falls_back_to_month() {
        assert_eq!(ViewMode::from_param(Some("fortnight")), ViewMode::Month);
        assert_eq!(ViewMode::from_param(None), ViewMode::Month);
        assert_eq!(ViewMode::from_param(Some("WEEK")), ViewMode::Week);
    }

    #[test]
    fn view_serializes_for_renderers() {
        let view = build_view(&catalog(), ViewMode::Day, ymd(2024, 3, 15)).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["mode"], "day");
        assert_eq!(json["prev_anchor"], "2024-03-14");
        assert_eq!(json["calendar_data"]["weekday"], "Friday");
        assert_eq!(json["episodes"][0]["scheduled_date"], "2024-03-15T20:00");
    }
}
