use axum::{response::Redirect, Json};
use chrono::{Local, NaiveDate};
use podplan_calendar::{build_months, CalendarNav, MonthGrid, NavParams};
use serde::Serialize;

use super::{calendar_error, HandlerResult};
use crate::app::AppState;

/// Envelope of every page: the page's own data plus the two-month calendar
/// sidebar, the offset it was built for and today's date.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub page: T,
    pub calendar_months: Vec<MonthGrid>,
    pub offset: i32,
    pub today: NaiveDate,
}

/// Wrap `page` with the calendar selected by the `calnav`, `offset`,
/// `jump_month` and `jump_year` query parameters.
pub fn render<T: Serialize>(state: &AppState, nav: &NavParams, page: T) -> HandlerResult<Json<Page<T>>> {
    let nav = CalendarNav::from_params(nav).map_err(calendar_error)?;
    let today = today();
    let calendar_months =
        build_months(&state.catalog, today, nav.offset, nav.jump).map_err(calendar_error)?;

    Ok(Json(Page {
        page,
        calendar_months,
        offset: nav.offset,
        today,
    }))
}

/// 303 to `path` under the configured mount point.
pub fn redirect(state: &AppState, path: &str) -> Redirect {
    Redirect::to(&mounted(&state.config.gateway.mount_path(), path))
}

fn mounted(mount: &str, path: &str) -> String {
    match (mount, path) {
        ("", _) => path.to_string(),
        (_, "/") => mount.to_string(),
        _ => format!("{mount}{path}"),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
