//! # Calendar Helpers
//!
//! Month lengths (leap-aware, via chrono) and Portuguese month names for the
//! monthly presenter and PDF filenames.

use chrono::{Datelike, NaiveDate};

use crate::error::{CoreError, CoreResult};

/// Portuguese month names, capitalized, indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Returns the capitalized Portuguese name for a month (1-12).
pub fn month_name(month: u32) -> CoreResult<&'static str> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::InvalidMonth(month));
    }
    Ok(MONTH_NAMES[(month - 1) as usize])
}

/// Returns the number of days in a (year, month), accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> CoreResult<u32> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::InvalidMonth(month));
    }
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(CoreError::InvalidMonth(month))?;

    Ok(next_first.pred_opt().map(|d| d.day()).unwrap_or(31))
}

/// Iterates every calendar date of a (year, month), in order.
pub fn month_dates(year: i32, month: u32) -> CoreResult<Vec<NaiveDate>> {
    let count = days_in_month(year, month)?;
    let mut dates = Vec::with_capacity(count as usize);
    for day in 1..=count {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            dates.push(date);
        }
    }
    Ok(dates)
}

/// First and last date of a (year, month), for range queries.
pub fn month_bounds(year: i32, month: u32) -> CoreResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(CoreError::InvalidMonth(month))?;
    let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)
        .ok_or(CoreError::InvalidMonth(month))?;
    Ok((first, last))
}

// =============================================================================
// Unit Tests
// =============================================================================
