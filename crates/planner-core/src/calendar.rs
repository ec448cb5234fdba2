//! Calendar-month arithmetic on plain dates.
//!
//! Everything here works at calendar-day granularity: time-of-day and
//! timezones are resolved by the caller before a `NaiveDate` reaches this module.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Returns the first and last day of the month containing `reference`.
///
/// ## Errors
/// Returns `CoreError::InvalidInput` if the month end lies outside the
/// representable date range.
pub fn month_bounds(reference: NaiveDate) -> CoreResult<(NaiveDate, NaiveDate)> {
    let first = reference
        .with_day(1)
        .ok_or_else(|| CoreError::InvalidInput(format!("no first day for {reference}")))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| {
            CoreError::InvalidInput(format!("month of {reference} has no representable end"))
        })?;

    Ok((first, last))
}

/// ## Summary
/// Iterates every calendar day of the month containing `reference`, first to last.
///
/// ## Errors
/// Returns `CoreError::InvalidInput` if the month bounds cannot be computed.
pub fn month_days(reference: NaiveDate) -> CoreResult<impl Iterator<Item = NaiveDate>> {
    let (first, last) = month_bounds(reference)?;
    Ok(first.iter_days().take_while(move |day| *day <= last))
}

/// ## Summary
/// Parses a month selector: either `YYYY-MM` (resolved to day 1) or a full
/// `YYYY-MM-DD` date inside the month.
///
/// ## Errors
/// Returns `CoreError::InvalidInput` if `text` is neither form.
pub fn parse_month(text: &str) -> CoreResult<NaiveDate> {
    let text = text.trim();

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }

    NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d")
        .map_err(|err| CoreError::InvalidInput(format!("invalid month '{text}': {err}")))
}
