//! Month expansion of planner events into concrete calendar occurrences.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use planner_core::calendar::month_days;
use planner_core::error::CoreResult;
use serde::Serialize;
use uuid::Uuid;

use super::model::{Event, Recurrence};

/// One calendar-day appearance of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence<'a> {
    pub event: &'a Event,
    pub date: NaiveDate,
}

impl Recurrence {
    /// ## Summary
    /// Decides whether a rule anchored on `anchor` lands on `day`.
    ///
    /// Days before the anchor never match. Monthly rules do not clamp: an
    /// anchor on the 31st skips months without a 31st.
    #[must_use]
    pub fn occurs_on(self, anchor: NaiveDate, day: NaiveDate) -> bool {
        if day < anchor {
            return false;
        }

        match self {
            Self::Once => day == anchor,
            Self::Daily => true,
            Self::DailyExceptSundays => day.weekday() != Weekday::Sun,
            Self::Weekly => day.weekday() == anchor.weekday(),
            Self::Weekends => matches!(day.weekday(), Weekday::Sat | Weekday::Sun),
            Self::Monthly => day.day() == anchor.day(),
            Self::Unrecognized => false,
        }
    }
}

/// ## Summary
/// Expands `owner_id`'s events into every occurrence that lands in the month
/// containing `reference`.
///
/// `events` is the unfiltered collection; ownership filtering happens here.
/// A `once` event anchored strictly before `today` produces nothing, even when
/// its anchor falls inside the requested month. Recurring rules have no end.
/// Events with an unparseable anchor or an unrecognised rule are skipped.
///
/// The result is ordered by event, then by day. Callers that need per-day
/// grouping use [`group_by_day`].
///
/// ## Errors
/// Returns `CoreError::InvalidInput` if the month of `reference` cannot be
/// bounded.
#[tracing::instrument(skip(events), fields(occurrences = tracing::field::Empty))]
pub fn expand_occurrences<'a, I>(
    reference: NaiveDate,
    owner_id: Uuid,
    events: I,
    today: NaiveDate,
) -> CoreResult<Vec<Occurrence<'a>>>
where
    I: IntoIterator<Item = &'a Event>,
{
    let days: Vec<NaiveDate> = month_days(reference)?.collect();
    let Some(&last) = days.last() else {
        return Ok(Vec::new());
    };

    let mut occurrences = Vec::new();

    for event in events.into_iter().filter(|event| event.owner_id == owner_id) {
        let Some(anchor) = event.anchor_day() else {
            tracing::warn!(
                event_id = %event.id,
                anchor_date = %event.anchor_date,
                "Skipping event with unparseable anchor date"
            );
            continue;
        };

        if !event.recurrence.is_recognized() {
            tracing::debug!(event_id = %event.id, "Skipping event with unrecognised recurrence");
            continue;
        }

        if event.recurrence == Recurrence::Once && anchor < today {
            tracing::trace!(event_id = %event.id, %anchor, %today, "One-off event already passed");
            continue;
        }

        if anchor > last {
            continue;
        }

        occurrences.extend(
            days.iter()
                .copied()
                .filter(|day| event.recurrence.occurs_on(anchor, *day))
                .map(|date| Occurrence { event, date }),
        );
    }

    tracing::Span::current().record("occurrences", occurrences.len());

    Ok(occurrences)
}

/// ## Summary
/// Re-groups occurrences by exact day, in day order.
#[must_use]
pub fn group_by_day<'a>(occurrences: &[Occurrence<'a>]) -> BTreeMap<NaiveDate, Vec<&'a Event>> {
    let mut days: BTreeMap<NaiveDate, Vec<&'a Event>> = BTreeMap::new();
    for occurrence in occurrences {
        days.entry(occurrence.date)
            .or_default()
            .push(occurrence.event);
    }
    days
}
