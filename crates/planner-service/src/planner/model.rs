use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

/// Named pattern deciding which calendar days an event occupies.
///
/// Tags outside the known set deserialize to `Unrecognized` so that a single
/// bad document does not fail a whole store read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recurrence {
    Once,
    Daily,
    DailyExceptSundays,
    Weekly,
    Weekends,
    Monthly,
    #[serde(other)]
    Unrecognized,
}

impl Recurrence {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Daily => "daily",
            Self::DailyExceptSundays => "daily-except-sundays",
            Self::Weekly => "weekly",
            Self::Weekends => "weekends",
            Self::Monthly => "monthly",
            Self::Unrecognized => "unrecognized",
        }
    }

    #[must_use]
    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A base planner event as stored in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Raw anchor as stored; see [`Event::anchor_day`].
    pub anchor_date: String,
    pub recurrence: Recurrence,
    /// User the event is scheduled for.
    pub owner_id: Uuid,
    /// User who authored the event.
    pub creator_id: Uuid,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// ## Summary
    /// Calendar day of the anchor, with any time-of-day discarded.
    ///
    /// Returns `None` when the stored anchor cannot be parsed.
    #[must_use]
    pub fn anchor_day(&self) -> Option<NaiveDate> {
        parse_anchor(&self.anchor_date)
    }
}

/// ## Summary
/// Parses an anchor document value down to its calendar day.
///
/// Accepts `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM[:SS]`, or an RFC 3339
/// timestamp. RFC 3339 values keep the date in their own offset.
#[must_use]
pub fn parse_anchor(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// A note left on an event, optionally pinned to one occurrence day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    #[serde(default)]
    pub occurrence_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
}

/// Create-event payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub anchor_date: String,
    pub recurrence: Recurrence,
    pub owner_id: Uuid,
    pub creator_id: Uuid,
}

impl NewEvent {
    /// ## Summary
    /// Checks the payload and returns the parsed anchor day.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` for an empty title, an
    /// unrecognised recurrence tag, or an unparseable anchor.
    pub fn validate(&self) -> ServiceResult<NaiveDate> {
        validate_title(&self.title)?;
        validate_recurrence(self.recurrence)?;
        parse_anchor(&self.anchor_date).ok_or_else(|| {
            ServiceError::ValidationError(format!("invalid anchor date '{}'", self.anchor_date))
        })
    }
}

/// Edit-event payload.
///
/// The anchor is not editable: moving an event to a new anchor goes through
/// a reschedule, which replaces the event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub owner_id: Option<Uuid>,
}

impl EventPatch {
    /// ## Errors
    /// Returns `ServiceError::ValidationError` for an empty title or an
    /// unrecognised recurrence tag.
    pub fn validate(&self) -> ServiceResult<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(recurrence) = self.recurrence {
            validate_recurrence(recurrence)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.recurrence.is_none()
            && self.owner_id.is_none()
    }

    pub fn apply(self, event: &mut Event, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            event.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(recurrence) = self.recurrence {
            event.recurrence = recurrence;
        }
        if let Some(owner_id) = self.owner_id {
            event.owner_id = owner_id;
        }
        event.updated_at = now;
    }
}

/// Add-comment payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub author_id: Uuid,
    pub text: String,
    #[serde(default)]
    pub occurrence_date: Option<NaiveDate>,
}

fn validate_title(title: &str) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "title must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_recurrence(recurrence: Recurrence) -> ServiceResult<()> {
    if !recurrence.is_recognized() {
        return Err(ServiceError::ValidationError(
            "recurrence must be one of once, daily, daily-except-sundays, weekly, weekends, monthly"
                .to_string(),
        ));
    }
    Ok(())
}
