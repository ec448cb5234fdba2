//! Planner operations over an [`EventRepository`].

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::clock::Clock;
use super::model::{Comment, Event, EventPatch, NewComment, NewEvent, parse_anchor};
use super::recurrence::{Occurrence, expand_occurrences, group_by_day};
use super::repository::{EventChange, EventRepository};
use crate::error::{ServiceError, ServiceResult};

/// Owned occurrence, safe to hand across an `await` or serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccurrenceView {
    pub date: NaiveDate,
    pub event: Event,
}

impl From<Occurrence<'_>> for OccurrenceView {
    fn from(occurrence: Occurrence<'_>) -> Self {
        Self {
            date: occurrence.date,
            event: occurrence.event.clone(),
        }
    }
}

/// All events landing on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaDay {
    pub date: NaiveDate,
    pub events: Vec<Event>,
}

/// Occurrences of one month together with the day the past-`once` filter
/// treated as today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOccurrences {
    pub today: NaiveDate,
    pub occurrences: Vec<OccurrenceView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthAgenda {
    pub today: NaiveDate,
    pub days: Vec<AgendaDay>,
}

/// Application state for the planner: the event store, the clock that
/// decides "today", and the zone "today" is computed in.
pub struct PlannerService {
    repository: Arc<dyn EventRepository>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl PlannerService {
    #[must_use]
    pub fn new(repository: Arc<dyn EventRepository>, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self {
            repository,
            clock,
            timezone,
        }
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today(self.timezone)
    }

    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventChange> {
        self.repository.subscribe()
    }

    /// ## Summary
    /// Occurrences of `owner_id`'s events in the month containing `reference`,
    /// sorted by day then title.
    ///
    /// ## Errors
    /// Returns an error if the store cannot be read or the month cannot be bounded.
    #[tracing::instrument(skip(self))]
    pub async fn month_occurrences(
        &self,
        owner_id: Uuid,
        reference: NaiveDate,
    ) -> ServiceResult<MonthOccurrences> {
        let events = self.repository.list_events().await?;
        let today = self.today();

        let mut views: Vec<OccurrenceView> = expand_occurrences(reference, owner_id, &events, today)?
            .into_iter()
            .map(OccurrenceView::from)
            .collect();
        views.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.event.title.cmp(&b.event.title))
        });

        tracing::debug!(count = views.len(), %today, "Expanded month occurrences");

        Ok(MonthOccurrences {
            today,
            occurrences: views,
        })
    }

    /// ## Summary
    /// Same occurrences as [`Self::month_occurrences`], grouped per day. Days
    /// without occurrences are omitted.
    ///
    /// ## Errors
    /// Returns an error if the store cannot be read or the month cannot be bounded.
    #[tracing::instrument(skip(self))]
    pub async fn month_agenda(
        &self,
        owner_id: Uuid,
        reference: NaiveDate,
    ) -> ServiceResult<MonthAgenda> {
        let events = self.repository.list_events().await?;
        let today = self.today();
        let occurrences = expand_occurrences(reference, owner_id, &events, today)?;

        let days = group_by_day(&occurrences)
            .into_iter()
            .map(|(date, events)| {
                let mut events: Vec<Event> = events.into_iter().cloned().collect();
                events.sort_by(|a, b| a.title.cmp(&b.title));
                AgendaDay { date, events }
            })
            .collect();

        Ok(MonthAgenda { today, days })
    }

    /// ## Errors
    /// Returns an error if the store cannot be read.
    pub async fn list_events(&self, owner_id: Option<Uuid>) -> ServiceResult<Vec<Event>> {
        let mut events = match owner_id {
            Some(owner_id) => self.repository.list_events_for_owner(owner_id).await?,
            None => self.repository.list_events().await?,
        };
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` if no event has this id.
    pub async fn get_event(&self, id: Uuid) -> ServiceResult<Event> {
        self.repository.get_event(id).await
    }

    /// ## Summary
    /// Validates and stores a new event. The anchor is normalised to `YYYY-MM-DD`.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` for an invalid payload, or a
    /// store error.
    #[tracing::instrument(skip(self, new_event), fields(owner_id = %new_event.owner_id))]
    pub async fn create_event(&self, new_event: NewEvent) -> ServiceResult<Event> {
        let anchor = new_event.validate()?;
        let now = self.clock.now_utc();

        let event = Event {
            id: Uuid::now_v7(),
            title: new_event.title.trim().to_string(),
            description: new_event.description,
            anchor_date: anchor.to_string(),
            recurrence: new_event.recurrence,
            owner_id: new_event.owner_id,
            creator_id: new_event.creator_id,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let event = self.repository.insert_event(event).await?;
        tracing::info!(event_id = %event.id, recurrence = %event.recurrence, "Event created");
        Ok(event)
    }

    /// ## Summary
    /// Applies an edit. The anchor cannot be changed here; see
    /// [`Self::reschedule_event`].
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` for an empty or invalid patch,
    /// `ServiceError::NotFound` for an unknown id.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_event(&self, id: Uuid, patch: EventPatch) -> ServiceResult<Event> {
        if patch.is_empty() {
            return Err(ServiceError::ValidationError(
                "patch does not change anything".to_string(),
            ));
        }
        patch.validate()?;

        let now = self.clock.now_utc();
        let event = self
            .repository
            .modify_event(id, Box::new(move |event: &mut Event| patch.apply(event, now)))
            .await?;
        tracing::info!(event_id = %event.id, "Event updated");
        Ok(event)
    }

    /// ## Summary
    /// Moves an event to a new anchor by replacing it: a new event with a new id
    /// carries over every other field (comments included) and the old event is
    /// removed in the same store write.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` for an unparseable anchor,
    /// `ServiceError::NotFound` for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn reschedule_event(&self, id: Uuid, anchor_date: &str) -> ServiceResult<Event> {
        let anchor = parse_anchor(anchor_date).ok_or_else(|| {
            ServiceError::ValidationError(format!("invalid anchor date '{anchor_date}'"))
        })?;

        let now = self.clock.now_utc();
        let new_id = Uuid::now_v7();
        let anchor_date = anchor.to_string();

        let replacement = self
            .repository
            .replace_event(
                id,
                Box::new(move |previous| Event {
                    id: new_id,
                    anchor_date,
                    created_at: now,
                    updated_at: now,
                    ..previous
                }),
            )
            .await?;

        tracing::info!(
            previous_id = %id,
            event_id = %replacement.id,
            %anchor,
            "Event rescheduled"
        );
        Ok(replacement)
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` for an unknown id.
    #[tracing::instrument(skip(self))]
    pub async fn delete_event(&self, id: Uuid) -> ServiceResult<()> {
        self.repository.delete_event(id).await?;
        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }

    /// ## Summary
    /// Appends a comment. A comment pinned to a day must target a day the
    /// event recurs on; the past-`once` filter does not apply here.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` for empty text or a pinned day
    /// the event does not occur on, `ServiceError::NotFound` for an unknown event.
    #[tracing::instrument(skip(self, new_comment), fields(author_id = %new_comment.author_id))]
    pub async fn add_comment(&self, event_id: Uuid, new_comment: NewComment) -> ServiceResult<Comment> {
        let text = validate_comment_text(&new_comment.text)?;

        if let Some(day) = new_comment.occurrence_date {
            let event = self.repository.get_event(event_id).await?;
            let lands = event
                .anchor_day()
                .is_some_and(|anchor| event.recurrence.occurs_on(anchor, day));
            if !lands {
                return Err(ServiceError::ValidationError(format!(
                    "event {event_id} does not occur on {day}"
                )));
            }
        }

        let comment = Comment {
            id: Uuid::now_v7(),
            author_id: new_comment.author_id,
            text,
            occurrence_date: new_comment.occurrence_date,
            created_at: self.clock.now_utc(),
            edited_at: None,
        };

        self.repository.add_comment(event_id, comment).await
    }

    /// ## Errors
    /// Returns `ServiceError::ValidationError` for empty text,
    /// `ServiceError::NotFound` for an unknown event or comment.
    #[tracing::instrument(skip(self, text))]
    pub async fn edit_comment(
        &self,
        event_id: Uuid,
        comment_id: Uuid,
        text: &str,
    ) -> ServiceResult<Comment> {
        let text = validate_comment_text(text)?;
        self.repository
            .update_comment(event_id, comment_id, &text, self.clock.now_utc())
            .await
    }

    /// ## Errors
    /// Returns `ServiceError::NotFound` for an unknown event or comment.
    #[tracing::instrument(skip(self))]
    pub async fn delete_comment(&self, event_id: Uuid, comment_id: Uuid) -> ServiceResult<()> {
        self.repository.delete_comment(event_id, comment_id).await?;
        Ok(())
    }
}

fn validate_comment_text(text: &str) -> ServiceResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ServiceError::ValidationError(
            "comment text must not be empty".to_string(),
        ));
    }
    Ok(text.to_string())
}
