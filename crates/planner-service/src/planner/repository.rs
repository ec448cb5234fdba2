//! Event store seam.
//!
//! The planner reads and writes events through [`EventRepository`] so the
//! expansion and service code never depend on a particular document store.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use super::model::{Comment, Event};
use crate::error::{ServiceError, ServiceResult};

/// Capacity of the change-notification channel.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

pub type RepositoryFuture<'a, T> = Pin<Box<dyn Future<Output = ServiceResult<T>> + Send + 'a>>;

/// In-place edit applied to a stored event while the store is locked.
pub type EventEdit = Box<dyn FnOnce(&mut Event) + Send>;

/// Builds the event that takes over from a removed one.
pub type EventReplacement = Box<dyn FnOnce(Event) -> Event + Send>;

/// Live change notification emitted after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "event_id", rename_all = "snake_case")]
pub enum EventChange {
    Created(Uuid),
    Updated(Uuid),
    Deleted(Uuid),
}

pub trait EventRepository: Send + Sync {
    /// Every stored event, regardless of owner.
    fn list_events(&self) -> RepositoryFuture<'_, Vec<Event>>;

    fn list_events_for_owner(&self, owner_id: Uuid) -> RepositoryFuture<'_, Vec<Event>>;

    fn get_event(&self, id: Uuid) -> RepositoryFuture<'_, Event>;

    /// Fails with `Conflict` if the id is already taken.
    fn insert_event(&self, event: Event) -> RepositoryFuture<'_, Event>;

    /// Applies `edit` to the stored event without releasing the store in
    /// between, so concurrent comment writes are kept. Fails with `NotFound`
    /// if absent.
    fn modify_event(&self, id: Uuid, edit: EventEdit) -> RepositoryFuture<'_, Event>;

    /// Removes `old_id` and stores what `replace` builds from it as one step.
    /// Fails with `NotFound` if `old_id` is absent and with `Conflict` if the
    /// replacement id is taken, leaving the store unchanged in both cases.
    fn replace_event(&self, old_id: Uuid, replace: EventReplacement)
    -> RepositoryFuture<'_, Event>;

    /// Removes and returns the event.
    fn delete_event(&self, id: Uuid) -> RepositoryFuture<'_, Event>;

    fn add_comment(&self, event_id: Uuid, comment: Comment) -> RepositoryFuture<'_, Comment>;

    fn update_comment<'a>(
        &'a self,
        event_id: Uuid,
        comment_id: Uuid,
        text: &'a str,
        edited_at: DateTime<Utc>,
    ) -> RepositoryFuture<'a, Comment>;

    fn delete_comment(&self, event_id: Uuid, comment_id: Uuid) -> RepositoryFuture<'_, Comment>;

    fn subscribe(&self) -> broadcast::Receiver<EventChange>;
}

/// Process-local event store.
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<Uuid, Event>>,
    changes: broadcast::Sender<EventChange>,
}

impl Default for InMemoryEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_events(Vec::new())
    }

    #[must_use]
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            events: RwLock::new(events.into_iter().map(|event| (event.id, event)).collect()),
            changes,
        }
    }

    /// ## Summary
    /// Loads a JSON array of event documents.
    ///
    /// Documents that do not deserialize are logged and skipped so one bad
    /// record does not prevent start-up.
    ///
    /// ## Errors
    /// Returns an error if the file cannot be read or is not a JSON array.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn from_seed_file(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let documents: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        let total = documents.len();

        let events: Vec<Event> = documents
            .into_iter()
            .enumerate()
            .filter_map(|(index, document)| match serde_json::from_value::<Event>(document) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed event document");
                    None
                }
            })
            .collect();

        tracing::info!(loaded = events.len(), total, "Seeded event store");

        Ok(Self::with_events(events))
    }

    fn notify(&self, change: EventChange) {
        if self.changes.send(change).is_err() {
            tracing::trace!(?change, "No change subscribers");
        }
    }
}

fn not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("event {id}"))
}

fn comment_not_found(event_id: Uuid, comment_id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("comment {comment_id} on event {event_id}"))
}

impl EventRepository for InMemoryEventRepository {
    fn list_events(&self) -> RepositoryFuture<'_, Vec<Event>> {
        Box::pin(async move { Ok(self.events.read().await.values().cloned().collect()) })
    }

    fn list_events_for_owner(&self, owner_id: Uuid) -> RepositoryFuture<'_, Vec<Event>> {
        Box::pin(async move {
            Ok(self
                .events
                .read()
                .await
                .values()
                .filter(|event| event.owner_id == owner_id)
                .cloned()
                .collect())
        })
    }

    fn get_event(&self, id: Uuid) -> RepositoryFuture<'_, Event> {
        Box::pin(async move {
            self.events
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| not_found(id))
        })
    }

    #[tracing::instrument(skip_all, fields(event_id = %event.id))]
    fn insert_event(&self, event: Event) -> RepositoryFuture<'_, Event> {
        Box::pin(async move {
            let id = event.id;
            {
                let mut events = self.events.write().await;
                if events.contains_key(&id) {
                    return Err(ServiceError::Conflict(format!("event {id} already exists")));
                }
                events.insert(id, event.clone());
            }
            self.notify(EventChange::Created(id));
            Ok(event)
        })
    }

    #[tracing::instrument(skip(self, edit))]
    fn modify_event(&self, id: Uuid, edit: EventEdit) -> RepositoryFuture<'_, Event> {
        Box::pin(async move {
            let modified = {
                let mut events = self.events.write().await;
                let stored = events.get_mut(&id).ok_or_else(|| not_found(id))?;
                edit(stored);
                stored.clone()
            };
            self.notify(EventChange::Updated(id));
            Ok(modified)
        })
    }

    #[tracing::instrument(skip(self, replace))]
    fn replace_event(
        &self,
        old_id: Uuid,
        replace: EventReplacement,
    ) -> RepositoryFuture<'_, Event> {
        Box::pin(async move {
            let replacement = {
                let mut events = self.events.write().await;
                let previous = events.remove(&old_id).ok_or_else(|| not_found(old_id))?;
                let replacement = replace(previous.clone());
                let new_id = replacement.id;

                if new_id == old_id || events.contains_key(&new_id) {
                    events.insert(old_id, previous);
                    return Err(ServiceError::Conflict(format!("event {new_id} already exists")));
                }
                events.insert(new_id, replacement.clone());
                replacement
            };
            self.notify(EventChange::Deleted(old_id));
            self.notify(EventChange::Created(replacement.id));
            Ok(replacement)
        })
    }

    #[tracing::instrument(skip(self))]
    fn delete_event(&self, id: Uuid) -> RepositoryFuture<'_, Event> {
        Box::pin(async move {
            let removed = self
                .events
                .write()
                .await
                .remove(&id)
                .ok_or_else(|| not_found(id))?;
            self.notify(EventChange::Deleted(id));
            Ok(removed)
        })
    }

    #[tracing::instrument(skip(self, comment), fields(comment_id = %comment.id))]
    fn add_comment(&self, event_id: Uuid, comment: Comment) -> RepositoryFuture<'_, Comment> {
        Box::pin(async move {
            {
                let mut events = self.events.write().await;
                let event = events.get_mut(&event_id).ok_or_else(|| not_found(event_id))?;
                event.comments.push(comment.clone());
            }
            self.notify(EventChange::Updated(event_id));
            Ok(comment)
        })
    }

    #[tracing::instrument(skip(self, text))]
    fn update_comment<'a>(
        &'a self,
        event_id: Uuid,
        comment_id: Uuid,
        text: &'a str,
        edited_at: DateTime<Utc>,
    ) -> RepositoryFuture<'a, Comment> {
        Box::pin(async move {
            let updated = {
                let mut events = self.events.write().await;
                let event = events.get_mut(&event_id).ok_or_else(|| not_found(event_id))?;
                let comment = event
                    .comments
                    .iter_mut()
                    .find(|comment| comment.id == comment_id)
                    .ok_or_else(|| comment_not_found(event_id, comment_id))?;
                comment.text = text.to_string();
                comment.edited_at = Some(edited_at);
                comment.clone()
            };
            self.notify(EventChange::Updated(event_id));
            Ok(updated)
        })
    }

    #[tracing::instrument(skip(self))]
    fn delete_comment(&self, event_id: Uuid, comment_id: Uuid) -> RepositoryFuture<'_, Comment> {
        Box::pin(async move {
            let removed = {
                let mut events = self.events.write().await;
                let event = events.get_mut(&event_id).ok_or_else(|| not_found(event_id))?;
                let position = event
                    .comments
                    .iter()
                    .position(|comment| comment.id == comment_id)
                    .ok_or_else(|| comment_not_found(event_id, comment_id))?;
                event.comments.remove(position)
            };
            self.notify(EventChange::Updated(event_id));
            Ok(removed)
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<EventChange> {
        self.changes.subscribe()
    }
}
