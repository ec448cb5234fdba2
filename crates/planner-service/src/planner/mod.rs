//! Planner domain: base events, their recurrence rules, and the month
//! expansion that turns them into calendar occurrences.

pub mod clock;
pub mod model;
pub mod recurrence;
pub mod repository;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use model::{Comment, Event, EventPatch, NewComment, NewEvent, Recurrence};
pub use recurrence::{Occurrence, expand_occurrences, group_by_day};
pub use repository::{
    EventChange, EventEdit, EventReplacement, EventRepository, InMemoryEventRepository,
};
pub use service::{AgendaDay, MonthAgenda, MonthOccurrences, OccurrenceView, PlannerService};
