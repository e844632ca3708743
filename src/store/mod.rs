//! Event store seam.
//!
//! The ledger talks to persistence through [`EventStore`]: durable append plus
//! filtered, newest-first queries. [`MemoryStore`] is the in-process
//! implementation; durable backends are external collaborators implementing the
//! same trait.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{ActionType, CreditEvent, EventDraft, UserId};

mod memory;
pub use memory::MemoryStore;

/// Failure of the underlying persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event store unavailable: {0}")]
    Unavailable(String),
    #[error("append rejected: {0}")]
    Rejected(String),
}

/// Criteria for selecting events. All fields are conjunctive; `None` matches
/// everything.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub user: Option<UserId>,
    pub action: Option<ActionType>,
    pub referrer: Option<UserId>,
    /// Matches bonus events back-referencing this triggering user.
    pub triggered_by: Option<UserId>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl EventFilter {
    /// All events credited to one user.
    pub fn for_user(user: impl Into<UserId>) -> Self {
        Self {
            user: Some(user.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, event: &CreditEvent) -> bool {
        if let Some(user) = &self.user
            && event.user != *user
        {
            return false;
        }
        if let Some(action) = self.action
            && event.action != action
        {
            return false;
        }
        if let Some(referrer) = &self.referrer
            && event.referrer.as_ref() != Some(referrer)
        {
            return false;
        }
        if let Some(trigger) = &self.triggered_by
            && event.triggered_by.as_ref() != Some(trigger)
        {
            return false;
        }
        if let Some(since) = self.since
            && event.timestamp < since
        {
            return false;
        }
        if let Some(until) = self.until
            && event.timestamp > until
        {
            return false;
        }
        true
    }
}

/// A window into a query's results.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    /// Maximum number of events to return; `None` means all.
    pub limit: Option<usize>,
    /// Number of matching events to skip from the newest end.
    pub skip: usize,
}

impl Page {
    pub fn all() -> Self {
        Self {
            limit: None,
            skip: 0,
        }
    }
}

/// One page of query results, newest-first, with the total match count.
#[derive(Debug, Clone)]
pub struct QueryPage {
    pub events: Vec<CreditEvent>,
    pub total_count: usize,
}

/// Durable, append-only storage of credit events.
pub trait EventStore {
    /// Persist a draft, stamping it with an id and timestamp. Events are
    /// immutable once appended.
    fn append(&mut self, draft: EventDraft) -> Result<CreditEvent, StoreError>;

    /// Events matching `filter`, newest-first, windowed by `page`, along with
    /// the total number of matches.
    fn query(&self, filter: &EventFilter, page: Page) -> Result<QueryPage, StoreError>;

    /// All events matching `filter`, newest-first.
    fn scan(&self, filter: &EventFilter) -> Result<Vec<CreditEvent>, StoreError> {
        Ok(self.query(filter, Page::all())?.events)
    }

    /// Whether any event credits this user.
    fn user_exists(&self, user: &str) -> Result<bool, StoreError>;
}
