use chrono::Utc;

use super::{EventFilter, EventStore, Page, QueryPage, StoreError};
use crate::model::{CreditEvent, EventDraft, EventId};

/// In-memory event store.
///
/// Events live in append order with a sequential id counter, so newest-first
/// ordering is a reverse scan. Intended for tests, replay runs, and as the
/// fallback when no durable backend is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Vec<CreditEvent>,
    next_id: EventId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events ever appended.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventStore for MemoryStore {
    fn append(&mut self, draft: EventDraft) -> Result<CreditEvent, StoreError> {
        self.next_id += 1;
        let event = CreditEvent {
            id: self.next_id,
            user: draft.user,
            action: draft.action,
            credits: draft.credits,
            referrer_bonus: draft.referrer_bonus,
            referrer: draft.referrer,
            triggered_by: draft.triggered_by,
            timestamp: Utc::now(),
            metadata: draft.metadata,
        };
        self.events.push(event.clone());
        Ok(event)
    }

    fn query(&self, filter: &EventFilter, page: Page) -> Result<QueryPage, StoreError> {
        let matches = self.events.iter().rev().filter(|e| filter.matches(e));
        let total_count = matches.clone().count();

        let events: Vec<CreditEvent> = match page.limit {
            Some(limit) => matches.skip(page.skip).take(limit).cloned().collect(),
            None => matches.skip(page.skip).cloned().collect(),
        };

        Ok(QueryPage {
            events,
            total_count,
        })
    }

    fn user_exists(&self, user: &str) -> Result<bool, StoreError> {
        Ok(self.events.iter().any(|e| e.user == user))
    }
}
