//! Aggregate read operations over the event store.
//!
//! All reads are pure queries: they reduce whatever has been committed at call
//! time and never mutate the store.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::Ledger;
use crate::model::{ActionType, CreditEvent, UserId};
use crate::store::{EventFilter, EventStore, Page, StoreError};

/// Default page size for event listings.
pub const DEFAULT_LIMIT: usize = 50;
/// Hard cap on page size; larger requests are clamped.
pub const MAX_LIMIT: usize = 100;
/// How many events "recent" lists carry.
const RECENT_EVENTS: usize = 10;

/// Per-action event count and credit sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionTally {
    pub events: usize,
    pub credits: u64,
}

/// Aggregated view of one user's ledger history.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub user: UserId,
    pub total_credits: u64,
    pub total_events: usize,
    pub credits_by_action: BTreeMap<ActionType, ActionTally>,
    /// Timestamp of the newest event, or `None` for an empty history.
    pub last_activity: Option<DateTime<Utc>>,
    /// The 10 most recent events, newest-first.
    pub recent_events: Vec<CreditEvent>,
}

/// Filters and pagination for event listings.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub user: Option<UserId>,
    pub action: Option<ActionType>,
    pub referrer: Option<UserId>,
    pub triggered_by: Option<UserId>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    /// Page size; defaults to [`DEFAULT_LIMIT`], clamped to [`MAX_LIMIT`].
    pub limit: Option<usize>,
    pub skip: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub total_count: usize,
    pub limit: usize,
    pub skip: usize,
    pub has_more: bool,
}

/// One page of filtered events, newest-first.
#[derive(Debug, Clone, Serialize)]
pub struct EventsPage {
    pub events: Vec<CreditEvent>,
    pub pagination: Pagination,
}

/// Aggregated view of the referral bonuses one user has earned.
#[derive(Debug, Clone, Serialize)]
pub struct ReferralSummary {
    pub user: UserId,
    pub total_bonus_credits: u64,
    pub total_referrals: usize,
    /// The 10 most recent bonus events, newest-first.
    pub recent_bonuses: Vec<CreditEvent>,
}

/// Per-action slice of the system-wide breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct ActionBreakdown {
    pub action: ActionType,
    pub events: usize,
    pub credits: u64,
}

/// Ledger-wide statistics.
#[derive(Debug, Clone, Serialize)]
pub struct SystemStats {
    pub total_credits: u64,
    pub total_events: usize,
    pub unique_users: usize,
    /// Events timestamped within the trailing 24 hours.
    pub recent_activity: usize,
    /// Sorted by descending credit sum.
    pub credits_by_action: Vec<ActionBreakdown>,
}

/// Read API
impl<S: EventStore> Ledger<S> {
    /// Totals, per-action breakdown, and recent history for one user.
    pub fn user_summary(&self, user: &str) -> Result<UserSummary, StoreError> {
        let events = self.store().scan(&EventFilter::for_user(user))?;

        let mut credits_by_action: BTreeMap<ActionType, ActionTally> = BTreeMap::new();
        let mut total_credits: u64 = 0;
        for event in &events {
            let tally = credits_by_action.entry(event.action).or_default();
            tally.events += 1;
            tally.credits += event.credits;
            total_credits += event.credits;
        }

        Ok(UserSummary {
            user: user.to_string(),
            total_credits,
            total_events: events.len(),
            credits_by_action,
            last_activity: events.first().map(|e| e.timestamp),
            recent_events: events.into_iter().take(RECENT_EVENTS).collect(),
        })
    }

    /// Filtered, paginated event listing, newest-first.
    pub fn events(&self, query: EventQuery) -> Result<EventsPage, StoreError> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let skip = query.skip;

        let filter = EventFilter {
            user: query.user,
            action: query.action,
            referrer: query.referrer,
            triggered_by: query.triggered_by,
            since: query.since,
            until: query.until,
        };
        let page = self.store().query(
            &filter,
            Page {
                limit: Some(limit),
                skip,
            },
        )?;

        let has_more = skip + page.events.len() < page.total_count;
        Ok(EventsPage {
            pagination: Pagination {
                total_count: page.total_count,
                limit,
                skip,
                has_more,
            },
            events: page.events,
        })
    }

    /// Sum, count, and recent list of one user's referral bonuses.
    pub fn referral_summary(&self, user: &str) -> Result<ReferralSummary, StoreError> {
        let filter = EventFilter {
            user: Some(user.to_string()),
            action: Some(ActionType::ReferralBonus),
            ..EventFilter::default()
        };
        let bonuses = self.store().scan(&filter)?;

        Ok(ReferralSummary {
            user: user.to_string(),
            total_bonus_credits: bonuses.iter().map(|e| e.credits).sum(),
            total_referrals: bonuses.len(),
            recent_bonuses: bonuses.into_iter().take(RECENT_EVENTS).collect(),
        })
    }

    /// Ledger-wide statistics, with "recent" relative to now.
    pub fn system_stats(&self) -> Result<SystemStats, StoreError> {
        self.system_stats_at(Utc::now())
    }

    /// [`system_stats`](Self::system_stats) with an explicit reference time.
    pub fn system_stats_at(&self, now: DateTime<Utc>) -> Result<SystemStats, StoreError> {
        let events = self.store().scan(&EventFilter::default())?;
        let cutoff = now - Duration::hours(24);

        let mut by_action: BTreeMap<ActionType, ActionTally> = BTreeMap::new();
        let mut users: HashSet<&str> = HashSet::new();
        let mut total_credits: u64 = 0;
        let mut recent_activity = 0;
        for event in &events {
            let tally = by_action.entry(event.action).or_default();
            tally.events += 1;
            tally.credits += event.credits;
            total_credits += event.credits;
            users.insert(event.user.as_str());
            if event.timestamp > cutoff && event.timestamp <= now {
                recent_activity += 1;
            }
        }

        let mut credits_by_action: Vec<ActionBreakdown> = by_action
            .into_iter()
            .map(|(action, tally)| ActionBreakdown {
                action,
                events: tally.events,
                credits: tally.credits,
            })
            .collect();
        // Descending by credits; the BTreeMap origin makes ties deterministic.
        credits_by_action.sort_by(|a, b| b.credits.cmp(&a.credits));

        Ok(SystemStats {
            total_credits,
            total_events: events.len(),
            unique_users: users.len(),
            recent_activity,
            credits_by_action,
        })
    }
}
