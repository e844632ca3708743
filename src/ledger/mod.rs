//! Credit recording engine.
//!
//! The ledger validates award requests, derives referral bonuses as linked
//! secondary events, and appends everything to an [`EventStore`]. It is the
//! single mutation entry point: no other component writes primary events.
//! Also supports draining an async stream of requests.

use serde::Serialize;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::model::{ActionType, CreditEvent, EventDraft, EventId, Metadata, RecordRequest};
use crate::rates::RateTable;
use crate::store::{EventStore, StoreError};

mod error;
pub use error::{LedgerError, Mode, ValidationError};

mod reader;
pub use reader::{
    ActionBreakdown, ActionTally, DEFAULT_LIMIT, EventQuery, EventsPage, MAX_LIMIT, Pagination,
    ReferralSummary, SystemStats, UserSummary,
};

/// Outcome of one referral side effect. Never an error: store-level failures
/// are downgraded to `success: false` and the caller checks the flag.
#[derive(Debug, Clone, Serialize)]
pub struct ReferralOutcome {
    pub success: bool,
    pub bonus_awarded: u64,
    /// Id of the appended bonus event, when one was written.
    pub bonus_event: Option<EventId>,
    pub message: String,
}

impl ReferralOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            bonus_awarded: 0,
            bonus_event: None,
            message: message.into(),
        }
    }
}

/// A successfully recorded award.
#[derive(Debug, Clone, Serialize)]
pub struct Recorded {
    /// The persisted primary event.
    pub event: CreditEvent,
    /// Result of referral processing, or `None` if no referral was attempted.
    pub referral: Option<ReferralOutcome>,
    pub message: String,
}

/// The credit ledger engine.
///
/// Generic over the event store so the in-memory store and durable backends
/// are interchangeable.
pub struct Ledger<S> {
    store: S,
    rates: RateTable,
}

/// Public API
impl<S: EventStore> Ledger<S> {
    /// Ledger with the standard referral rate table.
    pub fn new(store: S) -> Self {
        Self::with_rates(store, RateTable::default())
    }

    /// Ledger with an injected rate table.
    pub fn with_rates(store: S, rates: RateTable) -> Self {
        Self { store, rates }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Drain a stream of record requests, logging each outcome. Rejected
    /// requests never stop the loop.
    pub async fn run(&mut self, mut stream: impl Stream<Item = RecordRequest> + Unpin) {
        while let Some(req) = stream.next().await {
            let user = req.user.clone();
            let action = req.action;
            let credits = req.credits;
            match self.record(req) {
                Ok(recorded) => info!(
                    user = %user,
                    action = %action,
                    credits,
                    bonus = recorded.event.referrer_bonus,
                    "credit event recorded"
                ),
                Err(e) => warn!(
                    user = %user,
                    action = %action,
                    credits,
                    reason = %e,
                    "credit event rejected"
                ),
            }
        }
    }

    /// Record one credit award.
    ///
    /// Validation is fail-fast: the first violation wins and nothing is
    /// persisted. When an eligible, distinct referrer is present, the referral
    /// side effect runs before the primary append and its awarded bonus is
    /// copied onto the primary event's `referrer_bonus`.
    pub fn record(&mut self, req: RecordRequest) -> Result<Recorded, LedgerError> {
        if req.user.is_empty() {
            return Err(ValidationError::MissingUser.into());
        }
        if req.action == ActionType::ReferralBonus {
            return Err(ValidationError::ReservedAction.into());
        }
        if req.credits < 0 {
            return Err(ValidationError::NegativeCredits(req.credits).into());
        }
        let credits = req.credits as u64;

        // Empty-string referrer means no referral.
        let referrer = req.referrer.filter(|r| !r.is_empty());
        if let Some(r) = &referrer {
            if *r == req.user {
                return Err(ValidationError::SelfReferral(req.user).into());
            }
            if !self.is_eligible_referrer(r)? {
                return Err(LedgerError::IneligibleReferrer(r.clone()));
            }
        }

        let referral = referrer
            .as_deref()
            .map(|r| self.process_referral(r, req.action, credits, &req.user));
        let referrer_bonus = referral.as_ref().map_or(0, |o| o.bonus_awarded);

        let event = self.store.append(EventDraft {
            user: req.user,
            action: req.action,
            credits,
            referrer_bonus,
            referrer,
            triggered_by: None,
            metadata: req.metadata,
        })?;

        let message = format!("awarded {} credits to {}", event.credits, event.user);
        Ok(Recorded {
            event,
            referral,
            message,
        })
    }

    /// Run one referral side effect: compute the bonus and, if nonzero, append
    /// a `referral_bonus` event credited to the referrer.
    ///
    /// At most one append per invocation; none when the bonus rounds to zero.
    /// A store failure here is logged and reported as a failed outcome rather
    /// than propagated, so the triggering award can still proceed.
    pub fn process_referral(
        &mut self,
        referrer: &str,
        action: ActionType,
        base_credits: u64,
        triggering_user: &str,
    ) -> ReferralOutcome {
        if referrer.is_empty() || triggering_user.is_empty() {
            return ReferralOutcome::failed("referrer and triggering user must be non-empty");
        }

        let bonus = self.rates.bonus(action, base_credits);
        if bonus == 0 {
            return ReferralOutcome {
                success: true,
                bonus_awarded: 0,
                bonus_event: None,
                message: format!("{action} at {base_credits} credits yields no bonus"),
            };
        }

        let mut metadata = Metadata::new();
        metadata.insert(
            "original_action".to_string(),
            serde_json::json!(action.as_str()),
        );
        metadata.insert("original_credits".to_string(), serde_json::json!(base_credits));

        // A bonus event never carries a referrer of its own: bonuses do not
        // chain.
        let draft = EventDraft {
            user: referrer.to_string(),
            action: ActionType::ReferralBonus,
            credits: bonus,
            referrer_bonus: 0,
            referrer: None,
            triggered_by: Some(triggering_user.to_string()),
            metadata,
        };

        match self.store.append(draft) {
            Ok(event) => ReferralOutcome {
                success: true,
                bonus_awarded: bonus,
                bonus_event: Some(event.id),
                message: format!("awarded {bonus} bonus credits to {referrer}"),
            },
            Err(e) => {
                warn!(
                    referrer,
                    triggered_by = triggering_user,
                    error = %e,
                    "referral bonus append failed, bonus dropped"
                );
                ReferralOutcome::failed(format!("referral bonus could not be recorded for {referrer}"))
            }
        }
    }

    /// Whether `referrer` may earn referral bonuses: any prior event credited
    /// to them qualifies; existence, not balance, is the bar.
    ///
    /// A store failure surfaces as `Err` so callers can tell "ineligible" from
    /// "could not determine".
    pub fn is_eligible_referrer(&self, referrer: &str) -> Result<bool, StoreError> {
        if referrer.is_empty() {
            return Ok(false);
        }
        self.store.user_exists(referrer)
    }
}
