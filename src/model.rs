//! Core domain types for the credit ledger.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identifier.
pub type UserId = String;

/// Event identifier, assigned by the event store at append time.
pub type EventId = u64;

/// Free-form auxiliary data attached to an event, opaque to the engine.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// The category of activity that earned credits.
///
/// `ReferralBonus` is a valid stored action type but is never accepted as a
/// caller-supplied action for primary events; it is only written by the
/// referral processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Enrollment,
    ReferralBonus,
    SocialPost,
    TechModule,
    SpendMultiplier,
    CoffeeWall,
    Other,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Enrollment => "enrollment",
            ActionType::ReferralBonus => "referral_bonus",
            ActionType::SocialPost => "social_post",
            ActionType::TechModule => "tech_module",
            ActionType::SpendMultiplier => "spend_multiplier",
            ActionType::CoffeeWall => "coffee_wall",
            ActionType::Other => "other",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = UnknownActionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enrollment" => Ok(ActionType::Enrollment),
            "referral_bonus" => Ok(ActionType::ReferralBonus),
            "social_post" => Ok(ActionType::SocialPost),
            "tech_module" => Ok(ActionType::TechModule),
            "spend_multiplier" => Ok(ActionType::SpendMultiplier),
            "coffee_wall" => Ok(ActionType::CoffeeWall),
            "other" => Ok(ActionType::Other),
            _ => Err(UnknownActionType(s.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized action type string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action type '{0}'")]
pub struct UnknownActionType(pub String);

/// One immutable record of credits awarded to a user.
///
/// Events are created exactly once (by the recorder for primary events, by the
/// referral processor for bonus events) and never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditEvent {
    pub id: EventId,
    pub user: UserId,
    pub action: ActionType,
    /// Credits awarded to `user` by this event.
    pub credits: u64,
    /// Bonus generated as a side effect of this event (0 if none). Informational
    /// only; it never contributes to `user`'s own total.
    pub referrer_bonus: u64,
    /// The user credited with a separate bonus event because of this event.
    /// Always `None` on `referral_bonus` events (no multi-level chains).
    pub referrer: Option<UserId>,
    /// On `referral_bonus` events, the user whose action triggered the bonus.
    pub triggered_by: Option<UserId>,
    pub timestamp: DateTime<Utc>,
    pub metadata: Metadata,
}

/// A fully validated event, ready for the store to stamp with an id and
/// timestamp.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub user: UserId,
    pub action: ActionType,
    pub credits: u64,
    pub referrer_bonus: u64,
    pub referrer: Option<UserId>,
    pub triggered_by: Option<UserId>,
    pub metadata: Metadata,
}

impl EventDraft {
    /// Draft for a primary (caller-initiated) event.
    pub fn primary(user: UserId, action: ActionType, credits: u64) -> Self {
        Self {
            user,
            action,
            credits,
            referrer_bonus: 0,
            referrer: None,
            triggered_by: None,
            metadata: Metadata::new(),
        }
    }
}

/// A caller's request to award credits.
///
/// `credits` is signed so a negative amount reaches validation instead of being
/// silently unrepresentable at the boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordRequest {
    pub user: UserId,
    pub action: ActionType,
    pub credits: i64,
    #[serde(default)]
    pub referrer: Option<UserId>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl RecordRequest {
    pub fn new(user: impl Into<UserId>, action: ActionType, credits: i64) -> Self {
        Self {
            user: user.into(),
            action,
            credits,
            referrer: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_referrer(mut self, referrer: impl Into<UserId>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }
}
