//! Action Descriptors
//!
//! An action descriptor is the input an action source (ad-view timer, poll
//! control, referral confirmation) presents to the ledger when it believes a
//! reward-eligible action completed. Sources may re-present the same
//! descriptor any number of times; the `source_action_id` collapses repeats
//! into a single commit.

use crate::error::LedgerError;
use crate::identifiers::{SourceActionId, UserId};
use serde::{Deserialize, Serialize};
use time::Date;

/// One instance of a reward-eligible action, as presented by an action source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Idempotency key for this action instance
    pub source_action_id: SourceActionId,

    /// Coins to credit on first acceptance
    pub reward_amount: u64,

    /// Passed through to the resulting transaction
    pub description: String,
}

impl ActionDescriptor {
    /// Create a descriptor with an explicit key
    pub fn new(
        source_action_id: impl Into<SourceActionId>,
        reward_amount: u64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source_action_id: source_action_id.into(),
            reward_amount,
            description: description.into(),
        }
    }

    /// Completed ad view. The view session id keeps distinct viewings of the
    /// same ad distinct, while re-fires of one countdown share a key.
    pub fn ad_view(ad_id: &str, user_id: UserId, view_session_id: &str, reward: u64) -> Self {
        Self::new(
            format!("ad:{ad_id}:{user_id}:{view_session_id}"),
            reward,
            format!("Watched {ad_id} advertisement"),
        )
    }

    /// Poll vote. One credit per poll per user, however often the control
    /// is clicked.
    pub fn poll_vote(poll_id: &str, user_id: UserId, reward: u64) -> Self {
        Self::new(
            format!("poll:{poll_id}:{user_id}"),
            reward,
            format!("Voted in poll {poll_id}"),
        )
    }

    /// Confirmed referral. Keyed on the referral id alone: the referral is
    /// the unique event, whoever reports it.
    pub fn referral(referral_id: &str, reward: u64) -> Self {
        Self::new(
            format!("referral:{referral_id}"),
            reward,
            "Referral bonus",
        )
    }

    /// One-time signup bonus for a new account
    pub fn signup_bonus(user_id: UserId, reward: u64) -> Self {
        Self::new(format!("signup:{user_id}"), reward, "Signup bonus")
    }

    /// Daily login reward. The UTC date is part of the key, so each day is
    /// its own action instance and repeat checks within a day deduplicate.
    pub fn daily_login(user_id: UserId, date: Date, reward: u64) -> Self {
        Self::new(
            format!("login:{user_id}:{date}"),
            reward,
            "Daily login reward",
        )
    }

    /// Reject descriptors the ledger must never commit: an empty key cannot
    /// deduplicate, and a zero reward is a caller bug.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.source_action_id.is_empty() {
            return Err(LedgerError::invalid_action("empty source_action_id"));
        }
        if self.reward_amount == 0 {
            return Err(LedgerError::invalid_action("reward_amount must be positive"));
        }
        Ok(())
    }
}
