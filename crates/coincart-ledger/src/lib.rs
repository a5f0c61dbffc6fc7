//! # CoinCart Ledger - Reward Ledger Engine
//!
//! The authoritative coin ledger for the CoinCart application. Users earn
//! coins for completed reward-eligible actions (ad views, poll votes,
//! referrals, login streaks) and spend them on discounted purchases; this
//! crate guarantees each action credits at most once even though the
//! triggering UI events (timers, clicks, retried requests) are re-entrant.
//!
//! The engine is generic over the effect traits in `coincart-core`; handler
//! implementations live in `coincart-effects`.
//!
//! ```
//! use coincart_core::ActionDescriptor;
//! use coincart_core::UserId;
//! use coincart_effects::{MemoryStoreHandler, SystemClockHandler};
//! use coincart_ledger::RewardLedger;
//!
//! # async fn demo() -> coincart_core::LedgerResult<()> {
//! let ledger = RewardLedger::new(MemoryStoreHandler::new(), SystemClockHandler::new());
//! let user = UserId::new();
//!
//! let outcome = ledger
//!     .credit_for_action(user, ActionDescriptor::ad_view("nike", user, "view-1", 50))
//!     .await?;
//! assert_eq!(outcome.balance(), 50);
//!
//! // The countdown timer fired twice; the second credit is a no-op.
//! let again = ledger
//!     .credit_for_action(user, ActionDescriptor::ad_view("nike", user, "view-1", 50))
//!     .await?;
//! assert!(again.is_duplicate());
//! assert_eq!(again.balance(), 50);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Engine configuration
pub mod config;

/// The ledger engine and operation outcomes
pub mod ledger;

/// Identity-resolving session facade
pub mod session;

pub use config::LedgerConfig;
pub use ledger::{CreditOutcome, DebitOutcome, RewardLedger};
pub use session::SessionLedger;
