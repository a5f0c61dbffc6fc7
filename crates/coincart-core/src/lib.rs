//! # CoinCart Core - Ledger Domain Types
//!
//! Foundation crate for the CoinCart reward ledger: identifier newtypes,
//! the transaction/account data model, the error taxonomy, and the effect
//! traits through which the ledger consumes its external collaborators
//! (durable store, identity provider, clock).
//!
//! No handler implementations live here; see `coincart-effects` for those
//! and `coincart-ledger` for the engine itself.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Account entity
pub mod account;

/// Action descriptors presented by action sources
pub mod action;

/// Effect traits for external collaborators
pub mod effects;

/// Error taxonomy
pub mod error;

/// Identifier newtypes
pub mod identifiers;

/// Transaction log types
pub mod transaction;

pub use account::Account;
pub use action::ActionDescriptor;
pub use effects::{ClockEffects, IdentityEffects, InsertOutcome, StoreEffects, StoreError};
pub use error::{LedgerError, LedgerResult};
pub use identifiers::{SourceActionId, TransactionId, UserId};
pub use transaction::{HistoryFilter, Transaction, TransactionKind};
