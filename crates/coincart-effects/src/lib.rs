//! # CoinCart Effects - Handler Implementations
//!
//! Concrete implementations of the effect traits defined in `coincart-core`:
//! durable store handlers (in-memory plus failure-injecting test doubles),
//! clock handlers (system and deterministic), and an identity handler that
//! models the application's auth context.
//!
//! The ledger engine in `coincart-ledger` is generic over the traits and
//! never names these types directly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Clock handlers
pub mod clock;

/// Identity provider handlers
pub mod identity;

/// Durable store handlers
pub mod store;

pub use clock::{FixedClockHandler, SystemClockHandler};
pub use identity::FixedIdentityHandler;
pub use store::{LatentStoreHandler, MemoryStoreHandler, UnavailableStoreHandler};
