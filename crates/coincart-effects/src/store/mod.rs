//! Durable store handlers

/// In-memory store for tests and local development
pub mod memory;

/// Failure-injecting stores for tests
pub mod simulated;

pub use memory::MemoryStoreHandler;
pub use simulated::{LatentStoreHandler, UnavailableStoreHandler};
