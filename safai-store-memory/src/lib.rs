//! In-memory adapters for the safai ports.
//!
//! Backing storage for demos and tests, and the reference implementation of
//! the atomic transition/credit contracts the port traits demand.

/// Map-backed household directory.
pub mod directory;
/// Mutex-guarded incentive ledger.
pub mod incentive;
/// Mutex-guarded pickup record store.
pub mod pickup;

pub use directory::StaticDirectory;
pub use incentive::MemoryIncentiveStore;
pub use pickup::MemoryPickupStore;
