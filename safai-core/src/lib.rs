//! Core types, lifecycle service, and dispatch engine for the safai
//! ward waste-pickup coordinator.

/// Adapter bundle a ward runs on.
pub mod backend;
/// Route ordering heuristic and ward-loop configuration.
pub mod dispatch;
/// Domain models and identifiers shared by all adapters.
pub mod model;
/// Traits describing the storage and directory interfaces.
pub mod ports;
/// High-level service facade used by shells.
pub mod service;

pub use backend::*;
pub use dispatch::*;
pub use model::*;
pub use ports::*;
pub use service::*;
