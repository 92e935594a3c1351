//! Wiring bundle for the storage and directory adapters a ward runs on.

use std::sync::Arc;

use crate::ports::{HouseholdDirectory, IncentiveStore, PickupStore};

#[derive(Clone)]
/// Collection of adapters backing a single administrative ward.
///
/// The engine never owns how records are physically stored; it only talks
/// to whatever implementations are bundled here.
pub struct WardBackend {
    /// Pickup record persistence.
    pub pickups: Arc<dyn PickupStore>,
    /// Incentive ledger persistence.
    pub incentives: Arc<dyn IncentiveStore>,
    /// External household registry.
    pub directory: Arc<dyn HouseholdDirectory>,
}

impl WardBackend {
    /// Bundle the given adapters.
    #[must_use]
    pub fn new(
        pickups: Arc<dyn PickupStore>,
        incentives: Arc<dyn IncentiveStore>,
        directory: Arc<dyn HouseholdDirectory>,
    ) -> Self {
        Self {
            pickups,
            incentives,
            directory,
        }
    }
}
