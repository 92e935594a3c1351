//! Port traits for storage and directory adapters, plus the error taxonomy.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{
    HouseholdId, HouseholdInfo, Incentive, PickupId, PickupRequest, PickupStatus, UnknownWasteType,
};

#[derive(thiserror::Error, Debug)]
/// Errors surfaced by the engine and its adapters.
pub enum CoreError {
    /// Malformed or missing input; the caller can correct and retry.
    #[error("Validation error: {0}")]
    Validation(String),
    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up.
        entity: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },
    /// The pickup already reached its terminal state. Retrying clients may
    /// treat this as a successful no-op; no points are re-awarded.
    #[error("Pickup already completed: {0}")]
    AlreadyCompleted(PickupId),
    /// Underlying persistence failure, propagated unmodified.
    #[error("Storage error: {0}")]
    Storage(String),
    /// Network layer failed while talking to the ward registry.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
}

impl From<UnknownWasteType> for CoreError {
    fn from(err: UnknownWasteType) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl CoreError {
    /// Shorthand for a missing pickup record.
    #[must_use]
    pub fn pickup_not_found(id: &PickupId) -> Self {
        CoreError::NotFound {
            entity: "Pickup request",
            id: id.0.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Filter for querying pickup records.
pub struct PickupFilter {
    /// Restrict to a single lifecycle state.
    pub status: Option<PickupStatus>,
    /// Restrict to a single household.
    pub household: Option<HouseholdId>,
}

impl PickupFilter {
    /// Filter matching every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching records in the given state.
    #[must_use]
    pub fn with_status(status: PickupStatus) -> Self {
        Self {
            status: Some(status),
            household: None,
        }
    }

    /// Check whether a record passes this filter.
    #[must_use]
    pub fn matches(&self, pickup: &PickupRequest) -> bool {
        if let Some(status) = self.status
            && pickup.status != status
        {
            return false;
        }
        if let Some(household) = &self.household
            && pickup.household_id != *household
        {
            return false;
        }
        true
    }
}

#[async_trait]
/// Read-only lookup into the external household registry.
///
/// A miss is not an error: callers degrade to an "Unknown" area and an
/// absent location.
pub trait HouseholdDirectory: Send + Sync {
    /// Resolve a single household, `None` on a registry miss.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] when the registry itself is unreachable.
    async fn lookup(&self, household: &HouseholdId) -> Result<Option<HouseholdInfo>, CoreError>;

    /// Resolve a batch of households; missing ids are simply absent from
    /// the result map.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] when the registry itself is unreachable.
    async fn lookup_many(
        &self,
        households: &[HouseholdId],
    ) -> Result<HashMap<HouseholdId, HouseholdInfo>, CoreError> {
        let mut resolved = HashMap::with_capacity(households.len());
        for household in households {
            if let Some(info) = self.lookup(household).await? {
                resolved.insert(household.clone(), info);
            }
        }
        Ok(resolved)
    }
}

#[async_trait]
/// Persistence for pickup records and their state transitions.
///
/// The transition methods are the concurrency-critical primitives: each one
/// must observe and mutate the record atomically, so two callers racing on
/// the same pickup serialize inside the store rather than in the service.
pub trait PickupStore: Send + Sync {
    /// Persist a freshly created record.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] on persistence failure.
    async fn insert(&self, pickup: PickupRequest) -> Result<PickupRequest, CoreError>;

    /// Fetch a record by id, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] on persistence failure.
    async fn get(&self, id: &PickupId) -> Result<Option<PickupRequest>, CoreError>;

    /// List records passing the filter, sorted by `pickup_time` ascending.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] on persistence failure.
    async fn list(&self, filter: &PickupFilter) -> Result<Vec<PickupRequest>, CoreError>;

    /// Set the segregation flag to the supplied value.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if the record is absent and
    /// [`CoreError::AlreadyCompleted`] once the pickup is completed, so the
    /// flag that drove a payout can never drift afterwards.
    async fn set_segregation(
        &self,
        id: &PickupId,
        verified: bool,
    ) -> Result<PickupRequest, CoreError>;

    /// Record a collector's claim: `pending`/`assigned` → `assigned`.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if the record is absent,
    /// [`CoreError::AlreadyCompleted`] if it already completed.
    async fn assign(&self, id: &PickupId, collector_id: &str) -> Result<PickupRequest, CoreError>;

    /// Atomic check-and-transition to `completed`.
    ///
    /// At most one caller wins; every later caller observes
    /// [`CoreError::AlreadyCompleted`].
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if the record is absent,
    /// [`CoreError::AlreadyCompleted`] on any repeat attempt.
    async fn complete(&self, id: &PickupId, completed_by: &str)
    -> Result<PickupRequest, CoreError>;
}

#[async_trait]
/// Persistence for per-household point balances.
pub trait IncentiveStore: Send + Sync {
    /// Atomically add points to a household's balance, creating the row
    /// with the increment as its initial value if none exists. Returns the
    /// post-increment state. Must not lose updates under concurrent
    /// callers; implementations may not read-modify-write.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] on persistence failure.
    async fn credit(&self, household: &HouseholdId, points: u64) -> Result<Incentive, CoreError>;

    /// Fetch the stored balance, `None` if the household was never awarded.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] on persistence failure.
    async fn balance(&self, household: &HouseholdId) -> Result<Option<Incentive>, CoreError>;
}
