//! Pickup lifecycle controller and incentive ledger orchestration.

use chrono::Utc;
use tracing::{debug, info};

use crate::backend::WardBackend;
use crate::model::{
    HouseholdId, Incentive, NewPickup, PickupId, PickupRequest, PickupStatus, Principal, WasteType,
};
use crate::ports::{CoreError, PickupFilter};

/// Fixed points table for verified segregation, keyed by waste type.
///
/// Categories recorded by other systems fall back to the wet rate; the
/// fallback is deliberate, not a missing-table bug.
#[must_use]
pub fn points_for(waste_type: &WasteType) -> u64 {
    match waste_type {
        WasteType::Wet | WasteType::Other(_) => 5,
        WasteType::Dry => 8,
        WasteType::EWaste => 15,
    }
}

#[derive(Debug, Clone)]
/// Result of completing a pickup: the updated record and, when segregation
/// was verified at completion time, the post-award ledger balance.
pub struct CompletionOutcome {
    /// The completed pickup.
    pub pickup: PickupRequest,
    /// Post-increment balance, or `None` when no award was due.
    pub incentive: Option<Incentive>,
}

/// Public entry point for the pickup lifecycle and the incentive ledger.
///
/// Stateless request handler: every method runs to completion on its own,
/// and all cross-caller serialization lives in the storage primitives.
pub struct SafaiService {
    backend: WardBackend,
}

impl SafaiService {
    /// Create a new service bound to the provided backend.
    #[must_use]
    pub fn new(backend: WardBackend) -> Self {
        Self { backend }
    }

    /// Record a citizen's pickup request. The record starts `pending` and
    /// unverified; the ledger is untouched.
    ///
    /// # Errors
    ///
    /// [`CoreError::Validation`] for an empty household id, or a storage
    /// error from the pickup store.
    pub async fn create_pickup(&self, request: NewPickup) -> Result<PickupRequest, CoreError> {
        if request.household_id.0.trim().is_empty() {
            return Err(CoreError::Validation(
                "householdId, wasteType and pickupTime are required".to_owned(),
            ));
        }

        let pickup = PickupRequest {
            id: PickupId::generate(),
            household_id: request.household_id,
            waste_type: request.waste_type,
            pickup_time: request.pickup_time,
            overflow: request.overflow,
            location: request.location,
            status: PickupStatus::Pending,
            segregation_verified: false,
            assigned_to: None,
            completed_by: None,
            created_at: Utc::now(),
        };

        let stored = self.backend.pickups.insert(pickup).await?;
        info!(
            pickup = %stored.id,
            household = %stored.household_id,
            waste_type = %stored.waste_type,
            "pickup request created"
        );
        Ok(stored)
    }

    /// List pickup records passing the filter, earliest slot first.
    ///
    /// # Errors
    ///
    /// Propagates storage errors from the pickup store.
    pub async fn list_pickups(&self, filter: &PickupFilter) -> Result<Vec<PickupRequest>, CoreError> {
        self.backend.pickups.list(filter).await
    }

    /// Set the segregation flag to the supplied value.
    ///
    /// Idempotent and reversible while the pickup is not completed, so a
    /// collector can toggle their field judgement before committing the
    /// points transaction.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] for an unknown pickup,
    /// [`CoreError::AlreadyCompleted`] once the pickup is completed.
    pub async fn verify_segregation(
        &self,
        id: &PickupId,
        verified: bool,
    ) -> Result<PickupRequest, CoreError> {
        let pickup = self.backend.pickups.set_segregation(id, verified).await?;
        info!(pickup = %pickup.id, verified, "segregation flag updated");
        Ok(pickup)
    }

    /// Claim a pickup for the given collector: `pending` → `assigned`.
    ///
    /// Re-claiming a still-assigned pickup is allowed (shift handover).
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] for an unknown pickup,
    /// [`CoreError::AlreadyCompleted`] once the pickup is completed.
    pub async fn assign_pickup(
        &self,
        id: &PickupId,
        collector: &Principal,
    ) -> Result<PickupRequest, CoreError> {
        let pickup = self.backend.pickups.assign(id, &collector.id).await?;
        info!(pickup = %pickup.id, collector = %collector.id, "pickup assigned");
        Ok(pickup)
    }

    /// Complete a pickup and, when segregation was verified at that moment,
    /// award the fixed points for the pickup's own waste type.
    ///
    /// The status write happens first; the ledger credit only runs after it
    /// has durably succeeded. A crash in between leaves a completed pickup
    /// with no award, never an award without completion, and a retried
    /// completion can never pay twice.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] for an unknown pickup,
    /// [`CoreError::AlreadyCompleted`] when the pickup already completed
    /// (the earlier completion's award stands; none is added).
    pub async fn complete_pickup(
        &self,
        id: &PickupId,
        principal: &Principal,
    ) -> Result<CompletionOutcome, CoreError> {
        let pickup = self.backend.pickups.complete(id, &principal.id).await?;

        let incentive = if pickup.segregation_verified {
            let points = points_for(&pickup.waste_type);
            let balance = self
                .backend
                .incentives
                .credit(&pickup.household_id, points)
                .await?;
            info!(
                pickup = %pickup.id,
                household = %pickup.household_id,
                points,
                balance = balance.points,
                "incentive points awarded"
            );
            Some(balance)
        } else {
            debug!(pickup = %pickup.id, "completed without verified segregation, no award");
            None
        };

        Ok(CompletionOutcome { pickup, incentive })
    }

    /// Current point balance for a household. Households that were never
    /// awarded get a synthetic zero-point record; no row is created.
    ///
    /// # Errors
    ///
    /// Propagates storage errors from the incentive store.
    pub async fn incentive_for(&self, household: &HouseholdId) -> Result<Incentive, CoreError> {
        let balance = self.backend.incentives.balance(household).await?;
        Ok(balance.unwrap_or_else(|| Incentive::zero(household.clone())))
    }
}

