//! Mutex-guarded pickup record store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use safai_core::model::{PickupId, PickupRequest, PickupStatus};
use safai_core::ports::{CoreError, PickupFilter, PickupStore};

/// Pickup store holding all records in a mutex-guarded map.
///
/// Every transition runs under the lock, which makes each trait method the
/// atomic primitive the port contract requires: two completions racing on
/// one pickup serialize here, and exactly one of them wins.
#[derive(Default)]
pub struct MemoryPickupStore {
    records: Mutex<HashMap<PickupId, PickupRequest>>,
}

impl MemoryPickupStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<MutexGuard<'_, HashMap<PickupId, PickupRequest>>, CoreError> {
        self.records
            .lock()
            .map_err(|_poisoned| CoreError::Storage("pickup store lock poisoned".to_owned()))
    }
}

#[async_trait]
impl PickupStore for MemoryPickupStore {
    async fn insert(&self, pickup: PickupRequest) -> Result<PickupRequest, CoreError> {
        let mut records = self.guard()?;
        records.insert(pickup.id.clone(), pickup.clone());
        Ok(pickup)
    }

    async fn get(&self, id: &PickupId) -> Result<Option<PickupRequest>, CoreError> {
        let records = self.guard()?;
        Ok(records.get(id).cloned())
    }

    async fn list(&self, filter: &PickupFilter) -> Result<Vec<PickupRequest>, CoreError> {
        let records = self.guard()?;
        let mut matching: Vec<PickupRequest> = records
            .values()
            .filter(|pickup| filter.matches(pickup))
            .cloned()
            .collect();
        matching.sort_by_key(|pickup| pickup.pickup_time);
        Ok(matching)
    }

    async fn set_segregation(
        &self,
        id: &PickupId,
        verified: bool,
    ) -> Result<PickupRequest, CoreError> {
        let mut records = self.guard()?;
        let pickup = records
            .get_mut(id)
            .ok_or_else(|| CoreError::pickup_not_found(id))?;
        if pickup.status == PickupStatus::Completed {
            return Err(CoreError::AlreadyCompleted(id.clone()));
        }
        pickup.segregation_verified = verified;
        Ok(pickup.clone())
    }

    async fn assign(&self, id: &PickupId, collector_id: &str) -> Result<PickupRequest, CoreError> {
        let mut records = self.guard()?;
        let pickup = records
            .get_mut(id)
            .ok_or_else(|| CoreError::pickup_not_found(id))?;
        if pickup.status == PickupStatus::Completed {
            return Err(CoreError::AlreadyCompleted(id.clone()));
        }
        pickup.status = PickupStatus::Assigned;
        pickup.assigned_to = Some(collector_id.to_owned());
        Ok(pickup.clone())
    }

    async fn complete(
        &self,
        id: &PickupId,
        completed_by: &str,
    ) -> Result<PickupRequest, CoreError> {
        let mut records = self.guard()?;
        let pickup = records
            .get_mut(id)
            .ok_or_else(|| CoreError::pickup_not_found(id))?;
        if pickup.status == PickupStatus::Completed {
            return Err(CoreError::AlreadyCompleted(id.clone()));
        }
        pickup.status = PickupStatus::Completed;
        pickup.completed_by = Some(completed_by.to_owned());
        Ok(pickup.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use safai_core::model::{HouseholdId, NewPickup, WasteType};

    use super::*;

    fn sample(household: &str, hour: u32) -> PickupRequest {
        let input = NewPickup {
            household_id: HouseholdId(household.to_owned()),
            waste_type: WasteType::Wet,
            pickup_time: Utc
                .with_ymd_and_hms(2025, 3, 14, hour, 0, 0)
                .single()
                .expect("valid timestamp"),
            overflow: false,
            location: None,
        };
        PickupRequest {
            id: PickupId::generate(),
            household_id: input.household_id,
            waste_type: input.waste_type,
            pickup_time: input.pickup_time,
            overflow: input.overflow,
            location: input.location,
            status: PickupStatus::Pending,
            segregation_verified: false,
            assigned_to: None,
            completed_by: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn list_sorts_by_pickup_time() {
        let store = MemoryPickupStore::new();
        store.insert(sample("H2", 11)).await.expect("insert");
        store.insert(sample("H1", 9)).await.expect("insert");
        store.insert(sample("H3", 10)).await.expect("insert");

        let listed = store.list(&PickupFilter::all()).await.expect("list");
        let households: Vec<&str> = listed
            .iter()
            .map(|pickup| pickup.household_id.0.as_str())
            .collect();
        assert_eq!(households, ["H1", "H3", "H2"], "expected ascending slots");
    }

    #[tokio::test]
    async fn list_filters_by_status_and_household() {
        let store = MemoryPickupStore::new();
        let open = store.insert(sample("H1", 9)).await.expect("insert");
        let done = store.insert(sample("H1", 10)).await.expect("insert");
        store.insert(sample("H2", 11)).await.expect("insert");
        store.complete(&done.id, "col-1").await.expect("complete");

        let filter = PickupFilter {
            status: Some(PickupStatus::Pending),
            household: Some(HouseholdId("H1".to_owned())),
        };
        let listed = store.list(&filter).await.expect("list");
        assert_eq!(listed.len(), 1, "one pending pickup for H1");
        assert_eq!(listed.first().map(|pickup| pickup.id.clone()), Some(open.id));
    }

    #[tokio::test]
    async fn complete_is_single_shot() {
        let store = MemoryPickupStore::new();
        let stored = store.insert(sample("H1", 9)).await.expect("insert");

        let first = store.complete(&stored.id, "col-1").await.expect("complete");
        assert_eq!(first.status, PickupStatus::Completed);
        assert_eq!(first.completed_by.as_deref(), Some("col-1"));

        let second = store.complete(&stored.id, "col-2").await;
        assert!(
            matches!(second, Err(CoreError::AlreadyCompleted(ref id)) if *id == stored.id),
            "repeat completion must be rejected"
        );
    }

    #[tokio::test]
    async fn segregation_flag_is_frozen_after_completion() {
        let store = MemoryPickupStore::new();
        let stored = store.insert(sample("H1", 9)).await.expect("insert");
        store.complete(&stored.id, "col-1").await.expect("complete");

        let outcome = store.set_segregation(&stored.id, true).await;
        assert!(
            matches!(outcome, Err(CoreError::AlreadyCompleted(_))),
            "flag must not drift after the payout decision"
        );
    }

    #[tokio::test]
    async fn assign_claims_and_rejects_completed() {
        let store = MemoryPickupStore::new();
        let stored = store.insert(sample("H1", 9)).await.expect("insert");

        let claimed = store.assign(&stored.id, "col-1").await.expect("assign");
        assert_eq!(claimed.status, PickupStatus::Assigned);
        assert_eq!(claimed.assigned_to.as_deref(), Some("col-1"));

        // Handover to another collector is allowed while not completed.
        let handover = store.assign(&stored.id, "col-2").await.expect("assign");
        assert_eq!(handover.assigned_to.as_deref(), Some("col-2"));

        store.complete(&stored.id, "col-2").await.expect("complete");
        let late = store.assign(&stored.id, "col-3").await;
        assert!(matches!(late, Err(CoreError::AlreadyCompleted(_))));
    }

    #[tokio::test]
    async fn missing_pickup_is_not_found() {
        let store = MemoryPickupStore::new();
        let ghost = PickupId("no-such".to_owned());
        let outcome = store.complete(&ghost, "col-1").await;
        assert!(matches!(outcome, Err(CoreError::NotFound { .. })));
    }
}
