//! Mutex-guarded incentive ledger.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use safai_core::model::{HouseholdId, Incentive};
use safai_core::ports::{CoreError, IncentiveStore};

/// Incentive ledger holding all balances in a mutex-guarded map.
///
/// `credit` increments (or lazily creates) the row and reads the new total
/// inside one lock acquisition, so concurrent awards for the same household
/// never lose updates.
#[derive(Default)]
pub struct MemoryIncentiveStore {
    balances: Mutex<HashMap<HouseholdId, u64>>,
}

impl MemoryIncentiveStore {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<MutexGuard<'_, HashMap<HouseholdId, u64>>, CoreError> {
        self.balances
            .lock()
            .map_err(|_poisoned| CoreError::Storage("incentive ledger lock poisoned".to_owned()))
    }
}

#[async_trait]
impl IncentiveStore for MemoryIncentiveStore {
    async fn credit(&self, household: &HouseholdId, points: u64) -> Result<Incentive, CoreError> {
        let mut balances = self.guard()?;
        let total = balances.entry(household.clone()).or_insert(0);
        *total += points;
        Ok(Incentive {
            household_id: household.clone(),
            points: *total,
        })
    }

    async fn balance(&self, household: &HouseholdId) -> Result<Option<Incentive>, CoreError> {
        let balances = self.guard()?;
        Ok(balances.get(household).map(|points| Incentive {
            household_id: household.clone(),
            points: *points,
        }))
    }
}
