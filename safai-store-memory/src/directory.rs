//! Map-backed household directory for demos and tests.

use std::collections::HashMap;

use async_trait::async_trait;

use safai_core::model::{HouseholdId, HouseholdInfo};
use safai_core::ports::{CoreError, HouseholdDirectory};

/// Read-only directory built from a fixed household list.
pub struct StaticDirectory {
    households: HashMap<HouseholdId, HouseholdInfo>,
}

impl StaticDirectory {
    /// Build a directory from the given households.
    #[must_use]
    pub fn new(entries: Vec<HouseholdInfo>) -> Self {
        let households = entries
            .into_iter()
            .map(|info| (info.household_id.clone(), info))
            .collect();
        Self { households }
    }
}

#[async_trait]
impl HouseholdDirectory for StaticDirectory {
    async fn lookup(&self, household: &HouseholdId) -> Result<Option<HouseholdInfo>, CoreError> {
        Ok(self.households.get(household).cloned())
    }
}
