//! Deterministic route ordering for a collector's shift.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::model::{HouseholdId, PickupRequest, PickupStatus, Route, RouteStep};
use crate::ports::{CoreError, HouseholdDirectory, PickupFilter, PickupStore};

/// Area sentinel for pickups whose household the registry does not know.
pub const UNKNOWN_AREA: &str = "Unknown";

/// One-paragraph summary of the heuristic, attached to every route so a
/// ward supervisor can audit the ordering.
const ROUTE_EXPLANATION: &str = "Simple greedy routing: group by area and visit areas in a fixed \
     loop to avoid zig-zagging across the ward. Within each area, earlier pickup times are \
     served first.";

/// Fixed, ordered traversal sequence over the ward's named service areas.
///
/// Injected configuration, not a constant: ward boundaries change without
/// code changes.
#[derive(Debug, Clone)]
pub struct WardLoop {
    areas: Vec<String>,
}

impl WardLoop {
    /// Build a ward loop from an ordered area list.
    #[must_use]
    pub fn new(areas: Vec<String>) -> Self {
        Self { areas }
    }

    /// The configured area order.
    #[must_use]
    pub fn areas(&self) -> &[String] {
        &self.areas
    }

    /// Zero-based position of an area within the loop. Areas the loop does
    /// not know rank after every known area.
    #[must_use]
    pub fn rank(&self, area: &str) -> usize {
        self.areas
            .iter()
            .position(|known| known == area)
            .unwrap_or(self.areas.len() + 1)
    }
}

/// Computes the ordered visiting sequence over all pending pickups.
///
/// Intentionally not distance-optimal: the fixed ward loop trades route
/// length for predictability and operator auditability.
pub struct DispatchEngine {
    pickups: Arc<dyn PickupStore>,
    directory: Arc<dyn HouseholdDirectory>,
    ward_loop: WardLoop,
}

impl DispatchEngine {
    /// Create an engine over the given store, registry, and ward loop.
    #[must_use]
    pub fn new(
        pickups: Arc<dyn PickupStore>,
        directory: Arc<dyn HouseholdDirectory>,
        ward_loop: WardLoop,
    ) -> Self {
        Self {
            pickups,
            directory,
            ward_loop,
        }
    }

    /// Compute the shift route over all pending pickups.
    ///
    /// Pickups are enriched with the registry's area (or "Unknown" on a
    /// miss) and an effective location (citizen-supplied first, then the
    /// household's registered coordinate), then stable-sorted by
    /// `(area rank, pickup_time)`. Zero pending pickups yield an empty
    /// route, not an error.
    ///
    /// # Errors
    ///
    /// Propagates storage and registry transport failures.
    pub async fn generate_route(&self) -> Result<Route, CoreError> {
        let pending = self
            .pickups
            .list(&PickupFilter::with_status(PickupStatus::Pending))
            .await?;

        if pending.is_empty() {
            return Ok(self.empty_route());
        }

        let mut seen = HashSet::new();
        let mut involved: Vec<HouseholdId> = Vec::new();
        for pickup in &pending {
            if seen.insert(pickup.household_id.clone()) {
                involved.push(pickup.household_id.clone());
            }
        }

        let households = self.directory.lookup_many(&involved).await?;

        let mut enriched: Vec<(usize, String, PickupRequest)> = pending
            .into_iter()
            .map(|mut pickup| {
                let info = households.get(&pickup.household_id);
                let area = info.map_or_else(|| UNKNOWN_AREA.to_owned(), |entry| entry.area.clone());
                // Prefer the citizen's geolocation, fall back to the
                // household's registered coordinate.
                pickup.location = pickup
                    .location
                    .or_else(|| info.and_then(|entry| entry.location));
                (self.ward_loop.rank(&area), area, pickup)
            })
            .collect();

        // Stable: equal (rank, time) pairs keep their pre-sort order.
        enriched.sort_by_key(|(rank, _, pickup)| (*rank, pickup.pickup_time));

        let steps: Vec<RouteStep> = enriched
            .into_iter()
            .enumerate()
            .map(|(index, (_, area, pickup))| {
                let sequence = u32::try_from(index + 1).unwrap_or(u32::MAX);
                let explanation = format!(
                    "Visit {area} (household {household}) as stop #{sequence} to reduce \
                     back-and-forth between areas.",
                    household = pickup.household_id
                );
                RouteStep {
                    sequence,
                    pickup_id: pickup.id,
                    household_id: pickup.household_id,
                    area,
                    waste_type: pickup.waste_type,
                    pickup_time: pickup.pickup_time,
                    overflow: pickup.overflow,
                    location: pickup.location,
                    explanation,
                }
            })
            .collect();

        debug!(stops = steps.len(), "shift route assembled");

        Ok(Route {
            explanation: ROUTE_EXPLANATION.to_owned(),
            area_order: self.ward_loop.areas().to_vec(),
            steps,
        })
    }

    fn empty_route(&self) -> Route {
        Route {
            explanation: ROUTE_EXPLANATION.to_owned(),
            area_order: self.ward_loop.areas().to_vec(),
            steps: Vec::new(),
        }
    }
}

