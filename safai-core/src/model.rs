//! Domain data structures for pickups, households, incentives, and routes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a household registered with the ward.
pub struct HouseholdId(pub String);

impl fmt::Display for HouseholdId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a single pickup request.
pub struct PickupId(pub String);

impl PickupId {
    /// Mint a fresh identifier for a newly created pickup.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for PickupId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Waste categories a citizen can request a pickup for.
pub enum WasteType {
    /// Kitchen and other biodegradable waste.
    Wet,
    /// Recyclable dry waste.
    Dry,
    /// Electronic waste.
    #[serde(rename = "e-waste")]
    EWaste,
    /// Category recorded by another system that this engine does not know.
    ///
    /// Not reachable through [`WasteType::from_str`]; kept so deserializing
    /// foreign records stays total.
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for WasteType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            WasteType::Wet => "wet",
            WasteType::Dry => "dry",
            WasteType::EWaste => "e-waste",
            WasteType::Other(name) => name.as_str(),
        };
        write!(formatter, "{slug}")
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Unknown waste type: {0} (expected wet, dry, or e-waste)")]
/// Raised when parsing a waste type outside the closed enumeration.
pub struct UnknownWasteType(pub String);

impl FromStr for WasteType {
    type Err = UnknownWasteType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "wet" => Ok(WasteType::Wet),
            "dry" => Ok(WasteType::Dry),
            "e-waste" => Ok(WasteType::EWaste),
            other => Err(UnknownWasteType(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Lifecycle state of a pickup request.
pub enum PickupStatus {
    /// Created by a citizen, waiting for a collector.
    Pending,
    /// Claimed by a collector for the current shift.
    Assigned,
    /// Terminal state; set once, never left.
    Completed,
}

impl fmt::Display for PickupStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            PickupStatus::Pending => "pending",
            PickupStatus::Assigned => "assigned",
            PickupStatus::Completed => "completed",
        };
        write!(formatter, "{slug}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Latitude/longitude pair as reported by a citizen's device or the registry.
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A citizen-initiated service request and its lifecycle state.
pub struct PickupRequest {
    /// Unique identifier, assigned at creation.
    pub id: PickupId,
    /// Household the pickup belongs to; never validated against the registry.
    pub household_id: HouseholdId,
    /// Declared waste category; immutable after creation.
    pub waste_type: WasteType,
    /// Requested time slot. Ordering key only, never a deadline.
    pub pickup_time: DateTime<Utc>,
    /// Urgent/overfull bin flag. Display only; does not reorder the route.
    pub overflow: bool,
    /// Citizen-supplied coordinate, if their device reported one.
    pub location: Option<GeoPoint>,
    /// Current lifecycle state.
    pub status: PickupStatus,
    /// Whether a collector confirmed correct waste segregation.
    pub segregation_verified: bool,
    /// Principal id of the collector who claimed this pickup.
    pub assigned_to: Option<String>,
    /// Principal id of whoever completed the pickup; set once.
    pub completed_by: Option<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
/// Input for creating a pickup request.
pub struct NewPickup {
    /// Household requesting the pickup.
    pub household_id: HouseholdId,
    /// Declared waste category.
    pub waste_type: WasteType,
    /// Requested time slot.
    pub pickup_time: DateTime<Utc>,
    /// Urgent/overfull bin flag.
    pub overflow: bool,
    /// Optional coordinate from the citizen's device.
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Per-household cumulative point balance.
pub struct Incentive {
    /// Household the balance belongs to.
    pub household_id: HouseholdId,
    /// Accumulated points; never decreases.
    pub points: u64,
}

impl Incentive {
    /// Synthetic zero-point balance for a household with no stored row.
    #[must_use]
    pub fn zero(household_id: HouseholdId) -> Self {
        Self {
            household_id,
            points: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Directory record for a registered household.
pub struct HouseholdInfo {
    /// Registry identifier.
    pub household_id: HouseholdId,
    /// Service area the household belongs to.
    pub area: String,
    /// Registered coordinate, when the registry has one.
    pub location: Option<GeoPoint>,
    /// Name of the head of the household.
    pub head_name: Option<String>,
    /// Free-form note helping collectors find the address.
    pub address_note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Role attached to a principal by the external identity provider.
pub enum Role {
    /// Resident submitting pickup requests.
    Citizen,
    /// Field collector working a shift.
    Collector,
    /// Municipal administrator.
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Authenticated caller as handed over by the identity layer.
pub struct Principal {
    /// Opaque identity provider id.
    pub id: String,
    /// Role the identity provider assigned.
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One stop in a collector's ordered shift route.
pub struct RouteStep {
    /// 1-based position in the route.
    pub sequence: u32,
    /// Pickup served at this stop.
    pub pickup_id: PickupId,
    /// Household served at this stop.
    pub household_id: HouseholdId,
    /// Resolved service area, or "Unknown" on a registry miss.
    pub area: String,
    /// Declared waste category.
    pub waste_type: WasteType,
    /// Citizen's requested time slot.
    pub pickup_time: DateTime<Utc>,
    /// Urgent/overfull bin flag, surfaced for visual prioritization.
    pub overflow: bool,
    /// Effective coordinate: citizen-supplied, else the registry's.
    pub location: Option<GeoPoint>,
    /// Human-readable justification naming the area and stop number.
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ordered visiting sequence for a collector's shift.
pub struct Route {
    /// How the ordering heuristic works, for supervisors auditing the route.
    pub explanation: String,
    /// The ward-loop area order the route was sorted by.
    pub area_order: Vec<String>,
    /// Stops in visiting order.
    pub steps: Vec<RouteStep>,
}
