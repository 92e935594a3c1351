//! Household directory adapter for the municipal ward registry REST service.
//!
//! The registry is read-only to the engine. A household the registry does
//! not know is a lookup miss, never an error; the route heuristic degrades
//! it to an "Unknown" area on its own.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use safai_core::{
    model::{GeoPoint, HouseholdId, HouseholdInfo},
    ports::{CoreError, HouseholdDirectory},
};

/// Response wrapper from /households
#[derive(Debug, Deserialize)]
struct HouseholdsResponse {
    data: Vec<HouseholdEntry>,
}

/// Single household record as the registry serves it.
#[derive(Debug, Deserialize)]
struct HouseholdEntry {
    #[serde(rename = "householdId")]
    household_id: String,

    area: String,

    #[serde(default)]
    location: Option<LocationEntry>,

    #[serde(default, rename = "headName")]
    head_name: Option<String>,
    #[serde(default, rename = "addressNote")]
    address_note: Option<String>,
}

/// Coordinate pair; the registry sometimes stores only one half.
#[derive(Debug, Deserialize)]
struct LocationEntry {
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

/// Directory implementation backed by the ward registry HTTP API.
pub struct WardRegistryDirectory {
    client: Client,
    base_url: String,
}

impl WardRegistryDirectory {
    /// Create a directory bound to the given HTTP client and registry base
    /// URL (for example `https://registry.ward4.example/api`).
    #[must_use]
    pub fn new<U: Into<String>>(client: Client, base_url: U) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }
}

#[async_trait]
impl HouseholdDirectory for WardRegistryDirectory {
    async fn lookup(&self, household: &HouseholdId) -> Result<Option<HouseholdInfo>, CoreError> {
        let response = self
            .client
            .get(format!("{}/households/{}", self.base_url, household.0))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let entry: HouseholdEntry = response.error_for_status()?.json().await?;
        Ok(Some(into_info(entry)))
    }

    async fn lookup_many(
        &self,
        households: &[HouseholdId],
    ) -> Result<HashMap<HouseholdId, HouseholdInfo>, CoreError> {
        if households.is_empty() {
            return Ok(HashMap::new());
        }

        let ids = households
            .iter()
            .map(|household| household.0.as_str())
            .collect::<Vec<&str>>()
            .join(",");

        let request = self
            .client
            .get(format!("{}/households", self.base_url))
            .query(&[("ids", ids.as_str())]);

        let response = fetch_json::<HouseholdsResponse>(request).await?;

        Ok(response
            .data
            .into_iter()
            .map(into_info)
            .map(|info| (info.household_id.clone(), info))
            .collect())
    }
}

/// Map a registry record to the core model. Half-stored coordinates are
/// treated as absent.
fn into_info(entry: HouseholdEntry) -> HouseholdInfo {
    let location = entry.location.and_then(|coord| match (coord.lat, coord.lng) {
        (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
        _ => None,
    });

    HouseholdInfo {
        household_id: HouseholdId(entry.household_id),
        area: entry.area,
        location,
        head_name: entry.head_name,
        address_note: entry.address_note,
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, CoreError> {
    request
        .send()
        .await
        .map_err(CoreError::from)?
        .error_for_status()
        .map_err(CoreError::from)?
        .json()
        .await
        .map_err(CoreError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_maps_full_record() {
        let raw = r#"{
            "householdId": "H001",
            "area": "Bhetapara - Lane 1",
            "headName": "R. Das",
            "addressNote": "Blue gate opposite the pharmacy",
            "location": { "lat": 26.1158, "lng": 91.7086 }
        }"#;
        let entry: HouseholdEntry = serde_json::from_str(raw).expect("parse");
        let info = into_info(entry);

        assert_eq!(info.household_id.0, "H001");
        assert_eq!(info.area, "Bhetapara - Lane 1");
        assert_eq!(info.head_name.as_deref(), Some("R. Das"));
        assert!(info.location.is_some());
    }

    #[test]
    fn half_stored_coordinate_maps_to_none() {
        let raw = r#"{
            "householdId": "H002",
            "area": "Beltola - Market Side",
            "location": { "lat": 26.1158 }
        }"#;
        let entry: HouseholdEntry = serde_json::from_str(raw).expect("parse");
        let info = into_info(entry);
        assert!(info.location.is_none(), "lat without lng is unusable");
    }

    #[test]
    fn optional_fields_default_to_absent() {
        let raw = r#"{ "householdId": "H003", "area": "GS Road - Point 2" }"#;
        let entry: HouseholdEntry = serde_json::from_str(raw).expect("parse");
        let info = into_info(entry);
        assert!(info.location.is_none());
        assert!(info.head_name.is_none());
        assert!(info.address_note.is_none());
    }

    #[test]
    fn batch_wrapper_parses() {
        let raw = r#"{ "data": [
            { "householdId": "H001", "area": "Bhetapara - Lane 1" },
            { "householdId": "H002", "area": "Beltola - Market Side" }
        ] }"#;
        let response: HouseholdsResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(response.data.len(), 2);
    }
}
