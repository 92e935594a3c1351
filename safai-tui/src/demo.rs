//! Seed data for the demo ward: a registry snapshot and a shift's worth of
//! pickup requests.

use anyhow::Result;
use chrono::{Duration, Utc};

use safai_core::model::{GeoPoint, HouseholdId, HouseholdInfo, NewPickup, WasteType};
use safai_core::service::SafaiService;

/// Default area traversal order for ward 4, starting near the ward office.
pub(crate) const DEFAULT_WARD_LOOP: [&str; 10] = [
    "Bhetapara - Lane 1",
    "Bhetapara - Lane 2",
    "Bhetapara - Lane 3",
    "Bhangagarh - Block A",
    "Bhangagarh - Block B",
    "GS Road - Point 1",
    "GS Road - Point 2",
    "GS Road - Point 3",
    "Beltola - Market Side",
    "Beltola - Residential Cluster",
];

fn household(
    id: &str,
    area: &str,
    head_name: &str,
    location: Option<GeoPoint>,
) -> HouseholdInfo {
    HouseholdInfo {
        household_id: HouseholdId(id.to_owned()),
        area: area.to_owned(),
        location,
        head_name: Some(head_name.to_owned()),
        address_note: None,
    }
}

/// Registry snapshot used when no live registry URL is configured.
pub(crate) fn demo_households() -> Vec<HouseholdInfo> {
    vec![
        household(
            "H001",
            "Bhetapara - Lane 1",
            "R. Das",
            Some(GeoPoint {
                lat: 26.1196,
                lng: 91.7898,
            }),
        ),
        household("H002", "Bhetapara - Lane 2", "M. Saikia", None),
        household(
            "H003",
            "Bhangagarh - Block A",
            "P. Baruah",
            Some(GeoPoint {
                lat: 26.1541,
                lng: 91.7709,
            }),
        ),
        household("H004", "GS Road - Point 2", "A. Kalita", None),
        household(
            "H005",
            "Beltola - Market Side",
            "S. Bora",
            Some(GeoPoint {
                lat: 26.1069,
                lng: 91.8011,
            }),
        ),
    ]
}

/// Create a shift's worth of pending pickups. One household (H999) is
/// deliberately absent from the registry so the "Unknown" degradation is
/// visible on the route screen.
pub(crate) async fn seed_pickups(service: &SafaiService) -> Result<()> {
    let shift_start = Utc::now();

    let seeds: [(&str, WasteType, i64, bool); 7] = [
        ("H005", WasteType::Wet, 30, false),
        ("H001", WasteType::Dry, 45, false),
        ("H003", WasteType::EWaste, 60, false),
        ("H002", WasteType::Wet, 75, true),
        ("H001", WasteType::Wet, 90, false),
        ("H004", WasteType::Dry, 120, false),
        ("H999", WasteType::Wet, 150, false),
    ];

    for (household_id, waste_type, minutes, overflow) in seeds {
        service
            .create_pickup(NewPickup {
                household_id: HouseholdId(household_id.to_owned()),
                waste_type,
                pickup_time: shift_start + Duration::minutes(minutes),
                overflow,
                location: None,
            })
            .await?;
    }

    Ok(())
}
