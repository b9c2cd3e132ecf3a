use std::{error::Error, fmt, str::FromStr};

use chrono::{DateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{geo, id::HasId};

use crate::ExampleData;

/// Drone categories a spot can be suitable for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    JsonSchema,
)]
pub enum DroneType {
    #[serde(rename = "tinywhoop")]
    Tinywhoop,
    #[serde(rename = "toothpick")]
    Toothpick,
    #[serde(rename = "5-inch")]
    FiveInch,
}

impl DroneType {
    pub const ALL: [DroneType; 3] =
        [DroneType::Tinywhoop, DroneType::Toothpick, DroneType::FiveInch];

    pub fn as_str(&self) -> &'static str {
        match self {
            DroneType::Tinywhoop => "tinywhoop",
            DroneType::Toothpick => "toothpick",
            DroneType::FiveInch => "5-inch",
        }
    }
}

impl fmt::Display for DroneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDroneType(pub String);

impl fmt::Display for UnknownDroneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown drone type '{}'", self.0)
    }
}

impl Error for UnknownDroneType {}

impl FromStr for DroneType {
    type Err = UnknownDroneType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DroneType::ALL
            .into_iter()
            .find(|drone_type| drone_type.as_str() == s)
            .ok_or_else(|| UnknownDroneType(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in meters.
    pub fn distance_to(&self, other: &Location) -> f64 {
        geo::haversine_distance(self.lat, self.lng, other.lat, other.lng)
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DroneSpot {
    pub name: String,
    pub description: Option<String>,
    pub types: Vec<DroneType>,
    pub location: Location,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DroneSpot {
    /// Stamps a creation request with the time it was stored at.
    pub fn created(spot: NewDroneSpot, now: DateTime<Utc>) -> Self {
        Self {
            name: spot.name,
            description: spot.description,
            types: spot.types,
            location: spot.location,
            created_at: now,
            updated_at: now,
        }
    }
}

impl HasId for DroneSpot {
    type IdType = String;
}

impl ExampleData for DroneSpot {
    fn example_data() -> Self {
        let stored_at = Utc
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .unwrap_or_default();
        DroneSpot::created(NewDroneSpot::example_data(), stored_at)
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDroneSpot {
    pub name: String,
    pub description: Option<String>,
    pub types: Vec<DroneType>,
    pub location: Location,
}

impl ExampleData for NewDroneSpot {
    fn example_data() -> Self {
        NewDroneSpot {
            name: "Schrevenpark".to_owned(),
            description: Some("Open lawn, quiet in the early morning.".to_owned()),
            types: vec![DroneType::Tinywhoop, DroneType::Toothpick],
            location: Location::new(54.3288, 10.1232),
        }
    }
}
