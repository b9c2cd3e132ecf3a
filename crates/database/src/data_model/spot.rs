use chrono::{DateTime, Utc};
use model::spot::{DroneSpot, DroneType, Location};
use spots::database::{DatabaseError, Result};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct SpotRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub types: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DatabaseRow for SpotRow {
    type Model = DroneSpot;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id.clone())
    }

    fn to_model(self) -> Result<Self::Model> {
        let types = self
            .types
            .iter()
            .map(|name| name.parse::<DroneType>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(DatabaseError::other)?;
        Ok(DroneSpot {
            name: self.name,
            description: self.description,
            types,
            location: Location::new(self.latitude, self.longitude),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Drone type names as stored in the `types` column.
pub(crate) fn type_names(spot: &DroneSpot) -> Vec<String> {
    spot.types
        .iter()
        .map(|drone_type| drone_type.as_str().to_owned())
        .collect()
}
