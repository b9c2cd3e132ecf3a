use model::spot::{DroneSpot, Location};
use utility::id::Id;

use super::{in_radius, SpatialIndex};

/// Checks the distance to every entry on each query.
#[derive(Debug, Clone, Default)]
pub struct LinearIndex {
    entries: Vec<(Id<DroneSpot>, Location)>,
}

impl LinearIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpatialIndex for LinearIndex {
    fn insert(&mut self, id: Id<DroneSpot>, location: Location) {
        self.entries.push((id, location));
    }

    fn within(&self, center: &Location, radius_m: f64) -> Vec<Id<DroneSpot>> {
        self.entries
            .iter()
            .filter(|(_, location)| in_radius(center, location, radius_m))
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
