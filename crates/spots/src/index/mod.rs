//! Spatial indexes answering "which spots lie within `r` meters of a point".
//!
//! Distances are haversine great-circle distances on a sphere of mean earth
//! radius. The search circle is closed: a spot at exactly `r` meters matches.
//!
//! [`LinearIndex`] scans every entry and is the reference for correctness.
//! [`GridIndex`] buckets entries into lat/lng cells and only visits the cells
//! overlapping the search circle; it returns the same ids as the linear scan.

use model::spot::{DroneSpot, Location};
use utility::id::Id;

mod grid;
mod linear;

pub use grid::{GridIndex, DEFAULT_CELL_DEGREES};
pub use linear::LinearIndex;

pub trait SpatialIndex: Send + Sync + 'static {
    /// Adds a spot. Entries are never removed.
    fn insert(&mut self, id: Id<DroneSpot>, location: Location);

    /// Ids of all entries within `radius_m` meters of `center`, in insertion
    /// order.
    fn within(&self, center: &Location, radius_m: f64) -> Vec<Id<DroneSpot>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The match predicate shared by all indexes.
pub(crate) fn in_radius(center: &Location, location: &Location, radius_m: f64) -> bool {
    center.distance_to(location) <= radius_m
}
