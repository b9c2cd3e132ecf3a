use std::{collections::BTreeMap, ops::RangeInclusive};

use model::spot::{DroneSpot, Location};
use utility::{geo, id::Id};

use super::{in_radius, SpatialIndex};

/// Default cell edge length in degrees (about 11km of latitude).
pub const DEFAULT_CELL_DEGREES: f64 = 0.1;

type Cell = (i32, i32);

#[derive(Debug, Clone)]
struct Entry {
    id: Id<DroneSpot>,
    location: Location,
}

/// Buckets entries into cells of `cell_degrees` × `cell_degrees`. A query
/// visits every cell overlapping the bounding box of the search circle, then
/// filters the candidates by haversine distance.
#[derive(Debug, Clone)]
pub struct GridIndex {
    cell_degrees: f64,
    rows: i32,
    columns: i32,
    entries: Vec<Entry>,
    // values are positions in `entries`
    cells: BTreeMap<Cell, Vec<usize>>,
}

impl GridIndex {
    /// Creates an empty grid. Cell sizes that are not positive, not finite or
    /// larger than the globe fall back to [`DEFAULT_CELL_DEGREES`].
    pub fn new(cell_degrees: f64) -> Self {
        let valid = cell_degrees.is_finite() && cell_degrees > 0.0 && cell_degrees <= 360.0;
        let cell_degrees = if valid {
            cell_degrees
        } else {
            log::warn!(
                "invalid grid cell size {}, using {}",
                cell_degrees,
                DEFAULT_CELL_DEGREES
            );
            DEFAULT_CELL_DEGREES
        };
        Self {
            cell_degrees,
            rows: (180.0 / cell_degrees).ceil() as i32,
            columns: (360.0 / cell_degrees).ceil() as i32,
            entries: Vec::new(),
            cells: BTreeMap::new(),
        }
    }

    pub fn cell_degrees(&self) -> f64 {
        self.cell_degrees
    }

    fn row(&self, lat: f64) -> i32 {
        (((lat + 90.0) / self.cell_degrees).floor() as i32).clamp(0, self.rows - 1)
    }

    fn column(&self, lng: f64) -> i32 {
        (((lng + 180.0) / self.cell_degrees).floor() as i32).clamp(0, self.columns - 1)
    }

    fn cell(&self, location: &Location) -> Cell {
        (self.row(location.lat), self.column(location.lng))
    }

    /// Positions of all entries in cells overlapping the bounding box.
    fn candidates(&self, bbox: &geo::BoundingBox) -> Vec<usize> {
        let rows = self.row(bbox.min_lat)..=self.row(bbox.max_lat);
        let columns = bbox
            .longitudes
            .intervals()
            .into_iter()
            .map(|(min, max)| self.column(min)..=self.column(max))
            .collect::<Vec<RangeInclusive<i32>>>();

        let covered_columns: u64 = columns.iter().map(span).sum();
        let covered_cells = span(&rows).saturating_mul(covered_columns);

        if covered_cells > self.cells.len() as u64 {
            // sparse grid: cheaper to walk the occupied cells
            self.cells
                .iter()
                .filter(|((row, column), _)| {
                    rows.contains(row) && columns.iter().any(|range| range.contains(column))
                })
                .flat_map(|(_, positions)| positions.iter().copied())
                .collect()
        } else {
            rows.flat_map(|row| {
                columns
                    .iter()
                    .flat_map(move |range| range.clone().map(move |column| (row, column)))
            })
            .filter_map(|cell| self.cells.get(&cell))
            .flat_map(|positions| positions.iter().copied())
            .collect()
        }
    }
}

fn span(range: &RangeInclusive<i32>) -> u64 {
    (i64::from(*range.end()) - i64::from(*range.start()) + 1).max(0) as u64
}

impl Default for GridIndex {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_DEGREES)
    }
}

impl SpatialIndex for GridIndex {
    fn insert(&mut self, id: Id<DroneSpot>, location: Location) {
        let cell = self.cell(&location);
        let position = self.entries.len();
        self.entries.push(Entry { id, location });
        self.cells.entry(cell).or_default().push(position);
    }

    fn within(&self, center: &Location, radius_m: f64) -> Vec<Id<DroneSpot>> {
        if self.entries.is_empty() {
            return vec![];
        }
        let bbox = geo::calculate_bounding_box(center.lat, center.lng, radius_m);
        let mut positions = self.candidates(&bbox);
        positions.retain(|&position| {
            let location = &self.entries[position].location;
            bbox.contains(location.lat, location.lng) && in_radius(center, location, radius_m)
        });
        // split longitude ranges may share a column
        positions.sort_unstable();
        positions.dedup();
        positions
            .into_iter()
            .map(|position| self.entries[position].id.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
