/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Slack added to every edge of a bounding box, in degrees (roughly 1cm).
/// Absorbs rounding so that points exactly on the search circle stay inside.
const BOUNDING_BOX_PADDING_DEG: f64 = 1e-7;

/// Above this `sin(angular radius) / cos(latitude)` the arcsine of the
/// longitude bound is too ill-conditioned to trust; all longitudes are used.
const MAX_LONGITUDE_RATIO: f64 = 1.0 - 1e-9;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

pub fn is_valid_latitude(latitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude)
}

pub fn is_valid_longitude(longitude: f64) -> bool {
    (-180.0..=180.0).contains(&longitude)
}

/// Great-circle distance in meters between two points given in degrees.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push `a` slightly above one for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Longitudes covered by a bounding box. Every interval lies within
/// `[-180, 180]`; a box crossing the antimeridian is split in two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LongitudeRange {
    Full,
    Span(f64, f64),
    Split((f64, f64), (f64, f64)),
}

impl LongitudeRange {
    pub fn intervals(&self) -> Vec<(f64, f64)> {
        match *self {
            LongitudeRange::Full => vec![(-180.0, 180.0)],
            LongitudeRange::Span(min, max) => vec![(min, max)],
            LongitudeRange::Split(a, b) => vec![a, b],
        }
    }

    pub fn contains(&self, longitude: f64) -> bool {
        self.intervals()
            .iter()
            .any(|(min, max)| (*min..=*max).contains(&longitude))
    }
}

/// A latitude/longitude rectangle containing every point within some
/// great-circle distance of a center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub longitudes: LongitudeRange,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && self.longitudes.contains(longitude)
    }
}

/// Computes a bounding box that contains the spherical cap of `radius_m`
/// meters around (`lat`, `lon`). The box may be larger than the cap, never
/// smaller. Caps touching a pole cover all longitudes.
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_m: f64) -> BoundingBox {
    let angular = radius_m / EARTH_RADIUS_M;
    if angular >= std::f64::consts::PI {
        return BoundingBox {
            min_lat: -90.0,
            max_lat: 90.0,
            longitudes: LongitudeRange::Full,
        };
    }

    // Latitude bounds
    let angular_deg = to_degrees(angular);
    let min_lat = lat - angular_deg - BOUNDING_BOX_PADDING_DEG;
    let max_lat = lat + angular_deg + BOUNDING_BOX_PADDING_DEG;
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return BoundingBox {
            min_lat: min_lat.max(-90.0),
            max_lat: max_lat.min(90.0),
            longitudes: LongitudeRange::Full,
        };
    }

    // Longitude bounds (adjusted by latitude)
    let ratio = angular.sin() / to_radians(lat).cos();
    if ratio >= MAX_LONGITUDE_RATIO {
        return BoundingBox {
            min_lat,
            max_lat,
            longitudes: LongitudeRange::Full,
        };
    }
    let delta_lon = to_degrees(ratio.asin()) + BOUNDING_BOX_PADDING_DEG;
    if delta_lon >= 180.0 {
        return BoundingBox {
            min_lat,
            max_lat,
            longitudes: LongitudeRange::Full,
        };
    }

    let min_lon = lon - delta_lon;
    let max_lon = lon + delta_lon;
    let longitudes = if min_lon < -180.0 {
        LongitudeRange::Split((min_lon + 360.0, 180.0), (-180.0, max_lon))
    } else if max_lon > 180.0 {
        LongitudeRange::Split((-180.0, max_lon - 360.0), (min_lon, 180.0))
    } else {
        LongitudeRange::Span(min_lon, max_lon)
    };

    BoundingBox {
        min_lat,
        max_lat,
        longitudes,
    }
}
