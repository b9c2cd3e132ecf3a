use std::{error::Error, fmt};

use model::spot::{Location, NewDroneSpot, UnknownDroneType};
use utility::geo;

/// A creation request that can not be stored.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyName,
    EmptyTypes,
    UnknownDroneType(String),
    Latitude(f64),
    Longitude(f64),
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "name",
            ValidationError::EmptyTypes | ValidationError::UnknownDroneType(_) => {
                "types"
            }
            ValidationError::Latitude(_) => "location.lat",
            ValidationError::Longitude(_) => "location.lng",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "name must not be empty"),
            ValidationError::EmptyTypes => {
                write!(f, "types must contain at least one drone type")
            }
            ValidationError::UnknownDroneType(name) => {
                write!(f, "types contains unknown drone type '{}'", name)
            }
            ValidationError::Latitude(lat) => {
                write!(f, "location.lat {} is outside of [-90, 90]", lat)
            }
            ValidationError::Longitude(lng) => {
                write!(f, "location.lng {} is outside of [-180, 180]", lng)
            }
        }
    }
}

impl Error for ValidationError {}

impl From<UnknownDroneType> for ValidationError {
    fn from(value: UnknownDroneType) -> Self {
        ValidationError::UnknownDroneType(value.0)
    }
}

/// A proximity query that can not be answered.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidQueryError {
    MissingCenter,
    Latitude(f64),
    Longitude(f64),
    Radius(f64),
}

impl InvalidQueryError {
    pub fn field(&self) -> &'static str {
        match self {
            InvalidQueryError::MissingCenter => "center",
            InvalidQueryError::Latitude(_) => "lat",
            InvalidQueryError::Longitude(_) => "lng",
            InvalidQueryError::Radius(_) => "radius",
        }
    }
}

impl fmt::Display for InvalidQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidQueryError::MissingCenter => {
                write!(f, "Latitude and longitude are required")
            }
            InvalidQueryError::Latitude(lat) => {
                write!(f, "lat {} is outside of [-90, 90]", lat)
            }
            InvalidQueryError::Longitude(lng) => {
                write!(f, "lng {} is outside of [-180, 180]", lng)
            }
            InvalidQueryError::Radius(radius) => {
                write!(f, "radius {} must be a positive number of meters", radius)
            }
        }
    }
}

impl Error for InvalidQueryError {}

/// Checks all preconditions of storing `spot`. The first violation found is
/// returned, in field order name, types, location.
pub fn validate_new_spot(spot: &NewDroneSpot) -> Result<(), ValidationError> {
    if spot.name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if spot.types.is_empty() {
        return Err(ValidationError::EmptyTypes);
    }
    if !geo::is_valid_latitude(spot.location.lat) {
        return Err(ValidationError::Latitude(spot.location.lat));
    }
    if !geo::is_valid_longitude(spot.location.lng) {
        return Err(ValidationError::Longitude(spot.location.lng));
    }
    Ok(())
}

pub fn validate_query(center: &Location, radius_meters: f64) -> Result<(), InvalidQueryError> {
    if !geo::is_valid_latitude(center.lat) {
        return Err(InvalidQueryError::Latitude(center.lat));
    }
    if !geo::is_valid_longitude(center.lng) {
        return Err(InvalidQueryError::Longitude(center.lng));
    }
    // also rejects NaN
    if !(radius_meters > 0.0) {
        return Err(InvalidQueryError::Radius(radius_meters));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use model::{spot::DroneType, ExampleData};

    use super::*;

    fn new_spot() -> NewDroneSpot {
        NewDroneSpot::example_data()
    }

    #[test]
    fn accepts_example_spot() {
        assert_eq!(validate_new_spot(&new_spot()), Ok(()));
    }

    #[test]
    fn rejects_empty_name() {
        let mut spot = new_spot();
        spot.name = String::new();
        let why = validate_new_spot(&spot).unwrap_err();
        assert_eq!(why, ValidationError::EmptyName);
        assert_eq!(why.field(), "name");
    }

    #[test]
    fn accepts_whitespace_name() {
        let mut spot = new_spot();
        spot.name = "   ".to_owned();
        assert_eq!(validate_new_spot(&spot), Ok(()));
    }

    #[test]
    fn rejects_empty_types() {
        let mut spot = new_spot();
        spot.types.clear();
        assert_eq!(validate_new_spot(&spot), Err(ValidationError::EmptyTypes));
    }

    #[test]
    fn accepts_duplicate_types() {
        let mut spot = new_spot();
        spot.types = vec![DroneType::FiveInch, DroneType::FiveInch];
        assert_eq!(validate_new_spot(&spot), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_location() {
        let mut spot = new_spot();
        spot.location = Location::new(90.5, 0.0);
        assert_eq!(validate_new_spot(&spot), Err(ValidationError::Latitude(90.5)));

        spot.location = Location::new(0.0, -181.0);
        let why = validate_new_spot(&spot).unwrap_err();
        assert_eq!(why, ValidationError::Longitude(-181.0));
        assert_eq!(why.field(), "location.lng");
    }

    #[test]
    fn rejects_nan_location() {
        let mut spot = new_spot();
        spot.location = Location::new(f64::NAN, 0.0);
        assert!(matches!(
            validate_new_spot(&spot),
            Err(ValidationError::Latitude(_))
        ));
    }

    #[test]
    fn accepts_boundary_coordinates() {
        let mut spot = new_spot();
        spot.location = Location::new(-90.0, 180.0);
        assert_eq!(validate_new_spot(&spot), Ok(()));
    }

    #[test]
    fn query_radius_must_be_positive() {
        let center = Location::new(0.0, 0.0);
        assert_eq!(validate_query(&center, 0.0), Err(InvalidQueryError::Radius(0.0)));
        assert_eq!(
            validate_query(&center, -10.0),
            Err(InvalidQueryError::Radius(-10.0))
        );
        assert!(validate_query(&center, f64::NAN).is_err());
        assert_eq!(validate_query(&center, f64::INFINITY), Ok(()));
        assert_eq!(validate_query(&center, 0.001), Ok(()));
    }

    #[test]
    fn query_center_must_be_valid() {
        assert_eq!(
            validate_query(&Location::new(-91.0, 0.0), 100.0),
            Err(InvalidQueryError::Latitude(-91.0))
        );
        assert_eq!(
            validate_query(&Location::new(0.0, 200.0), 100.0),
            Err(InvalidQueryError::Longitude(200.0))
        );
    }

    #[test]
    fn unknown_drone_type_names_types_field() {
        let why: ValidationError = UnknownDroneType("cinewhoop".to_owned()).into();
        assert_eq!(why.field(), "types");
        assert!(why.to_string().contains("cinewhoop"));
    }
}
