use std::{error::Error, fmt};

use database::DatabaseError;
use validation::{InvalidQueryError, ValidationError};

pub mod database;
pub mod index;
pub mod memory;
pub mod store;
pub mod validation;

pub use store::{SpotStore, DEFAULT_RADIUS_METERS};

#[derive(Debug)]
pub enum SpotError {
    Validation(ValidationError),
    InvalidQuery(InvalidQueryError),
    Storage(DatabaseError),
}

impl fmt::Display for SpotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotError::Validation(why) => write!(f, "invalid spot: {}", why),
            SpotError::InvalidQuery(why) => write!(f, "invalid query: {}", why),
            SpotError::Storage(why) => write!(f, "storage failure: {}", why),
        }
    }
}

impl Error for SpotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SpotError::Validation(why) => Some(why),
            SpotError::InvalidQuery(why) => Some(why),
            SpotError::Storage(why) => Some(why),
        }
    }
}

impl From<ValidationError> for SpotError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<InvalidQueryError> for SpotError {
    fn from(value: InvalidQueryError) -> Self {
        Self::InvalidQuery(value)
    }
}

impl From<DatabaseError> for SpotError {
    fn from(value: DatabaseError) -> Self {
        Self::Storage(value)
    }
}

pub type SpotResult<O> = Result<O, SpotError>;
