use std::{error, fmt, result};

use async_trait::async_trait;
use model::{spot::DroneSpot, WithId};
use utility::id::Id;

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl DatabaseError {
    pub fn other<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::NotFound => write!(f, "not found"),
            DatabaseError::Other(why) => write!(f, "{}", why),
        }
    }
}

impl error::Error for DatabaseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DatabaseError::NotFound => None,
            DatabaseError::Other(why) => Some(why.as_ref()),
        }
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

/// Storage operations on drone spots.
#[async_trait]
pub trait SpotRepo {
    /// Persists `spot` under a freshly allocated id that was never handed out
    /// before.
    async fn insert(&mut self, spot: DroneSpot) -> Result<WithId<DroneSpot>>;

    /// Returns all spots in insertion order.
    async fn get_all(&mut self) -> Result<Vec<WithId<DroneSpot>>>;

    /// Returns the spots with the given ids in insertion order. Unknown ids
    /// are skipped.
    async fn get_many(
        &mut self,
        ids: &[Id<DroneSpot>],
    ) -> Result<Vec<WithId<DroneSpot>>>;
}

pub trait Database: Clone + Send + Sync + Sized + 'static {
    type Autocommit: SpotRepo + Send;

    fn auto(&self) -> Self::Autocommit;
}
