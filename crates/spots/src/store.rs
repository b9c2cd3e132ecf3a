use std::sync::Arc;

use chrono::Utc;
use model::{
    spot::{DroneSpot, Location, NewDroneSpot},
    WithId,
};
use tokio::sync::RwLock;

use crate::{
    database::{Database, DatabaseError, SpotRepo},
    index::{GridIndex, SpatialIndex},
    validation::{validate_new_spot, validate_query},
    SpotResult,
};

/// Radius used by [`SpotStore::find_near`] when the caller gives none.
pub const DEFAULT_RADIUS_METERS: f64 = 5000.0;

/// The spot repository: validates input, persists spots in the database and
/// keeps the spatial index in sync with it.
///
/// Clones share the same database and index. Creating a spot holds the index
/// write lock across the database insert and the index insert; queries hold
/// the read lock while they run, so they never see a spot in one of both
/// places only. A create that has started always runs to completion, even if
/// its caller stops waiting for it.
pub struct SpotStore<D, I = GridIndex>
where
    D: Database,
    I: SpatialIndex,
{
    database: D,
    index: Arc<RwLock<I>>,
}

impl<D, I> Clone for SpotStore<D, I>
where
    D: Database,
    I: SpatialIndex,
{
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            index: self.index.clone(),
        }
    }
}

impl<D, I> SpotStore<D, I>
where
    D: Database,
    I: SpatialIndex,
{
    /// Opens a store over `database`, adding every spot already stored to
    /// `index`.
    pub async fn open(database: D, mut index: I) -> SpotResult<Self> {
        let spots = database.auto().get_all().await?;
        for spot in spots {
            index.insert(spot.id, spot.content.location);
        }
        log::info!("spot store opened with {} spots", index.len());
        Ok(Self {
            database,
            index: Arc::new(RwLock::new(index)),
        })
    }

    pub async fn create(&self, spot: NewDroneSpot) -> SpotResult<WithId<DroneSpot>> {
        validate_new_spot(&spot).map_err(|why| {
            log::debug!("rejected spot '{}': {}", spot.name, why);
            why
        })?;

        // finishes even when the caller is dropped mid-insert
        let database = self.database.clone();
        let index = self.index.clone();
        let stored = tokio::spawn(async move {
            let mut index = index.write().await;
            let stored = database
                .auto()
                .insert(DroneSpot::created(spot, Utc::now()))
                .await?;
            index.insert(stored.id.clone(), stored.content.location);
            Ok::<_, DatabaseError>(stored)
        })
        .await
        .map_err(DatabaseError::other)
        .and_then(|inserted| inserted)
        .map_err(|why| {
            log::error!("could not store spot: {}", why);
            why
        })?;

        log::info!("created spot {} '{}'", stored.id, stored.content.name);
        Ok(stored)
    }

    pub async fn list_all(&self) -> SpotResult<Vec<WithId<DroneSpot>>> {
        let _index = self.index.read().await;
        Ok(self.database.auto().get_all().await?)
    }

    /// Spots within `radius_meters` (default [`DEFAULT_RADIUS_METERS`]) of
    /// `center`, in the order they were created.
    pub async fn find_near(
        &self,
        center: Location,
        radius_meters: Option<f64>,
    ) -> SpotResult<Vec<WithId<DroneSpot>>> {
        let radius = radius_meters.unwrap_or(DEFAULT_RADIUS_METERS);
        validate_query(&center, radius)?;

        let index = self.index.read().await;
        let ids = index.within(&center, radius);
        log::debug!(
            "{} spots within {}m of ({}, {})",
            ids.len(),
            radius,
            center.lat,
            center.lng
        );
        if ids.is_empty() {
            return Ok(vec![]);
        }
        Ok(self.database.auto().get_many(&ids).await?)
    }

    /// Number of stored spots.
    pub async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
