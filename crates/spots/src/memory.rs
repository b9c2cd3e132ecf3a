//! Storage backend keeping all spots in process memory.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use model::{spot::DroneSpot, WithId};
use tokio::sync::Mutex;
use utility::id::Id;

use crate::database::{Database, Result, SpotRepo};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: u64,
    spots: IndexMap<Id<DroneSpot>, DroneSpot>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryAutocommit {
    state: Arc<Mutex<MemoryState>>,
}

impl Database for MemoryDatabase {
    type Autocommit = MemoryAutocommit;

    fn auto(&self) -> Self::Autocommit {
        MemoryAutocommit {
            state: self.state.clone(),
        }
    }
}

#[async_trait]
impl SpotRepo for MemoryAutocommit {
    async fn insert(&mut self, spot: DroneSpot) -> Result<WithId<DroneSpot>> {
        let mut state = self.state.lock().await;
        state.last_id += 1;
        let id: Id<DroneSpot> = Id::new(state.last_id.to_string());
        state.spots.insert(id.clone(), spot.clone());
        Ok(WithId::new(id, spot))
    }

    async fn get_all(&mut self) -> Result<Vec<WithId<DroneSpot>>> {
        let state = self.state.lock().await;
        Ok(state
            .spots
            .iter()
            .map(|(id, spot)| WithId::new(id.clone(), spot.clone()))
            .collect())
    }

    async fn get_many(
        &mut self,
        ids: &[Id<DroneSpot>],
    ) -> Result<Vec<WithId<DroneSpot>>> {
        let state = self.state.lock().await;
        let mut positions = ids
            .iter()
            .filter_map(|id| state.spots.get_index_of(id))
            .collect::<Vec<_>>();
        positions.sort_unstable();
        positions.dedup();
        Ok(positions
            .into_iter()
            .filter_map(|position| state.spots.get_index(position))
            .map(|(id, spot)| WithId::new(id.clone(), spot.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use model::{spot::NewDroneSpot, ExampleData};

    use super::*;

    fn spot(name: &str) -> DroneSpot {
        let mut new = NewDroneSpot::example_data();
        new.name = name.to_owned();
        DroneSpot::created(new, Utc::now())
    }

    #[tokio::test]
    async fn insert_allocates_increasing_ids() {
        let database = MemoryDatabase::new();
        let a = database.auto().insert(spot("a")).await.unwrap();
        let b = database.auto().insert(spot("b")).await.unwrap();
        assert_eq!(a.id.raw(), "1");
        assert_eq!(b.id.raw(), "2");
        assert_eq!(database.auto().get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_many_keeps_insertion_order_and_skips_unknown() {
        let database = MemoryDatabase::new();
        let mut repo = database.auto();
        let a = repo.insert(spot("a")).await.unwrap();
        let b = repo.insert(spot("b")).await.unwrap();
        let c = repo.insert(spot("c")).await.unwrap();

        let ids = vec![c.id.clone(), Id::new("404".to_owned()), a.id.clone(), c.id];
        let found = repo.get_many(&ids).await.unwrap();
        let names = found
            .iter()
            .map(|spot| spot.content.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "c"]);
        assert!(found.iter().all(|spot| spot.id != b.id));
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let database = MemoryDatabase::new();
        let clone = database.clone();
        database.auto().insert(spot("a")).await.unwrap();
        assert_eq!(clone.auto().get_all().await.unwrap().len(), 1);
    }
}
