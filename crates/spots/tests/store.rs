use std::collections::HashSet;

use async_trait::async_trait;
use model::{
    spot::{DroneSpot, DroneType, Location, NewDroneSpot},
    WithId,
};
use proptest::prelude::*;
use spots::{
    database::{self, Database, DatabaseError, SpotRepo},
    index::{GridIndex, LinearIndex},
    memory::MemoryDatabase,
    validation::{InvalidQueryError, ValidationError},
    SpotError, SpotStore,
};
use utility::id::Id;

fn new_spot(name: &str, types: Vec<DroneType>, lat: f64, lng: f64) -> NewDroneSpot {
    NewDroneSpot {
        name: name.to_owned(),
        description: None,
        types,
        location: Location::new(lat, lng),
    }
}

fn names(spots: &[WithId<DroneSpot>]) -> Vec<&str> {
    spots.iter().map(|spot| spot.content.name.as_str()).collect()
}

async fn memory_store() -> SpotStore<MemoryDatabase> {
    SpotStore::open(MemoryDatabase::new(), GridIndex::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn field_a_is_created_with_generated_fields() {
    let store = memory_store().await;
    let spot = store
        .create(new_spot("Field A", vec![DroneType::Tinywhoop], 40.0, -75.0))
        .await
        .unwrap();

    let json = serde_json::to_value(&spot).unwrap();
    assert!(json["id"].is_string());
    assert!(json["createdAt"].is_string());
    assert_eq!(json["name"], "Field A");
    assert_eq!(json["types"], serde_json::json!(["tinywhoop"]));
    assert_eq!(json["location"], serde_json::json!({"lat": 40.0, "lng": -75.0}));
}

#[tokio::test]
async fn empty_types_are_rejected_without_write() {
    let store = memory_store().await;
    let why = store
        .create(new_spot("Field B", vec![], 40.0, -75.0))
        .await
        .unwrap_err();
    assert!(matches!(why, SpotError::Validation(ValidationError::EmptyTypes)));
    assert!(store.is_empty().await);
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn equator_spots_by_radius() {
    let store = memory_store().await;
    store
        .create(new_spot("origin", vec![DroneType::FiveInch], 0.0, 0.0))
        .await
        .unwrap();
    store
        .create(new_spot("east", vec![DroneType::Toothpick], 0.0, 0.1))
        .await
        .unwrap();

    let center = Location::new(0.0, 0.0);
    let near = store.find_near(center, Some(5000.0)).await.unwrap();
    assert_eq!(names(&near), vec!["origin"]);
    let wide = store.find_near(center, Some(15000.0)).await.unwrap();
    assert_eq!(names(&wide), vec!["origin", "east"]);
}

#[tokio::test]
async fn zero_and_negative_radius_are_invalid_queries() {
    let store = memory_store().await;
    for radius in [0.0, -5000.0] {
        let why = store
            .find_near(Location::new(0.0, 0.0), Some(radius))
            .await
            .unwrap_err();
        assert!(matches!(
            why,
            SpotError::InvalidQuery(InvalidQueryError::Radius(_))
        ));
    }
}

#[tokio::test]
async fn spot_exactly_on_radius_is_found() {
    let store = memory_store().await;
    let location = Location::new(48.137, 11.575);
    store
        .create(new_spot("edge", vec![DroneType::Tinywhoop], location.lat, location.lng))
        .await
        .unwrap();
    let center = Location::new(48.2, 11.6);
    let radius = center.distance_to(&location);
    let found = store.find_near(center, Some(radius)).await.unwrap();
    assert_eq!(names(&found), vec!["edge"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_ids() {
    let store = memory_store().await;
    let tasks = (0..64)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move {
                let lat = (n % 10) as f64;
                store
                    .create(new_spot(&format!("spot {}", n), vec![DroneType::Tinywhoop], lat, 0.0))
                    .await
            })
        })
        .collect::<Vec<_>>();

    let ids = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().id)
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 64);
    assert_eq!(store.len().await, 64);
    assert_eq!(store.list_all().await.unwrap().len(), 64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_partial_creates() {
    let store = memory_store().await;
    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for n in 0..50 {
                store
                    .create(new_spot(&format!("w{}", n), vec![DroneType::Toothpick], 1.0, 1.0))
                    .await
                    .unwrap();
            }
        })
    };
    let reader = {
        let store = store.clone();
        tokio::spawn(async move {
            for _ in 0..50 {
                let near = store
                    .find_near(Location::new(1.0, 1.0), Some(10.0))
                    .await
                    .unwrap();
                let all = store.list_all().await.unwrap();
                // index and storage agree at every observation point
                assert!(near.len() <= all.len());
                assert!(near.iter().all(|spot| spot.content.location == Location::new(1.0, 1.0)));
            }
        })
    };
    writer.await.unwrap();
    reader.await.unwrap();
    let near = store
        .find_near(Location::new(1.0, 1.0), Some(10.0))
        .await
        .unwrap();
    assert_eq!(near.len(), 50);
}

#[tokio::test]
async fn grid_and_linear_stores_answer_alike() {
    let database = MemoryDatabase::new();
    let grid = SpotStore::open(database.clone(), GridIndex::new(0.5)).await.unwrap();
    for (n, (lat, lng)) in [(54.32, 10.13), (54.35, 10.2), (53.55, 9.99), (-33.9, 151.2)]
        .into_iter()
        .enumerate()
    {
        grid.create(new_spot(&n.to_string(), vec![DroneType::FiveInch], lat, lng))
            .await
            .unwrap();
    }
    let linear = SpotStore::open(database, LinearIndex::new()).await.unwrap();

    for radius in [100.0, 5_000.0, 100_000.0, 20_000_000.0] {
        let center = Location::new(54.3, 10.1);
        let a = grid.find_near(center, Some(radius)).await.unwrap();
        let b = linear.find_near(center, Some(radius)).await.unwrap();
        assert_eq!(names(&a), names(&b));
    }
}

// storage failures

#[derive(Clone)]
struct FailingDatabase {
    inner: MemoryDatabase,
}

struct FailingAutocommit {
    inner: <MemoryDatabase as Database>::Autocommit,
}

#[derive(Debug)]
struct DiskFull;

impl std::fmt::Display for DiskFull {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "disk full")
    }
}

impl std::error::Error for DiskFull {}

impl Database for FailingDatabase {
    type Autocommit = FailingAutocommit;

    fn auto(&self) -> Self::Autocommit {
        FailingAutocommit {
            inner: self.inner.auto(),
        }
    }
}

#[async_trait]
impl SpotRepo for FailingAutocommit {
    async fn insert(&mut self, spot: DroneSpot) -> database::Result<WithId<DroneSpot>> {
        if spot.name == "fail" {
            return Err(DatabaseError::other(DiskFull));
        }
        self.inner.insert(spot).await
    }

    async fn get_all(&mut self) -> database::Result<Vec<WithId<DroneSpot>>> {
        self.inner.get_all().await
    }

    async fn get_many(
        &mut self,
        ids: &[Id<DroneSpot>],
    ) -> database::Result<Vec<WithId<DroneSpot>>> {
        self.inner.get_many(ids).await
    }
}

#[tokio::test]
async fn storage_failure_is_surfaced_and_store_stays_usable() {
    let store = SpotStore::open(
        FailingDatabase {
            inner: MemoryDatabase::new(),
        },
        GridIndex::default(),
    )
    .await
    .unwrap();

    let why = store
        .create(new_spot("fail", vec![DroneType::Tinywhoop], 0.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(why, SpotError::Storage(_)));
    assert!(why.to_string().contains("disk full"));
    assert!(store.is_empty().await);

    store
        .create(new_spot("works", vec![DroneType::Tinywhoop], 0.0, 0.0))
        .await
        .unwrap();
    let found = store
        .find_near(Location::new(0.0, 0.0), Some(1.0))
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["works"]);
}

// properties

fn arb_drone_types() -> impl Strategy<Value = Vec<DroneType>> {
    prop::collection::vec(prop::sample::select(DroneType::ALL.to_vec()), 0..4)
}

fn arb_new_spot() -> impl Strategy<Value = NewDroneSpot> {
    (
        prop_oneof![Just(String::new()), Just("  ".to_owned()), "[a-zA-Z ]{1,12}"],
        arb_drone_types(),
        -100.0..100.0f64,
        -200.0..200.0f64,
    )
        .prop_map(|(name, types, lat, lng)| NewDroneSpot {
            name,
            description: None,
            types,
            location: Location::new(lat, lng),
        })
}

fn is_acceptable(spot: &NewDroneSpot) -> bool {
    !spot.name.is_empty()
        && !spot.types.is_empty()
        && (-90.0..=90.0).contains(&spot.location.lat)
        && (-180.0..=180.0).contains(&spot.location.lng)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn only_valid_spots_are_persisted(inputs in prop::collection::vec(arb_new_spot(), 1..20)) {
        runtime().block_on(async {
            let store = memory_store().await;
            let mut expected = 0;
            for input in inputs {
                let acceptable = is_acceptable(&input);
                let result = store.create(input).await;
                prop_assert_eq!(result.is_ok(), acceptable);
                if acceptable {
                    expected += 1;
                } else {
                    prop_assert!(matches!(result, Err(SpotError::Validation(_))));
                }
            }
            let all = store.list_all().await.unwrap();
            prop_assert_eq!(all.len(), expected);
            let ids = all.iter().map(|spot| spot.id.clone()).collect::<HashSet<_>>();
            prop_assert_eq!(ids.len(), expected);
            Ok(())
        })?;
    }

    #[test]
    fn created_spot_is_immediately_readable(
        lat in -90.0..=90.0f64,
        lng in -180.0..=180.0f64,
        radius in prop_oneof![0.001..1.0f64, 1.0..1_000_000.0f64],
    ) {
        runtime().block_on(async {
            let store = memory_store().await;
            let created = store
                .create(new_spot("fresh", vec![DroneType::Toothpick], lat, lng))
                .await
                .unwrap();
            let all = store.list_all().await.unwrap();
            prop_assert!(all.iter().any(|spot| spot.id == created.id));
            let near = store
                .find_near(Location::new(lat, lng), Some(radius))
                .await
                .unwrap();
            prop_assert!(near.iter().any(|spot| spot.id == created.id));
            Ok(())
        })?;
    }
}
