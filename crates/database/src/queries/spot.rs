use model::{spot::DroneSpot, WithId};
use spots::database::Result;
use sqlx::{Executor, Postgres};
use utility::{
    id::{Id, IdWrapper},
    let_also::LetAlso,
};

use crate::data_model::{
    spot::{type_names, SpotRow},
    with_id, with_ids,
};

use super::convert_error;

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<DroneSpot>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id::TEXT AS id, name, description, types,
            latitude, longitude, created_at, updated_at
        FROM
            drone_spots
        ORDER BY drone_spots.id;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|spots: Vec<SpotRow>| with_ids(spots))
}

pub async fn get_many<'c, E>(
    executor: E,
    ids: &[Id<DroneSpot>],
) -> Result<Vec<WithId<DroneSpot>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id::TEXT AS id, name, description, types,
            latitude, longitude, created_at, updated_at
        FROM
            drone_spots
        WHERE id = ANY($1)
        ORDER BY drone_spots.id;
        ",
    )
    .bind(row_ids(ids))
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|spots: Vec<SpotRow>| with_ids(spots))
}

pub async fn insert<'c, E>(executor: E, spot: DroneSpot) -> Result<WithId<DroneSpot>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO drone_spots(
            name,
            description,
            types,
            latitude,
            longitude,
            created_at,
            updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING
            id::TEXT AS id, name, description, types,
            latitude, longitude, created_at, updated_at;
        ",
    )
    .bind(&spot.name)
    .bind(&spot.description)
    .bind(type_names(&spot))
    .bind(spot.location.lat)
    .bind(spot.location.lng)
    .bind(spot.created_at)
    .bind(spot.updated_at)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .and_then(|row: SpotRow| with_id(row))
}

/// Primary keys for `ids`. Ids that are not row numbers can not match any row
/// and are dropped.
fn row_ids(ids: &[Id<DroneSpot>]) -> Vec<i64> {
    ids.raw()
        .iter()
        .filter_map(|id| id.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_ids_skip_foreign_ids() {
        let ids: Vec<Id<DroneSpot>> = ["3", "abc", "12"]
            .into_iter()
            .map(|raw| Id::new(raw.to_owned()))
            .collect();
        assert_eq!(row_ids(&ids), vec![3, 12]);
    }
}
