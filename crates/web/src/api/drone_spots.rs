use std::str::FromStr;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Query, State,
    },
    http::{Method, StatusCode},
    routing::{get, on},
    Json, Router,
};
use model::{
    spot::{DroneSpot, DroneType, Location, NewDroneSpot},
    WithId,
};
use serde::Deserialize;
use spots::{
    database::Database,
    validation::{InvalidQueryError, ValidationError},
    SpotError,
};

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/", get(get_spots::<D>).post(create_spot::<D>))
        .route("/nearby", get(nearby::<D>))
        .route("/schema", get(schema::<WithId<DroneSpot>>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Creation request as sent by clients. Drone types arrive as plain strings so
/// unknown ones are reported as validation errors.
#[derive(Debug, Deserialize)]
pub(crate) struct NewSpotBody {
    #[serde(default)]
    name: String,
    description: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    location: Location,
}

impl TryFrom<NewSpotBody> for NewDroneSpot {
    type Error = ValidationError;

    fn try_from(value: NewSpotBody) -> Result<Self, Self::Error> {
        let types = value
            .types
            .iter()
            .map(|name| DroneType::from_str(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NewDroneSpot {
            name: value.name,
            description: value.description,
            types,
            location: value.location,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NearbyQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<f64>,
}

async fn get_spots<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { store }): State<WebState<D>>,
) -> RouteResult<Json<Vec<WithId<DroneSpot>>>> {
    store.list_all().await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })
}

async fn create_spot<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { store }): State<WebState<D>>,
    body: Result<Json<NewSpotBody>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<WithId<DroneSpot>>)> {
    let with_request = |response: RouteErrorResponse| {
        response
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    };

    let Json(body) = body.map_err(|why| with_request(why.into()))?;
    let spot = NewDroneSpot::try_from(body)
        .map_err(|why| with_request(SpotError::from(why).into()))?;

    store
        .create(spot)
        .await
        .map(|spot| (StatusCode::CREATED, Json(spot)))
        .map_err(|why| with_request(why.into()))
}

async fn nearby<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { store }): State<WebState<D>>,
    params: Result<Query<NearbyQuery>, QueryRejection>,
) -> RouteResult<Json<Vec<WithId<DroneSpot>>>> {
    let with_request = |response: RouteErrorResponse| {
        response
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    };

    let Query(params) = params.map_err(|why| with_request(why.into()))?;
    let center = match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => Location::new(lat, lng),
        _ => {
            return Err(with_request(
                SpotError::from(InvalidQueryError::MissingCenter).into(),
            ))
        }
    };

    store
        .find_near(center, params.radius)
        .await
        .map(Json)
        .map_err(|why| with_request(why.into()))
}
