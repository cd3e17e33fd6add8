use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use bus_routes::model::{Stop, StopId};

use crate::{dto::ApiError, state::AppState};

const STOP_PATH: &str = "/api/busStop/";

pub async fn all_stops(State(state): State<Arc<AppState>>) -> Json<Vec<Stop>> {
    Json(state.stops.to_vec())
}

pub async fn stop(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let id: u64 = params
        .get("id")
        .ok_or_else(|| ApiError::bad_request("Missing id", STOP_PATH))?
        .parse()
        .map_err(|_| ApiError::bad_request("Stop id must be a number", STOP_PATH))?;
    let stop = state.stop_by_id(StopId(id)).ok_or_else(|| {
        ApiError::not_found(format!("Bus stop not found with id: {id}"), STOP_PATH)
    })?;
    Ok(Json(stop.clone()).into_response())
}
