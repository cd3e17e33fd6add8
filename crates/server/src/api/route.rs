use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bus_routes::{
    composer::MIN_ROUTE_STOPS,
    model::{AddRouteRequest, Direction, route_id},
};
use chrono::Utc;
use tracing::{error, info};

use crate::{
    dto::{self, ApiError, CreatedRouteDto},
    state::{AppState, StoredRoute},
};

const ROUTE_PATH: &str = "/api/busRoute";
const ADD_ROUTE_PATH: &str = "/api/busRoute/addRoute";

/// Stops of the route named by `routeId`, or every stored route without it.
pub async fn route(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let routes = state.routes.read().await;
    let Some(id) = params.get("routeId") else {
        let mut summaries: Vec<_> = routes
            .iter()
            .map(|(id, route)| dto::route_summary(id, route))
            .collect();
        summaries.sort_by(|a, b| a.route_id.cmp(&b.route_id));
        return Ok(Json(summaries).into_response());
    };
    let route = routes.get(id).ok_or_else(|| {
        ApiError::not_found(format!("Route not found with id: {id}"), ROUTE_PATH)
    })?;
    Ok(Json(dto::route_stops(route, &state)).into_response())
}

pub async fn add_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddRouteRequest>,
) -> Result<Response, ApiError> {
    let route = validate(&request, &state).map_err(|err| {
        error!("Rejected route {}: {}", request.bus_number, err.message);
        err
    })?;
    let id = route_id(&route.bus_number, route.direction);
    info!(
        "Creating route {id} ({}) with {} stops",
        route.name,
        route.stop_ids.len()
    );
    let body = CreatedRouteDto::from(id.clone(), &route);
    let replaced = state.routes.write().await.insert(id.clone(), route);
    if replaced.is_some() {
        info!("Replaced existing route {id}");
    }
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

fn validate(request: &AddRouteRequest, state: &AppState) -> Result<StoredRoute, ApiError> {
    let bus_number = request.bus_number.trim();
    if bus_number.is_empty() {
        return Err(ApiError::bad_request("Bus number is required", ADD_ROUTE_PATH));
    }
    let direction = Direction::from_code(request.direction).ok_or_else(|| {
        ApiError::bad_request(
            format!("Unknown direction {}", request.direction),
            ADD_ROUTE_PATH,
        )
    })?;
    if request.stop_ids.len() < MIN_ROUTE_STOPS {
        return Err(ApiError::bad_request(
            format!("A route needs at least {MIN_ROUTE_STOPS} stops"),
            ADD_ROUTE_PATH,
        ));
    }

    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(request.stop_ids.len());
    for id in request.stop_ids.iter() {
        if !seen.insert(*id) {
            return Err(ApiError::bad_request(
                format!("Stop {id} appears more than once"),
                ADD_ROUTE_PATH,
            ));
        }
        let stop = state.stop_by_id(*id).ok_or_else(|| {
            ApiError::bad_request(format!("Bus stop not found with id: {id}"), ADD_ROUTE_PATH)
        })?;
        names.push(stop.name.as_str());
    }

    let name = format!(
        "{} - {}",
        names.first().copied().unwrap_or_default(),
        names.last().copied().unwrap_or_default()
    );
    Ok(StoredRoute {
        bus_number: bus_number.to_string(),
        direction,
        name,
        stop_ids: request.stop_ids.clone(),
        created_at: Utc::now(),
    })
}
