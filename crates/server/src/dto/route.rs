use bus_routes::model::{RouteStop, RouteSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, StoredRoute};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRouteDto {
    pub route_id: String,
    pub name: String,
    pub stop_count: usize,
    pub created_at: DateTime<Utc>,
}

impl CreatedRouteDto {
    pub fn from(route_id: String, route: &StoredRoute) -> Self {
        Self {
            route_id,
            name: route.name.clone(),
            stop_count: route.stop_ids.len(),
            created_at: route.created_at,
        }
    }
}

pub fn route_summary(route_id: &str, route: &StoredRoute) -> RouteSummary {
    RouteSummary {
        route_id: route_id.to_string(),
        bus_number: route.bus_number.clone(),
        direction: route.direction.code(),
        name: route.name.clone(),
        stop_count: route.stop_ids.len(),
    }
}

pub fn route_stops(route: &StoredRoute, state: &AppState) -> Vec<RouteStop> {
    route
        .stop_ids
        .iter()
        .enumerate()
        .filter_map(|(sequence, id)| {
            let stop = state.stop_by_id(*id)?;
            Some(RouteStop {
                lat: stop.lat,
                lon: stop.lon,
                sequence: sequence as u32,
                name: stop.name.clone(),
            })
        })
        .collect()
}
