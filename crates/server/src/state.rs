use bus_routes::model::{Direction, Stop, StopId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct StoredRoute {
    pub bus_number: String,
    pub direction: Direction,
    pub name: String,
    pub stop_ids: Vec<StopId>,
    pub created_at: DateTime<Utc>,
}

pub struct AppState {
    pub stops: Box<[Stop]>,
    stop_lookup: HashMap<StopId, usize>,
    pub routes: RwLock<HashMap<String, StoredRoute>>,
}

impl AppState {
    pub fn new(stops: Vec<Stop>) -> Self {
        let stop_lookup = stops
            .iter()
            .enumerate()
            .map(|(i, stop)| (stop.id, i))
            .collect();
        Self {
            stops: stops.into(),
            stop_lookup,
            routes: RwLock::new(HashMap::new()),
        }
    }

    pub fn stop_by_id(&self, id: StopId) -> Option<&Stop> {
        self.stop_lookup.get(&id).map(|index| &self.stops[*index])
    }
}
