#![allow(dead_code)]

use bus_routes::{
    catalog::{self, StopCatalog},
    composer::{ComposerView, Notice, SequenceRow},
    map::MapSurface,
    model::{AddRouteRequest, RouteStop, RouteSummary, Stop, StopId},
    shared::geo::{Bounds, Coordinate},
};
use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap},
    rc::Rc,
};

#[derive(Default)]
pub struct CatalogState {
    pub stops: Vec<Stop>,
    pub routes: HashMap<String, Vec<RouteStop>>,
    pub listing: Vec<RouteSummary>,
    pub list_calls: usize,
    pub created: Vec<AddRouteRequest>,
    pub fail_saves: bool,
    pub fail_loads: bool,
}

/// In memory catalog. Clones share state so tests can inspect calls made by the composer.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    pub state: Rc<RefCell<CatalogState>>,
}

impl FakeCatalog {
    pub fn with_stops(stops: Vec<Stop>) -> Self {
        let catalog = Self::default();
        catalog.state.borrow_mut().stops = stops;
        catalog
    }

    pub fn created(&self) -> Vec<AddRouteRequest> {
        self.state.borrow().created.clone()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.state.borrow_mut().fail_saves = fail;
    }

    pub fn fail_loads(&self, fail: bool) {
        self.state.borrow_mut().fail_loads = fail;
    }
}

impl StopCatalog for FakeCatalog {
    async fn all_stops(&self) -> Result<Vec<Stop>, catalog::Error> {
        let state = self.state.borrow();
        if state.fail_loads {
            return Err(catalog::Error::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(state.stops.clone())
    }

    async fn routes(&self) -> Result<Vec<RouteSummary>, catalog::Error> {
        let mut state = self.state.borrow_mut();
        state.list_calls += 1;
        if state.fail_loads {
            return Err(catalog::Error::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(state.listing.clone())
    }

    async fn route_stops(&self, route_id: &str) -> Result<Vec<RouteStop>, catalog::Error> {
        self.state
            .borrow()
            .routes
            .get(route_id)
            .cloned()
            .ok_or(catalog::Error::Status {
                status: 404,
                body: format!("Route not found with id: {route_id}"),
            })
    }

    async fn add_route(&self, request: &AddRouteRequest) -> Result<(), catalog::Error> {
        let mut state = self.state.borrow_mut();
        state.created.push(request.clone());
        if state.fail_saves {
            return Err(catalog::Error::Status {
                status: 500,
                body: "database unavailable".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingMap {
    pub forwarding: bool,
    pub selected: BTreeSet<StopId>,
    pub line: Vec<Coordinate>,
}

impl MapSurface for RecordingMap {
    fn set_selection_forwarding(&mut self, enabled: bool) {
        self.forwarding = enabled;
    }

    fn mark(&mut self, stop_id: StopId, selected: bool) {
        if selected {
            self.selected.insert(stop_id);
        } else {
            self.selected.remove(&stop_id);
        }
    }

    fn draw_sequence(&mut self, line: &[Coordinate]) {
        self.line = line.to_vec();
    }
}

#[derive(Debug)]
pub struct RecordingView {
    pub rows: Vec<SequenceRow>,
    pub renders: usize,
    pub input_enabled: bool,
    pub notices: Vec<Notice>,
    pub errors: Vec<String>,
    pub routes: Vec<RouteSummary>,
}

impl Default for RecordingView {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            renders: 0,
            input_enabled: true,
            notices: Vec::new(),
            errors: Vec::new(),
            routes: Vec::new(),
        }
    }
}

impl ComposerView for RecordingView {
    fn render_sequence(&mut self, rows: &[SequenceRow]) {
        self.rows = rows.to_vec();
        self.renders += 1;
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn render_routes(&mut self, routes: &[RouteSummary]) {
        self.routes = routes.to_vec();
    }
}

/// Stops spread along a street in central Saigon, ids 1 to `count`.
pub fn stops(count: u64) -> Vec<Stop> {
    (1..=count)
        .map(|id| {
            Stop::new(
                id,
                format!("Stop {id}"),
                10.770 + id as f64 * 0.002,
                106.690 + id as f64 * 0.001,
            )
        })
        .collect()
}

pub fn bounds() -> Bounds {
    Bounds::new((10.70, 106.60).into(), (10.90, 106.80).into())
}
