//! Application shell: page navigation, delegated UI events and map callbacks
//! wired to the route composer.

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    catalog::{self, StopCatalog},
    composer::{self, ComposerView, Mode, RouteComposer},
    dispatch::{Element, EventKind, EventTable, Router, Selector},
    map::{MapSurface, StopLayer},
    model::{Direction, RouteStop, RouteSummary, Stop, StopId, parse_route_id, route_id},
    shared::geo::Bounds,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Composer(#[from] composer::Error),
    #[error(transparent)]
    Catalog(#[from] catalog::Error),
    #[error("Element is missing data-{0}")]
    MissingAttribute(&'static str),
    #[error("Invalid value {value:?} for {name}")]
    InvalidAttribute { name: &'static str, value: String },
    #[error("Stop {0} is not on the map")]
    UnknownStop(StopId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Routes,
    AddRoute,
    RouteDetail,
    Stops,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Navigate,
    StartRoute,
    CancelRoute,
    SaveRoute,
    RemoveStop,
    ClearAll,
    BusNumber,
    Direction,
}

pub const ADD_ROUTE_PATH: &str = "/routes/add";

pub struct App<C, M, V> {
    composer: RouteComposer<C, M, V>,
    layer: StopLayer,
    router: Router<View>,
    events: EventTable<Action>,
    current: Option<View>,
}

impl<C, M, V> App<C, M, V>
where
    C: StopCatalog + Clone + 'static,
    M: MapSurface,
    V: ComposerView,
{
    pub fn new(catalog: C, map: M, view: V, bounds: Bounds) -> Self {
        let mut router = Router::new();
        router
            .add("/", View::Home)
            .add("/routes", View::Routes)
            .add(ADD_ROUTE_PATH, View::AddRoute)
            .add("/routes/:id", View::RouteDetail)
            .add("/stops", View::Stops)
            .add("*", View::NotFound);

        let mut events = EventTable::new();
        events
            .on(EventKind::Click, Selector::has_data("route"), Action::Navigate)
            .on(
                EventKind::Click,
                Selector::data("action", "add-route"),
                Action::StartRoute,
            )
            .on(
                EventKind::Click,
                Selector::data("action", "cancel-route"),
                Action::CancelRoute,
            )
            .on(
                EventKind::Click,
                Selector::data("action", "save-route"),
                Action::SaveRoute,
            )
            .on(
                EventKind::Click,
                Selector::data("action", "remove-stop"),
                Action::RemoveStop,
            )
            .on(
                EventKind::Click,
                Selector::data("action", "clear-all"),
                Action::ClearAll,
            )
            .on(
                EventKind::Change,
                Selector::data("field", "bus-number"),
                Action::BusNumber,
            )
            .on(
                EventKind::Change,
                Selector::data("field", "direction"),
                Action::Direction,
            );

        Self {
            composer: RouteComposer::new(catalog, map, view),
            layer: StopLayer::new(Vec::new(), bounds),
            router,
            events,
            current: None,
        }
    }

    pub fn composer(&self) -> &RouteComposer<C, M, V> {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut RouteComposer<C, M, V> {
        &mut self.composer
    }

    pub fn layer(&self) -> &StopLayer {
        &self.layer
    }

    pub fn current_view(&self) -> Option<View> {
        self.current
    }

    /// Switches page. Leaving the add-route page ends route composition,
    /// arriving on it starts a fresh draft and makes sure stops are loaded.
    /// `/routes/:id` takes a catalog route id (`56_2`) or a bare bus number.
    pub async fn navigate(&mut self, path: &str) -> View {
        let (view, id) = match self.router.resolve(path) {
            Some(found) => (*found.view, found.param("id").map(str::to_string)),
            None => (View::NotFound, None),
        };
        debug!("Navigating to {path} ({view:?})");

        if self.current == Some(View::AddRoute) && view != View::AddRoute {
            self.composer.cancel();
        }
        self.current = Some(view);

        let loaded = match view {
            View::AddRoute => {
                self.composer.enter_composition();
                self.ensure_stops().await
            }
            View::Routes => self.load_routes().await.map(|_| ()),
            View::RouteDetail => match id {
                Some(id) => {
                    let (bus_number, direction) = parse_route_id(&id);
                    self.show_route(bus_number, direction).await.map(|_| ())
                }
                None => Ok(()),
            },
            View::Stops => self.ensure_stops().await,
            View::Home | View::NotFound => Ok(()),
        };
        // Failures were already shown inline
        if let Err(err) = loaded {
            debug!("{view:?} loaded with errors: {err}");
        }
        view
    }

    /// Runs the action registered for the event target. Returns `false` when
    /// nothing is registered for it.
    pub async fn handle_event(&mut self, kind: EventKind, target: &Element) -> Result<bool, Error> {
        let Some(action) = self.events.dispatch(kind, target).copied() else {
            return Ok(false);
        };
        debug!("Dispatching {action:?}");
        match action {
            Action::Navigate => {
                let path = target
                    .data("route")
                    .ok_or(Error::MissingAttribute("route"))?
                    .to_string();
                self.navigate(&path).await;
            }
            Action::StartRoute => {
                self.navigate(ADD_ROUTE_PATH).await;
            }
            Action::CancelRoute => self.composer.cancel(),
            Action::SaveRoute => {
                if let Err(err) = self.composer.save().await {
                    warn!("Route not saved: {err}");
                    return Err(err.into());
                }
            }
            Action::RemoveStop => {
                let value = target
                    .data("stop-index")
                    .ok_or(Error::MissingAttribute("stop-index"))?;
                let index: usize = value.parse().map_err(|_| Error::InvalidAttribute {
                    name: "stop-index",
                    value: value.to_string(),
                })?;
                self.composer.remove_at(index)?;
            }
            Action::ClearAll => self.composer.clear_all()?,
            Action::BusNumber => {
                let value = target.value.clone().unwrap_or_default();
                self.composer.set_label(value)?;
            }
            Action::Direction => {
                if target.checked {
                    let value = target.value.clone().unwrap_or_default();
                    let direction = value
                        .parse::<u8>()
                        .ok()
                        .and_then(Direction::from_code)
                        .ok_or(Error::InvalidAttribute {
                            name: "direction",
                            value,
                        })?;
                    self.composer.set_direction(direction)?;
                }
            }
        }
        Ok(true)
    }

    /// Viewport moved, visible stops are recomputed from the new bounds.
    pub fn on_map_move(&mut self, bounds: Bounds) {
        self.layer.move_to(bounds);
    }

    pub fn visible_stops(&self) -> impl Iterator<Item = &Stop> + Clone + '_ {
        self.layer.visible()
    }

    /// Marker click. Only forwarded to the composer while it is composing.
    pub fn on_marker_click(&mut self, stop_id: StopId) -> Result<(), Error> {
        if self.composer.mode() == Mode::Inactive {
            return Ok(());
        }
        let stop = self
            .layer
            .visible_stop(stop_id)
            .cloned()
            .ok_or(Error::UnknownStop(stop_id))?;
        self.composer.toggle_stop(&stop)?;
        Ok(())
    }

    async fn ensure_stops(&mut self) -> Result<(), Error> {
        if self.layer.is_empty() {
            self.load_stops().await?;
        }
        Ok(())
    }

    /// Fetches the stored routes and hands them to the view.
    pub async fn load_routes(&mut self) -> Result<Vec<RouteSummary>, Error> {
        let result = self.composer.catalog().routes().await;
        match result {
            Ok(routes) => {
                info!("Loaded {} routes", routes.len());
                self.composer.view_mut().render_routes(&routes);
                Ok(routes)
            }
            Err(err) => {
                error!("Failed to load routes: {err}");
                self.composer
                    .view_mut()
                    .show_error("Could not load bus routes. Please try again.");
                Err(err.into())
            }
        }
    }

    /// Fetches the full stop catalog into the stop layer.
    pub async fn load_stops(&mut self) -> Result<usize, Error> {
        let result = self.composer.catalog().all_stops().await;
        match result {
            Ok(stops) => {
                let count = stops.len();
                self.layer.replace_stops(stops);
                info!("Loaded {count} stops");
                Ok(count)
            }
            Err(err) => {
                error!("Failed to load stops: {err}");
                self.composer
                    .view_mut()
                    .show_error("Could not load bus stops. Please try again.");
                Err(err.into())
            }
        }
    }

    /// Fetches a stored route and draws it on the map.
    pub async fn show_route(
        &mut self,
        bus_number: &str,
        direction: Direction,
    ) -> Result<Vec<RouteStop>, Error> {
        let id = route_id(bus_number, direction);
        let result = self.composer.catalog().route_stops(&id).await;
        match result {
            Ok(stops) => {
                let line: Vec<_> = stops.iter().map(RouteStop::coordinate).collect();
                self.composer.map_mut().draw_sequence(&line);
                Ok(stops)
            }
            Err(err) => {
                error!("Failed to load route {id}: {err}");
                let message = if err.is_not_found() {
                    format!("Route {bus_number} ({direction}) does not exist.")
                } else {
                    format!("Could not load route {bus_number}. Please try again.")
                };
                self.composer.view_mut().show_error(&message);
                Err(err.into())
            }
        }
    }
}
