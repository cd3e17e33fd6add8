use std::collections::HashMap;

use tracing::debug;

use crate::{
    model::{Stop, StopId},
    shared::geo::{Bounds, Coordinate},
};

/// Drawing primitives the composer needs from the map widget.
///
/// Marker state is a projection of the composer's draft. Implementations
/// only render what they are told and are never read back.
pub trait MapSurface {
    /// While enabled every click on a visible stop marker is forwarded to the composer.
    fn set_selection_forwarding(&mut self, enabled: bool);

    fn mark(&mut self, stop_id: StopId, selected: bool);

    /// Replaces the drawn route line. An empty slice clears it.
    fn draw_sequence(&mut self, line: &[Coordinate]);
}

/// The catalog's stops filtered down to the current viewport.
#[derive(Debug, Default, Clone)]
pub struct StopLayer {
    stops: Box<[Stop]>,
    lookup: HashMap<StopId, usize>,
    bounds: Bounds,
}

impl StopLayer {
    pub fn new(stops: Vec<Stop>, bounds: Bounds) -> Self {
        let mut layer = Self {
            bounds,
            ..Default::default()
        };
        layer.replace_stops(stops);
        layer
    }

    pub fn replace_stops(&mut self, stops: Vec<Stop>) {
        self.lookup = stops
            .iter()
            .enumerate()
            .map(|(i, stop)| (stop.id, i))
            .collect();
        self.stops = stops.into();
        debug!("Stop layer holds {} stops", self.stops.len());
    }

    /// Records a viewport move. The next call to [`StopLayer::visible`] uses the new bounds.
    pub fn move_to(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Lazily enumerates the stops inside the current bounds. The iterator can
    /// be cloned to restart the enumeration.
    pub fn visible(&self) -> impl Iterator<Item = &Stop> + Clone + '_ {
        let bounds = self.bounds;
        self.stops
            .iter()
            .filter(move |stop| bounds.contains(&stop.coordinate()))
    }

    pub fn get(&self, id: StopId) -> Option<&Stop> {
        self.lookup.get(&id).map(|index| &self.stops[*index])
    }

    /// Stop lookup restricted to markers the user can actually see.
    pub fn visible_stop(&self, id: StopId) -> Option<&Stop> {
        self.get(id)
            .filter(|stop| self.bounds.contains(&stop.coordinate()))
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}
