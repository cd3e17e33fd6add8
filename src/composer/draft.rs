use thiserror::Error;

use crate::{
    model::{AddRouteRequest, Direction, Stop, StopId},
    shared::geo::{Coordinate, Distance},
};

/// Minimum number of stops a route needs before it can be saved.
pub const MIN_ROUTE_STOPS: usize = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("A bus number is required")]
    MissingLabel,
    #[error("At least 2 stops are required, {0} selected")]
    TooFewStops(usize),
}

/// A stop of the draft together with its place in the sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedStop<'a> {
    pub stop: &'a Stop,
    pub position: usize,
}

/// One line of the rendered sequence list.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRow {
    pub position: usize,
    pub stop_id: StopId,
    pub name: String,
    /// Straight line distance from the previous stop, `None` for the first one.
    pub from_previous: Option<Distance>,
}

impl SequenceRow {
    /// 1-based number shown to the user.
    pub fn sequence(&self) -> usize {
        self.position + 1
    }
}

/// The route under construction. Positions are never stored, they are the
/// index of the stop in `stops`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RouteDraft {
    label: String,
    direction: Direction,
    stops: Vec<Stop>,
}

impl RouteDraft {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn stops(&self) -> impl ExactSizeIterator<Item = SelectedStop<'_>> + '_ {
        self.stops
            .iter()
            .enumerate()
            .map(|(position, stop)| SelectedStop { stop, position })
    }

    pub fn get(&self, position: usize) -> Option<SelectedStop<'_>> {
        self.stops
            .get(position)
            .map(|stop| SelectedStop { stop, position })
    }

    pub fn position_of(&self, id: StopId) -> Option<usize> {
        self.stops.iter().position(|stop| stop.id == id)
    }

    pub fn contains(&self, id: StopId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn stop_ids(&self) -> Vec<StopId> {
        self.stops.iter().map(|stop| stop.id).collect()
    }

    pub fn line(&self) -> Vec<Coordinate> {
        self.stops.iter().map(Stop::coordinate).collect()
    }

    /// Straight line length of the route through all stops in order.
    pub fn length(&self) -> Distance {
        self.stops
            .windows(2)
            .map(|pair| pair[0].coordinate().euclidean_distance(&pair[1].coordinate()))
            .sum()
    }

    pub fn rows(&self) -> Vec<SequenceRow> {
        self.stops
            .iter()
            .enumerate()
            .map(|(position, stop)| SequenceRow {
                position,
                stop_id: stop.id,
                name: stop.name.clone(),
                from_previous: position.checked_sub(1).map(|previous| {
                    self.stops[previous]
                        .coordinate()
                        .euclidean_distance(&stop.coordinate())
                }),
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.label.trim().is_empty() {
            return Err(ValidationError::MissingLabel);
        }
        if self.stops.len() < MIN_ROUTE_STOPS {
            return Err(ValidationError::TooFewStops(self.stops.len()));
        }
        Ok(())
    }

    /// Builds the create-route payload, stop ids in draft order.
    pub fn to_request(&self) -> Result<AddRouteRequest, ValidationError> {
        self.validate()?;
        Ok(AddRouteRequest {
            bus_number: self.label.trim().to_string(),
            direction: self.direction.code(),
            stop_ids: self.stop_ids(),
        })
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.label = label;
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Appends `stop` unless its id is already in the sequence.
    pub(crate) fn push(&mut self, stop: Stop) -> bool {
        if self.contains(stop.id) {
            return false;
        }
        self.stops.push(stop);
        true
    }

    /// Removes the stop at `position` and every stop after it.
    pub(crate) fn truncate_from(&mut self, position: usize) -> Vec<Stop> {
        if position >= self.stops.len() {
            return Vec::new();
        }
        self.stops.split_off(position)
    }

    pub(crate) fn clear(&mut self) -> Vec<Stop> {
        std::mem::take(&mut self.stops)
    }
}
