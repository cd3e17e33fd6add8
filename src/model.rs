use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::shared::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub u64);

impl Display for StopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StopId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A bus stop as served by the stop catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Stop {
    pub fn new(id: impl Into<StopId>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lon,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.lat,
            longitude: self.lon,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Outbound,
    Inbound,
}

impl Direction {
    pub const fn code(&self) -> u8 {
        match self {
            Direction::Outbound => 0,
            Direction::Inbound => 1,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Direction::Outbound),
            1 => Some(Direction::Inbound),
            _ => None,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Outbound => write!(f, "Outbound"),
            Direction::Inbound => write!(f, "Return"),
        }
    }
}

/// Route identifier used by the catalog: `_1` suffix for outbound, `_2` for return.
pub fn route_id(bus_number: &str, direction: Direction) -> String {
    format!("{}_{}", bus_number, direction.code() + 1)
}

/// Splits a catalog route id back into bus number and direction. Ids without
/// a `_1`/`_2` suffix are read as a bare outbound bus number.
pub fn parse_route_id(route_id: &str) -> (&str, Direction) {
    let parsed = route_id.rsplit_once('_').and_then(|(bus_number, suffix)| {
        let code = suffix.parse::<u8>().ok()?.checked_sub(1)?;
        Some((bus_number, Direction::from_code(code)?))
    });
    match parsed {
        Some((bus_number, direction)) if !bus_number.is_empty() => (bus_number, direction),
        _ => (route_id, Direction::Outbound),
    }
}

/// Body of the create-route request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRouteRequest {
    pub bus_number: String,
    pub direction: u8,
    pub stop_ids: Vec<StopId>,
}

/// One row of a stored route as returned by the route detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub lat: f64,
    pub lon: f64,
    pub sequence: u32,
    pub name: String,
}

/// Entry of the stored routes list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub route_id: String,
    pub bus_number: String,
    pub direction: u8,
    pub name: String,
    pub stop_count: usize,
}

impl RouteStop {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.lat,
            longitude: self.lon,
        }
    }
}

#[test]
fn route_id_test() {
    assert_eq!(route_id("12", Direction::Outbound), "12_1");
    assert_eq!(route_id("12", Direction::Inbound), "12_2");
}

#[test]
fn parse_route_id_test() {
    assert_eq!(parse_route_id("12_2"), ("12", Direction::Inbound));
    assert_eq!(parse_route_id("12_1"), ("12", Direction::Outbound));
    assert_eq!(parse_route_id("12"), ("12", Direction::Outbound));
    assert_eq!(parse_route_id("N_3"), ("N_3", Direction::Outbound));
    assert_eq!(parse_route_id("_2"), ("_2", Direction::Outbound));
}

#[test]
fn direction_code_test() {
    assert_eq!(Direction::from_code(Direction::Inbound.code()), Some(Direction::Inbound));
    assert_eq!(Direction::from_code(2), None);
}
