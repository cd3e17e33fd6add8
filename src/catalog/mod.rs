//! Access to the stop catalog: every bus stop, stored routes, and route creation.

mod config;
mod http;

pub use config::*;
pub use http::*;

use crate::model::{AddRouteRequest, RouteStop, RouteSummary, Stop};
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid url {0}")]
    InvalidUrl(String),
    #[error("Catalog responded with status {status}: {body}")]
    Status { status: u16, body: String },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Status { status: 404, .. })
    }
}

/// Request/response interface of the stop catalog.
///
/// Futures are not required to be `Send`, the composer drives them on the UI
/// thread.
pub trait StopCatalog {
    fn all_stops(&self) -> impl Future<Output = Result<Vec<Stop>, self::Error>>;

    /// Every stored route.
    fn routes(&self) -> impl Future<Output = Result<Vec<RouteSummary>, self::Error>>;

    /// Stops of a stored route, in sequence order.
    fn route_stops(
        &self,
        route_id: &str,
    ) -> impl Future<Output = Result<Vec<RouteStop>, self::Error>>;

    fn add_route(
        &self,
        request: &AddRouteRequest,
    ) -> impl Future<Output = Result<(), self::Error>>;
}
