use futures_util::future::{Abortable, LocalBoxFuture};

use crate::{catalog, model::AddRouteRequest};

/// A create-route request in flight.
///
/// Await it with [`Submission::wait`] and hand the outcome back to
/// [`RouteComposer::complete`](super::RouteComposer::complete).
pub struct Submission {
    pub(crate) ticket: u64,
    pub(crate) route_id: String,
    pub(crate) request: AddRouteRequest,
    pub(crate) call: Abortable<LocalBoxFuture<'static, Result<(), catalog::Error>>>,
}

impl Submission {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn request(&self) -> &AddRouteRequest {
        &self.request
    }

    pub async fn wait(self) -> Outcome {
        let result = self.call.await.ok();
        Outcome {
            ticket: self.ticket,
            route_id: self.route_id,
            result,
        }
    }
}

/// Result of a finished [`Submission`]. `result` is `None` when the request was aborted.
#[derive(Debug)]
pub struct Outcome {
    pub(crate) ticket: u64,
    pub(crate) route_id: String,
    pub(crate) result: Option<Result<(), catalog::Error>>,
}

impl Outcome {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn is_aborted(&self) -> bool {
        self.result.is_none()
    }
}
