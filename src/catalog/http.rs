use std::sync::Arc;

use reqwest::{Client, Response, Url};
use tracing::{debug, error};

use crate::{
    catalog::{self, Config, StopCatalog},
    model::{AddRouteRequest, RouteStop, RouteSummary, Stop},
};

/// Stop catalog reached over the REST api.
#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    config: Arc<Config>,
}

impl HttpCatalog {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl StopCatalog for HttpCatalog {
    async fn all_stops(&self) -> Result<Vec<Stop>, catalog::Error> {
        let url = self.config.url(&self.config.all_stops_path);
        debug!("Fetching stops from {url}");
        let response = self.client.get(url).send().await?;
        let stops: Vec<Stop> = ensure_success(response).await?.json().await?;
        debug!("Fetched {} stops", stops.len());
        Ok(stops)
    }

    async fn routes(&self) -> Result<Vec<RouteSummary>, catalog::Error> {
        let url = self.config.url(&self.config.route_path);
        debug!("Fetching routes from {url}");
        let response = self.client.get(url).send().await?;
        let routes: Vec<RouteSummary> = ensure_success(response).await?.json().await?;
        debug!("Fetched {} routes", routes.len());
        Ok(routes)
    }

    async fn route_stops(&self, route_id: &str) -> Result<Vec<RouteStop>, catalog::Error> {
        let url = Url::parse_with_params(
            &self.config.url(&self.config.route_path),
            &[("routeId", route_id)],
        )
        .map_err(|err| catalog::Error::InvalidUrl(err.to_string()))?;
        debug!("Fetching route {route_id}");
        let response = self.client.get(url).send().await?;
        let mut stops: Vec<RouteStop> = ensure_success(response).await?.json().await?;
        stops.sort_by_key(|stop| stop.sequence);
        Ok(stops)
    }

    async fn add_route(&self, request: &AddRouteRequest) -> Result<(), catalog::Error> {
        let url = self.config.url(&self.config.add_route_path);
        debug!(
            "Creating route {} with {} stops",
            request.bus_number,
            request.stop_ids.len()
        );
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, catalog::Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!("Response is not success ({status}): {body}");
    Err(catalog::Error::Status {
        status: status.as_u16(),
        body,
    })
}
