mod route;
mod stop;

pub use route::*;
pub use stop::*;

use std::sync::Arc;

use axum::routing::{get, post};

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/api/busStop/all", get(all_stops))
        .route("/api/busStop/", get(stop))
        .route("/api/busRoute", get(route))
        .route("/api/busRoute/addRoute", post(add_route))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::ErrorDto;
    use bus_routes::{
        catalog::{self, HttpCatalog, StopCatalog},
        model::{AddRouteRequest, Stop, StopId},
    };
    use std::net::SocketAddr;

    fn stops() -> Vec<Stop> {
        vec![
            Stop::new(1u64, "Ben Thanh", 10.7725, 106.6980),
            Stop::new(2u64, "Nha Hat Thanh Pho", 10.7766, 106.7031),
            Stop::new(3u64, "Ba Son", 10.7833, 106.7072),
        ]
    }

    async fn spawn() -> SocketAddr {
        let state = Arc::new(AppState::new(stops()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        addr
    }

    fn client(addr: SocketAddr) -> HttpCatalog {
        HttpCatalog::new(catalog::Config::default().with_base_url(format!("http://{addr}")))
    }

    #[tokio::test]
    async fn serves_all_stops() {
        let addr = spawn().await;
        let stops = client(addr).all_stops().await.unwrap();
        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].name, "Ben Thanh");
    }

    #[tokio::test]
    async fn created_route_is_returned_in_order() {
        let addr = spawn().await;
        let catalog = client(addr);
        let request = AddRouteRequest {
            bus_number: "12".into(),
            direction: 0,
            stop_ids: vec![StopId(3), StopId(1), StopId(2)],
        };
        catalog.add_route(&request).await.unwrap();

        let route = catalog.route_stops("12_1").await.unwrap();
        let names: Vec<_> = route.iter().map(|stop| stop.name.as_str()).collect();
        assert_eq!(names, vec!["Ba Son", "Ben Thanh", "Nha Hat Thanh Pho"]);
        assert_eq!(route[0].sequence, 0);
    }

    #[tokio::test]
    async fn rejects_unknown_and_duplicate_stops() {
        let addr = spawn().await;
        let catalog = client(addr);
        let unknown = AddRouteRequest {
            bus_number: "12".into(),
            direction: 0,
            stop_ids: vec![StopId(1), StopId(99)],
        };
        let err = catalog.add_route(&unknown).await.unwrap_err();
        assert!(matches!(err, catalog::Error::Status { status: 400, .. }));

        let duplicate = AddRouteRequest {
            bus_number: "12".into(),
            direction: 1,
            stop_ids: vec![StopId(1), StopId(2), StopId(1)],
        };
        let err = catalog.add_route(&duplicate).await.unwrap_err();
        assert!(matches!(err, catalog::Error::Status { status: 400, .. }));
    }

    #[tokio::test]
    async fn lists_stored_routes() {
        let addr = spawn().await;
        let catalog = client(addr);
        assert!(catalog.routes().await.unwrap().is_empty());

        for (bus_number, direction, stop_ids) in [
            ("56", 1, vec![StopId(2), StopId(3)]),
            ("12", 0, vec![StopId(1), StopId(2), StopId(3)]),
        ] {
            let request = AddRouteRequest {
                bus_number: bus_number.into(),
                direction,
                stop_ids,
            };
            catalog.add_route(&request).await.unwrap();
        }

        let routes = catalog.routes().await.unwrap();
        let ids: Vec<_> = routes.iter().map(|route| route.route_id.as_str()).collect();
        assert_eq!(ids, vec!["12_1", "56_2"]);
        assert_eq!(routes[0].name, "Ben Thanh - Ba Son");
        assert_eq!(routes[0].stop_count, 3);
        assert_eq!(routes[1].bus_number, "56");
        assert_eq!(routes[1].direction, 1);
    }

    #[tokio::test]
    async fn missing_route_is_not_found() {
        let addr = spawn().await;
        let err = client(addr).route_stops("404_1").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn missing_stop_has_error_body() {
        let addr = spawn().await;
        let response = reqwest::get(format!("http://{addr}/api/busStop/?id=42"))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404);
        let body: ErrorDto = response.json().await.unwrap();
        assert_eq!(body.status, 404);
        assert_eq!(body.path, "/api/busStop/");
        assert_eq!(body.error, "Not Found");
    }
}
