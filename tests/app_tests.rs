mod common;

use bus_routes::{
    app::{self, App, View},
    composer::Mode,
    dispatch::{Element, EventKind},
    model::{Direction, RouteStop, RouteSummary, StopId},
    shared::geo::Bounds,
};
use common::{FakeCatalog, RecordingMap, RecordingView, bounds, stops};

type TestApp = App<FakeCatalog, RecordingMap, RecordingView>;

async fn app() -> (TestApp, FakeCatalog) {
    let catalog = FakeCatalog::with_stops(stops(5));
    let mut app = App::new(
        catalog.clone(),
        RecordingMap::default(),
        RecordingView::default(),
        bounds(),
    );
    app.load_stops().await.unwrap();
    (app, catalog)
}

fn click_action(action: &str) -> Element {
    Element::new("button").with_data("action", action)
}

#[tokio::test]
async fn add_route_flow_through_events() {
    let (mut app, catalog) = app().await;

    assert!(
        app.handle_event(EventKind::Click, &click_action("add-route"))
            .await
            .unwrap()
    );
    assert_eq!(app.current_view(), Some(View::AddRoute));
    assert_eq!(app.composer().mode(), Mode::Composing);
    assert!(app.composer().map().forwarding);

    for id in [2, 4, 5] {
        app.on_marker_click(StopId(id)).unwrap();
    }
    let remove = click_action("remove-stop").with_data("stop-index", "2");
    app.handle_event(EventKind::Click, &remove).await.unwrap();

    let bus_number = Element::new("input")
        .with_data("field", "bus-number")
        .with_value("34");
    app.handle_event(EventKind::Change, &bus_number)
        .await
        .unwrap();
    let direction = Element::new("input")
        .with_data("field", "direction")
        .with_value("1")
        .with_checked(true);
    app.handle_event(EventKind::Change, &direction)
        .await
        .unwrap();

    app.handle_event(EventKind::Click, &click_action("save-route"))
        .await
        .unwrap();

    let created = catalog.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].bus_number, "34");
    assert_eq!(created[0].direction, Direction::Inbound.code());
    assert_eq!(created[0].stop_ids, vec![StopId(2), StopId(4)]);
    assert_eq!(app.composer().mode(), Mode::Inactive);
}

#[tokio::test]
async fn leaving_add_route_page_cancels_draft() {
    let (mut app, _) = app().await;
    app.navigate("/routes/add").await;
    app.on_marker_click(StopId(1)).unwrap();
    app.on_marker_click(StopId(3)).unwrap();

    let link = Element::new("a").with_data("route", "/stops");
    app.handle_event(EventKind::Click, &link).await.unwrap();
    assert_eq!(app.current_view(), Some(View::Stops));
    assert_eq!(app.composer().mode(), Mode::Inactive);
    assert!(app.composer().map().selected.is_empty());
}

#[tokio::test]
async fn marker_clicks_are_ignored_outside_composition() {
    let (mut app, _) = app().await;
    app.navigate("/").await;
    app.on_marker_click(StopId(1)).unwrap();
    assert!(app.composer().draft().is_none());
    assert!(app.composer().map().selected.is_empty());
}

#[tokio::test]
async fn only_visible_stops_can_be_selected() {
    let (mut app, _) = app().await;
    app.navigate("/routes/add").await;

    // Stops 1 and 2 sit at latitude 10.772 and 10.774
    app.on_map_move(Bounds::new((10.771, 106.68).into(), (10.775, 106.70).into()));
    let visible: Vec<_> = app.visible_stops().map(|stop| stop.id.0).collect();
    assert_eq!(visible, vec![1, 2]);

    app.on_marker_click(StopId(2)).unwrap();
    assert!(matches!(
        app.on_marker_click(StopId(5)),
        Err(app::Error::UnknownStop(StopId(5)))
    ));
    assert_eq!(
        app.composer().draft().unwrap().stop_ids(),
        vec![StopId(2)]
    );

    app.on_map_move(bounds());
    let restartable = app.visible_stops();
    assert_eq!(restartable.clone().count(), 5);
    assert_eq!(restartable.count(), 5);
}

#[tokio::test]
async fn failed_stop_load_is_shown_inline() {
    let catalog = FakeCatalog::with_stops(stops(3));
    catalog.fail_loads(true);
    let mut app = App::new(
        catalog.clone(),
        RecordingMap::default(),
        RecordingView::default(),
        bounds(),
    );
    assert!(app.load_stops().await.is_err());
    assert!(app.layer().is_empty());
    assert_eq!(app.composer().view().errors.len(), 1);

    catalog.fail_loads(false);
    assert_eq!(app.load_stops().await.unwrap(), 3);
}

#[tokio::test]
async fn route_detail_draws_stored_route() {
    let (mut app, catalog) = app().await;
    catalog.state.borrow_mut().routes.insert(
        "19_1".into(),
        vec![
            RouteStop {
                lat: 10.78,
                lon: 106.70,
                sequence: 1,
                name: "Second".into(),
            },
            RouteStop {
                lat: 10.77,
                lon: 106.69,
                sequence: 0,
                name: "First".into(),
            },
        ],
    );

    assert_eq!(app.navigate("/routes/19").await, View::RouteDetail);
    assert_eq!(app.composer().map().line.len(), 2);

    assert_eq!(app.navigate("/routes/20").await, View::RouteDetail);
    let errors = &app.composer().view().errors;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("does not exist"));
}

#[tokio::test]
async fn invalid_remove_index_is_reported() {
    let (mut app, _) = app().await;
    app.navigate("/routes/add").await;
    let remove = click_action("remove-stop").with_data("stop-index", "first");
    assert!(matches!(
        app.handle_event(EventKind::Click, &remove).await,
        Err(app::Error::InvalidAttribute { .. })
    ));
    let unregistered = Element::new("div").with_class("legend");
    assert!(
        !app.handle_event(EventKind::Click, &unregistered)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn unknown_path_shows_not_found() {
    let (mut app, _) = app().await;
    assert_eq!(app.navigate("/timetables").await, View::NotFound);
}

#[tokio::test]
async fn add_route_page_loads_stops_on_first_visit() {
    let catalog = FakeCatalog::with_stops(stops(3));
    let mut app = App::new(
        catalog,
        RecordingMap::default(),
        RecordingView::default(),
        bounds(),
    );
    assert!(app.layer().is_empty());

    assert_eq!(app.navigate("/routes/add").await, View::AddRoute);
    assert_eq!(app.layer().len(), 3);
    app.on_marker_click(StopId(1)).unwrap();
    assert_eq!(app.composer().draft().unwrap().stop_ids(), vec![StopId(1)]);
}

#[tokio::test]
async fn routes_page_lists_stored_routes() {
    let (mut app, catalog) = app().await;
    let summary = RouteSummary {
        route_id: "56_2".into(),
        bus_number: "56".into(),
        direction: Direction::Inbound.code(),
        name: "Stop 1 - Stop 3".into(),
        stop_count: 3,
    };
    catalog.state.borrow_mut().listing.push(summary.clone());

    assert_eq!(app.navigate("/routes").await, View::Routes);
    assert_eq!(catalog.state.borrow().list_calls, 1);
    assert_eq!(app.composer().view().routes, vec![summary]);
    assert!(app.composer().view().errors.is_empty());

    catalog.fail_loads(true);
    app.navigate("/routes").await;
    assert_eq!(app.composer().view().errors.len(), 1);
}

#[tokio::test]
async fn route_detail_reaches_return_direction() {
    let (mut app, catalog) = app().await;
    let stored = |name: &str, lat: f64| RouteStop {
        lat,
        lon: 106.70,
        sequence: 0,
        name: name.into(),
    };
    {
        let mut state = catalog.state.borrow_mut();
        state.routes.insert("19_1".into(), vec![stored("Outbound", 10.77)]);
        state.routes.insert("19_2".into(), vec![stored("Return", 10.79)]);
    }

    app.navigate("/routes/19_2").await;
    assert_eq!(app.composer().map().line.len(), 1);
    assert_eq!(app.composer().map().line[0].latitude, 10.79);

    app.navigate("/routes/19_1").await;
    assert_eq!(app.composer().map().line[0].latitude, 10.77);
    assert!(app.composer().view().errors.is_empty());
}
