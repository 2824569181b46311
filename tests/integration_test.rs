use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use campus_parking::{
    api::{OccupancyClient, SummarySource},
    app::App,
    config::AppConfig,
    error::FetchError,
    occupancy::{self, LoadState, OccupancyStatus},
    routes::Route,
};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// What the fake occupancy backend answers with
#[derive(Clone, Copy)]
enum Reply {
    Ok,
    Status(StatusCode),
    Garbage,
}

#[derive(Clone)]
struct Backend {
    hits: Arc<AtomicUsize>,
    reply: Arc<Mutex<Reply>>,
    lots: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    fn new(reply: Reply) -> Self {
        Self {
            hits: Arc::new(AtomicUsize::new(0)),
            reply: Arc::new(Mutex::new(reply)),
            lots: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }
}

async fn process(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    backend.hits.fetch_add(1, Ordering::SeqCst);
    if let Some(lot) = params.get("process") {
        backend.lots.lock().unwrap().push(lot.clone());
    }
    let reply = *backend.reply.lock().unwrap();
    match reply {
        Reply::Ok => Json(json!({
            "result": {
                "total_spots": 120,
                "occupied_spots": 44,
                "vacant_spots": 70,
                "occupancy_rate": 36.7,
                "occupied_spot_index": [2, 3, 5, 7, 11]
            }
        }))
        .into_response(),
        Reply::Status(code) => (code, "backend exploded").into_response(),
        Reply::Garbage => (StatusCode::OK, "{\"result\": {\"total_spots\": \"many\"}}").into_response(),
    }
}

async fn parking_map_pdf() -> Response {
    (
        [("content-type", "application/pdf")],
        b"%PDF-1.4\n% fake campus map\n".to_vec(),
    )
        .into_response()
}

/// Serve the fake backend on an ephemeral port and return its base URL
async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/process/", get(process))
        .route("/docs/map.pdf", get(parking_map_pdf))
        .with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn scripted_input(lines: &[&str]) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(lines.len().max(1));
    for line in lines {
        tx.try_send(line.to_string()).unwrap();
    }
    rx
}

#[tokio::test]
async fn test_fetch_decodes_summary_as_reported() {
    let backend = Backend::new(Reply::Ok);
    let base = spawn_backend(backend.clone()).await;
    let client = OccupancyClient::new(base);

    let response = client.fetch_data("/?process=AA+Lot+North+2").await.unwrap();
    assert_eq!(response.result.total_spots, 120);
    // Not recomputed as total - occupied
    assert_eq!(response.result.vacant_spots, 70);
    assert_eq!(response.result.occupied_spot_index, vec![2, 3, 5, 7, 11]);
    assert_eq!(
        OccupancyStatus::from_rate(response.result.occupancy_rate),
        OccupancyStatus::Plenty
    );
    assert_eq!(backend.lots.lock().unwrap().as_slice(), ["AA Lot North 2"]);
}

#[tokio::test]
async fn test_server_error_and_bad_body_are_failures() {
    let backend = Backend::new(Reply::Status(StatusCode::INTERNAL_SERVER_ERROR));
    let base = spawn_backend(backend.clone()).await;
    let client = OccupancyClient::new(base);

    assert!(client.fetch_data("/?process=lot").await.is_none());
    assert!(matches!(
        client.try_fetch_data("/?process=lot").await,
        Err(FetchError::Status(500))
    ));

    backend.set_reply(Reply::Garbage);
    assert!(matches!(
        client.try_fetch_data("/?process=lot").await,
        Err(FetchError::Decode(_))
    ));
    assert!(client.fetch_data("/?process=lot").await.is_none());
}

#[tokio::test]
async fn test_http_500_shows_error_and_retry_sends_one_request() {
    let backend = Backend::new(Reply::Status(StatusCode::INTERNAL_SERVER_ERROR));
    let base = spawn_backend(backend.clone()).await;
    let source: Arc<dyn SummarySource> = Arc::new(OccupancyClient::new(base));

    let mut poll = occupancy::start(source, "/?process=AA+Lot+North+2", Duration::from_secs(120));
    let state = poll.changed().await.unwrap();
    assert_eq!(state, LoadState::Error("Failed to fetch data".to_string()));
    assert_eq!(backend.hits(), 1);

    backend.set_reply(Reply::Ok);
    poll.retry();
    assert_eq!(poll.current(), LoadState::Loading);
    let state = poll.changed().await.unwrap();
    assert_eq!(state.summary().unwrap().occupied_spots, 44);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(backend.hits(), 2);
}

#[tokio::test]
async fn test_navigation_from_home_to_occupancy_and_back() {
    let backend = Backend::new(Reply::Ok);
    let base = spawn_backend(backend).await;
    let config = AppConfig {
        api_base_url: base,
        ..AppConfig::default()
    };
    let app = App::new(config);

    let mut input = scripted_input(&[
        "1",
        "select brown",
        "select witherspoon",
        "view",
        "b",
        "back",
        "q",
    ]);
    let mut out = Vec::new();
    app.run(Route::Home, &mut input, &mut out).await.unwrap();

    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.matches("ATU Campus Parking Tool").count(), 2);
    assert!(out.contains("Campus Map (390x844)"));
    assert!(out.contains("┌ Witherspoon Hall"));
    assert!(out.contains("── AA Lot North ──"));
}

#[tokio::test]
async fn test_parking_map_is_saved_to_cache() {
    let backend = Backend::new(Reply::Ok);
    let base = spawn_backend(backend).await;
    let cache = TempDir::new().unwrap();
    let config = AppConfig {
        api_base_url: base.clone(),
        parking_map_url: format!("{}/docs/map.pdf", base),
        cache_dir: cache.path().join("cache"),
        ..AppConfig::default()
    };
    let app = App::new(config);

    let mut input = scripted_input(&["b"]);
    let mut out = Vec::new();
    app.run(Route::ParkingMap, &mut input, &mut out).await.unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Parking map ready"), "{}", out);
    let saved = std::fs::read(cache.path().join("cache/parking-map.pdf")).unwrap();
    assert!(saved.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_missing_parking_map_offers_retry() {
    let backend = Backend::new(Reply::Ok);
    let base = spawn_backend(backend).await;
    let cache = TempDir::new().unwrap();
    let config = AppConfig {
        parking_map_url: format!("{}/docs/missing.pdf", base),
        cache_dir: cache.path().to_path_buf(),
        ..AppConfig::default()
    };
    let app = App::new(config);

    let mut input = scripted_input(&["q"]);
    let mut out = Vec::new();
    app.run(Route::ParkingMap, &mut input, &mut out).await.unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Could not load the parking map: HTTP Error 404"));
    assert!(out.contains("[r] Retry"));
}
