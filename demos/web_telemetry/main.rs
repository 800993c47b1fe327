use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use descent::{init::json, GameSession, InputIntent, Settings};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use tower_http::cors::CorsLayer;

#[derive(Serialize)]
struct Zone {
    center_x: f64,
    half_width: f64,
    label: String,
    kind: String,
    surface_y: Option<f64>,
}

#[derive(Serialize)]
struct Lander {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    vx: f64,
    vy: f64,
    fuel: f64,
}

#[derive(Serialize)]
struct Snapshot {
    tick: usize,
    lander: Lander,
    outcome: String,
    landed_zone: Option<String>,
}

#[derive(Serialize)]
struct Telemetry {
    fuel: i64,
    altitude: i64,
    vertical_speed: f64,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Intent {
    up: bool,
    left: bool,
    right: bool,
}

#[derive(Clone)]
struct AppState {
    state: Arc<Mutex<GameSession>>,
    settings: Arc<Settings>,
}

const HISTORY_LIMIT: usize = 2_000;

impl AppState {
    // a panicking handler leaves the session as the last completed tick left it
    fn session(&self) -> MutexGuard<'_, GameSession> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut settings = match env::args().nth(1) {
        Some(path) => json::parse_settings(path).unwrap_or_else(|e| panic!("{e}")),
        None => Settings::default(),
    };
    // a client may keep ticking a hovering craft forever
    settings.history_limit = settings.history_limit.or(Some(HISTORY_LIMIT));
    let session = GameSession::try_new(settings.clone()).unwrap_or_else(|e| panic!("{e}"));
    let app = AppState {
        state: Arc::new(Mutex::new(session)),
        settings: Arc::new(settings),
    };

    // the mutex keeps ticks serialized, one physics + touchdown pass at a time
    let router = Router::new()
        .route("/terrain", get(handle_terrain))
        .route("/snapshot", get(handle_snapshot))
        .route("/telemetry", get(handle_telemetry))
        .route("/tick", put(handle_tick))
        .route("/reset", put(handle_reset))
        .with_state(app)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    log::info!("Serving lander telemetry on {:?}", listener.local_addr());
    axum::serve(listener, router).await.unwrap();
}

async fn handle_terrain(State(state): State<AppState>) -> Json<Value> {
    let session = state.session();
    let snapshot = session.snapshot();
    let points = snapshot
        .terrain
        .points()
        .iter()
        .map(|p| vec![p.x, p.y])
        .collect::<Vec<_>>();
    let zones = snapshot
        .zone_heights()
        .map(|(zone, surface_y)| Zone {
            center_x: zone.center_x,
            half_width: zone.half_width(),
            label: zone.label.clone(),
            kind: zone.kind.to_string(),
            surface_y,
        })
        .collect::<Vec<_>>();
    Json(serde_json::json!({ "points": points, "zones": zones }))
}

async fn handle_snapshot(State(state): State<AppState>) -> Json<Value> {
    let session = state.session();
    Json(serde_json::to_value(snapshot_of(&session)).unwrap())
}

async fn handle_telemetry(State(state): State<AppState>) -> Json<Value> {
    let session = state.session();
    let telemetry = session.telemetry();
    Json(
        serde_json::to_value(Telemetry {
            fuel: telemetry.fuel,
            altitude: telemetry.altitude,
            vertical_speed: telemetry.vertical_speed,
        })
        .unwrap(),
    )
}

async fn handle_tick(
    State(state): State<AppState>,
    Json(intent): Json<Intent>,
) -> Json<Value> {
    let mut session = state.session();
    session.tick(InputIntent::new(intent.up, intent.left, intent.right));
    let events = session
        .take_events()
        .iter()
        .map(|e| format!("{e:?}"))
        .collect::<Vec<_>>();
    Json(serde_json::json!({ "snapshot": snapshot_of(&session), "events": events }))
}

async fn handle_reset(State(state): State<AppState>) -> Result<(), (StatusCode, String)> {
    let mut session = state.session();
    *session = GameSession::try_new((*state.settings).clone()).map_err(|e| {
        let e = format!("Session reset failed: {e}");
        log::error!("{e}");
        (StatusCode::INTERNAL_SERVER_ERROR, e)
    })?;
    Ok(())
}

fn snapshot_of(session: &GameSession) -> Snapshot {
    let snapshot = session.snapshot();
    let lander = snapshot.lander;
    Snapshot {
        tick: snapshot.tick,
        lander: Lander {
            x: lander.x,
            y: lander.y,
            width: lander.width,
            height: lander.height,
            vx: lander.vx,
            vy: lander.vy,
            fuel: lander.fuel,
        },
        outcome: snapshot.outcome().to_string(),
        landed_zone: snapshot.landed_zone().map(|zone| zone.label.clone()),
    }
}
