//! HTTP route definitions

use axum::{
    extract::State,
    http::{header, Method},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::app::AppState;
use crate::util::time::uptime_secs;
use crate::ws::handler::ws_handler;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration - "*" allows any origin, otherwise a comma-separated
    // origin list in CLIENT_ORIGIN (a wildcard must not go into the list form)
    let allow_origin = if state.config.client_origin.trim() == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<header::HeaderValue> = state
            .config
            .client_origin
            .split(',')
            .filter_map(|s| s.trim().parse::<header::HeaderValue>().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    players: usize,
    clock_running: bool,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        players: state.room.player_count(),
        clock_running: state.room.clock_running(),
    })
}

#[cfg(test)]
mod tests {
    use crate::config::Config;

    use super::*;

    fn config(origin: &str) -> Config {
        Config {
            server_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".to_string(),
            tick_period_ms: 100,
            grid_width: 64,
            grid_height: 48,
            snake_length: 5,
            client_origin: origin.to_string(),
        }
    }

    #[test]
    fn wildcard_origin_builds_router() {
        // default CLIENT_ORIGIN; must not panic inside the CORS layer
        build_router(AppState::new(config("*")));
    }

    #[test]
    fn origin_list_builds_router() {
        build_router(AppState::new(config(
            "http://localhost:3000, https://example.com",
        )));
    }
}
