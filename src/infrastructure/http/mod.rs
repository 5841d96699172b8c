pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    creative::CreativeController, generation::GenerationController, health,
    tracks::TrackController, vocals::VocalsController,
};
use crate::domain::track::TrackRepository;
use crate::infrastructure::config::Config;

/// Build the application router with all routes and layers
pub fn build_router(
    track_repo: Arc<dyn TrackRepository>,
    generation_controller: Arc<GenerationController>,
    track_controller: Arc<TrackController>,
    creative_controller: Arc<CreativeController>,
    vocals_controller: Arc<VocalsController>,
    permissive_cors: bool,
) -> Router {
    // Generation routes
    let generation_routes = Router::new()
        .route("/api/generations", post(GenerationController::create))
        .route("/api/generations/:vendor/:taskId", get(GenerationController::status))
        .with_state(generation_controller);

    // Track library routes
    let track_routes = Router::new()
        .route("/api/tracks", get(TrackController::list_tracks))
        .route("/api/tracks/:id", get(TrackController::get_track))
        .with_state(track_controller);

    // Text generation routes
    let creative_routes = Router::new()
        .route("/api/lyrics", post(CreativeController::lyrics))
        .route("/api/video-concepts", post(CreativeController::video_concept))
        .route("/api/music-descriptions", post(CreativeController::music_description))
        .with_state(creative_controller);

    // Vocal synthesis routes
    let vocal_routes = Router::new()
        .route("/api/vocals", post(VocalsController::sing))
        .with_state(vocals_controller);

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(track_repo)
        .merge(generation_routes)
        .merge(track_routes)
        .merge(creative_routes)
        .merge(vocal_routes);

    let app = if permissive_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    app.layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
