//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use icebot_composer::IceBot;
use icebot_memory::ConversationStore;
use icebot_understanding::{ProfileScanner, MAX_IMAGE_BYTES};

use crate::routes;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub bot: Arc<IceBot>,
    pub scanner: Arc<ProfileScanner>,
    pub store: Arc<dyn ConversationStore>,
}

impl GatewayState {
    pub fn new(bot: Arc<IceBot>, store: Arc<dyn ConversationStore>) -> Self {
        let scanner = Arc::new(ProfileScanner::new(Arc::clone(&bot)));
        Self {
            bot,
            scanner,
            store,
        }
    }
}

/// Body limit for image routes: room for a base64 image of twice
/// [`MAX_IMAGE_BYTES`] plus JSON framing. Oversized images reach the payload
/// check and get its message instead of a bare 413.
pub const IMAGE_BODY_LIMIT: usize = (MAX_IMAGE_BYTES * 2).div_ceil(3) * 4 + 64 * 1024;

/// Build the Axum router with all API routes.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/style", post(routes::set_style))
        .route("/api/generate", post(routes::generate))
        .route("/api/enhance", post(routes::enhance))
        .route("/api/profile", post(routes::profile))
        .route(
            "/api/analyze",
            post(routes::analyze).layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .route(
            "/api/scan",
            post(routes::scan).layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .route("/api/feedback", post(routes::feedback))
        .route(
            "/api/conversations",
            get(routes::list_conversations).post(routes::create_conversation),
        )
        .route("/api/conversations/order", post(routes::reorder_conversations))
        .route("/api/conversations/:id", delete(routes::delete_conversation))
        .route("/api/conversations/:id/messages", post(routes::append_message))
        .route("/api/conversations/:id/reply", post(routes::reply))
        .route(
            "/api/conversations/:id/messages/:mid/regenerate",
            post(routes::regenerate),
        )
        .route(
            "/api/conversations/:id/messages/:mid/enhance",
            post(routes::enhance_in_place),
        )
        .route("/api/saved", get(routes::list_saved).post(routes::save_message))
        .route("/api/saved/:id", delete(routes::delete_saved))
        .route("/api/saved/:id/success", post(routes::set_saved_success))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the HTTP server and serves until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
