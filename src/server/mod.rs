//! HTTP surface: the provider proxy endpoints plus the trip, itinerary and booking API.

use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{delete, get, post, put},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use crate::{config::Config, error::Result};
use routes::*;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/gemini", post(gemini_handler))
        .route("/api/env", get(env_handler))
        .route(
            "/api/draft",
            get(load_draft_handler)
                .put(save_draft_handler)
                .delete(clear_draft_handler),
        )
        .route("/api/trips", post(plan_trip_handler).get(list_trips_handler))
        .route("/api/trips/:id", delete(delete_trip_handler))
        .route("/api/trips/:id/itinerary", post(itinerary_handler))
        .route("/api/trips/:id/save", post(save_trip_handler))
        .route("/api/trips/:id/pdf", post(pdf_handler))
        .route(
            "/api/bookings",
            post(booking_handler).get(list_bookings_handler),
        )
        .route("/api/bookings/estimate", post(estimate_handler))
        .layer(cors)
        .with_state(state)
}

/// Bind `0.0.0.0:<port>` and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: Config) -> Result<()> {
    let address = format!("0.0.0.0:{}", config.port);

    info!("Initializing state...");
    let state = AppState::from_config(config)?;
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                warn!(error = %err, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                warn!(error = %err, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
