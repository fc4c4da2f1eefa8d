//! codegear-api — REST API for the site content store.
//!
//! Provides axum route handlers that read, update, and reset the content
//! partitions, plus notice-level helpers used by the admin console.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/content?partition=` | Read one partition, or the whole document |
//! | POST | `/api/content` | Write a partition (`{ partition, data }`) |
//! | DELETE | `/api/content?partition=` | Reset one partition, or everything |
//! | POST | `/api/content/notices` | Add a notice |
//! | PATCH | `/api/content/notices/{id}` | Edit a notice |
//! | DELETE | `/api/content/notices/{id}` | Delete a notice |
//! | POST | `/api/content/notices/{id}/views` | Count a view |
//! | GET | `/healthz` | Liveness |
//!
//! `type` is accepted wherever `partition` is, for older clients.

pub mod handlers;

use axum::Router;
use axum::routing::{get, patch, post};
use codegear_content::ContentStore;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: ContentStore,
}

/// Build the complete API router.
pub fn build_router(store: ContentStore) -> Router {
    let api_state = ApiState { store };

    let api_routes = Router::new()
        .route(
            "/content",
            get(handlers::read_content)
                .post(handlers::write_content)
                .delete(handlers::reset_content),
        )
        .route("/content/notices", post(handlers::add_notice))
        .route(
            "/content/notices/{id}",
            patch(handlers::update_notice).delete(handlers::delete_notice),
        )
        .route("/content/notices/{id}/views", post(handlers::record_view))
        .with_state(api_state);

    Router::new()
        .nest("/api", api_routes)
        .route("/healthz", get(handlers::healthz))
}
