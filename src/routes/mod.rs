use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod doc;
pub mod health;
pub mod home;

/// Request body cap for everything except image uploads.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

// `/api` routes, still missing their state. Only the admin image upload escapes the body cap.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/cart", cart::router())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .nest("/admin", admin::router())
}

/// Assembles every route of the application around `state`.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health::health_check))
        .nest("/bookstore", home::router())
        .merge(doc::scalar_docs())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .nest("/api", create_api_router())
        .with_state(state)
}
