use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::backend::BlogStore;

pub mod error;
pub mod handlers;

pub use error::{ApiError, ApiResult};

/// Builds the HTTP API on top of an already opened store.
///
/// The caller keeps its own handle to `store` so it can close it on shutdown.
pub fn router<S: BlogStore>(store: Arc<S>) -> Router {
    Router::new()
        .route(
            "/api/blogs",
            get(handlers::list_blogs::<S>).post(handlers::create_blog::<S>),
        )
        .route(
            "/api/blogs/{id}",
            get(handlers::get_blog::<S>)
                .put(handlers::update_blog::<S>)
                .delete(handlers::delete_blog::<S>),
        )
        .fallback(handlers::unknown_endpoint)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(store)
        .layer(TraceLayer::new_for_http())
}
