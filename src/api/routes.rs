use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::FrontendConfig;
use crate::engine::VisitScanner;

use super::handlers::{get_all, get_base, health_check, post_base, post_details, AppState};
use super::static_files::serve_static;

pub fn create_router(scanner: Arc<VisitScanner>, frontend: FrontendConfig) -> Router {
    let state = Arc::new(AppState { scanner });
    let static_dir = frontend.static_dir;

    Router::new()
        .route("/health", get(health_check))
        .route("/details", post(post_details))
        .route("/all", get(get_all))
        .route("/base", get(get_base).post(post_base))
        .with_state(state)
        .fallback(move |uri: Uri| serve_static(uri, static_dir.clone()))
        .layer(CorsLayer::permissive())
}
