pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod ports;
pub mod services;
pub mod validation;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::services::{ReversalService, VoidPreview};

#[derive(Clone)]
pub struct AppState {
    pub reversals: Arc<ReversalService>,
    pub void_preview: Arc<VoidPreview>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/reversals", post(handlers::reversals::reverse_transaction))
        .route(
            "/void-entries",
            post(handlers::reversals::prepare_void_entries),
        )
        .with_state(state)
}
