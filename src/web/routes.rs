//! Web 路由定义

#[cfg(feature = "web")]
use axum::{routing::get, Router};

use crate::web::{handlers::*, types::AppState};
use std::sync::Arc;

/// 创建路由
#[cfg(feature = "web")]
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/translate", get(translate_url))
}
