//! Web 服务器模块
//!
//! 以 HTTP 接口提供整页翻译服务

pub mod config;
pub mod handlers;
pub mod routes;
pub mod types;

pub use config::*;
pub use handlers::*;
pub use routes::*;
pub use types::*;

use std::sync::Arc;

#[cfg(feature = "web")]
use axum::Router;
#[cfg(feature = "web")]
use tower_http::cors::CorsLayer;

/// Web 服务器
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: WebConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// 启动 Web 服务器
    #[cfg(feature = "web")]
    pub async fn start(&self) -> std::io::Result<()> {
        let app = create_router(self.state.clone());

        let listener = tokio::net::TcpListener::bind(self.config.listen_address()).await?;

        println!(
            "Web server starting at http://{}",
            self.config.listen_address()
        );
        tracing::info!("监听 {}", self.config.listen_address());

        axum::serve(listener, app).await
    }
}

/// 创建路由器
#[cfg(feature = "web")]
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_routes()
        .with_state(app_state)
        .layer(CorsLayer::permissive())
}
