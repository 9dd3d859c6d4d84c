//! 服务信息与健康检查

#[cfg(feature = "web")]
use axum::response::Json;

#[cfg(feature = "web")]
use crate::web::types::{HealthResponse, ServiceInfo, UsageInfo};

/// 服务信息
#[cfg(feature = "web")]
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "HTML Translator",
        status: "running",
        usage: UsageInfo {
            endpoint: "/translate",
            example: "/translate?url=https://example.com&lang=vi",
        },
    })
}

#[cfg(feature = "web")]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
