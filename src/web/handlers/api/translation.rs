//! 翻译 API 处理器

use std::sync::Arc;

#[cfg(feature = "web")]
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::translation::{ErrorCategory, TranslationError};
use crate::web::types::AppState;
#[cfg(feature = "web")]
use crate::web::types::{ErrorResponse, TranslateQuery};

/// 翻译 URL 指向的文档
///
/// 成功时返回 `text/plain; charset=utf-8` 的完整译文文档。
#[cfg(feature = "web")]
pub async fn translate_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TranslateQuery>,
) -> Response {
    tracing::info!("收到翻译请求: lang={:?}", query.lang);

    match state
        .translator
        .translate_url(&query.url, query.lang.as_deref())
        .await
    {
        Ok(document) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            document.html,
        )
            .into_response(),
        Err(err) => {
            let status = status_for(&err);
            (
                status,
                Json(ErrorResponse {
                    error: err.to_string(),
                    url: query.url,
                }),
            )
                .into_response()
        }
    }
}

/// 错误类别到 HTTP 状态码
#[cfg(feature = "web")]
pub fn status_for(error: &TranslationError) -> StatusCode {
    match error.category() {
        ErrorCategory::Input => StatusCode::BAD_REQUEST,
        ErrorCategory::Fetch | ErrorCategory::Backend | ErrorCategory::BackendShape => {
            StatusCode::BAD_GATEWAY
        }
        ErrorCategory::Contract | ErrorCategory::Configuration | ErrorCategory::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
