//! Web 模块的数据类型定义

use std::sync::Arc;

#[cfg(feature = "web")]
use serde::{Deserialize, Serialize};

use crate::translation::DocumentTranslator;

/// 应用状态
///
/// 所有请求共享同一个翻译服务（及其连接池）。
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<DocumentTranslator>,
}

impl AppState {
    pub fn new(translator: DocumentTranslator) -> Self {
        Self {
            translator: Arc::new(translator),
        }
    }
}

/// 翻译查询参数
#[cfg(feature = "web")]
#[derive(Debug, Deserialize)]
pub struct TranslateQuery {
    pub url: String,
    pub lang: Option<String>,
}

/// 服务信息响应
#[cfg(feature = "web")]
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub usage: UsageInfo,
}

/// 用法说明
#[cfg(feature = "web")]
#[derive(Debug, Serialize)]
pub struct UsageInfo {
    pub endpoint: &'static str,
    pub example: &'static str,
}

/// 健康检查响应
#[cfg(feature = "web")]
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// 错误响应
#[cfg(feature = "web")]
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub url: String,
}
