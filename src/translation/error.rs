//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误分类。每个错误都能回答两个问题：
//! 是否值得在翻译客户端内部重试（[`TranslationError::is_retryable`]），
//! 以及属于哪一类（[`TranslationError::category`]），后者决定 HTTP 层的状态码。

use std::fmt;

use thiserror::Error;

use crate::env::EnvError;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 输入验证错误（例如非 http(s) URL）
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 获取源文档失败（网络错误、超时或非 2xx 状态）
    #[error("获取文档失败: {0}")]
    FetchError(String),

    /// 翻译后端网络错误
    #[error("网络错误: {0}")]
    NetworkError(String),

    /// 超时错误
    #[error("操作超时: {0}")]
    TimeoutError(String),

    /// 翻译后端返回错误状态
    #[error("翻译服务错误: {0}")]
    TranslationServiceError(String),

    /// 翻译后端拒绝了凭据
    #[error("翻译服务认证失败: {0}")]
    AuthenticationError(String),

    /// 后端回答无法解析为 JSON 列表
    #[error("解析错误: {0}")]
    ParseError(String),

    /// 后端回答不是列表，或长度与提交的批次不一致
    #[error("翻译结果形状不匹配: 期望 {expected} 项的列表，实际得到 {found}")]
    ShapeMismatch { expected: usize, found: String },

    /// 重试次数耗尽，携带最后一次失败
    #[error("翻译失败，已尝试 {attempts} 次: {source}")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        source: Box<TranslationError>,
    },

    /// 译文数量与待回填的单元数量不一致
    #[error("回填契约被破坏: 期望 {expected} 条译文，实际 {actual} 条")]
    ReassemblyError { expected: usize, actual: usize },

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 检查错误是否可在翻译客户端内部重试
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::NetworkError(_) => true,
            TranslationError::TimeoutError(_) => true,
            TranslationError::TranslationServiceError(_) => true,
            TranslationError::ParseError(_) => true,
            TranslationError::ShapeMismatch { .. } => true,
            TranslationError::AuthenticationError(_) => false,
            TranslationError::InvalidInput(_) => false,
            TranslationError::FetchError(_) => false,
            TranslationError::RetriesExhausted { .. } => false,
            TranslationError::ReassemblyError { .. } => false,
            TranslationError::ConfigError(_) => false,
            TranslationError::InternalError(_) => false,
        }
    }

    /// 获取错误类别，`RetriesExhausted` 归入其最后一次失败的类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::FetchError(_) => ErrorCategory::Fetch,
            TranslationError::NetworkError(_)
            | TranslationError::TimeoutError(_)
            | TranslationError::TranslationServiceError(_)
            | TranslationError::AuthenticationError(_) => ErrorCategory::Backend,
            TranslationError::ParseError(_) | TranslationError::ShapeMismatch { .. } => {
                ErrorCategory::BackendShape
            }
            TranslationError::RetriesExhausted { source, .. } => source.category(),
            TranslationError::ReassemblyError { .. } => ErrorCategory::Contract,
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// 剥离 `RetriesExhausted` 包装，返回最初的失败
    pub fn root_cause(&self) -> &TranslationError {
        match self {
            TranslationError::RetriesExhausted { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// 是否由调用方输入引起
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(self, context: T) -> Self {
        let append = |msg: String| format!("{} (上下文: {})", msg, context);

        match self {
            TranslationError::InvalidInput(msg) => TranslationError::InvalidInput(append(msg)),
            TranslationError::FetchError(msg) => TranslationError::FetchError(append(msg)),
            TranslationError::NetworkError(msg) => TranslationError::NetworkError(append(msg)),
            TranslationError::TimeoutError(msg) => TranslationError::TimeoutError(append(msg)),
            TranslationError::TranslationServiceError(msg) => {
                TranslationError::TranslationServiceError(append(msg))
            }
            TranslationError::AuthenticationError(msg) => {
                TranslationError::AuthenticationError(append(msg))
            }
            TranslationError::ParseError(msg) => TranslationError::ParseError(append(msg)),
            TranslationError::ConfigError(msg) => TranslationError::ConfigError(append(msg)),
            TranslationError::InternalError(msg) => TranslationError::InternalError(append(msg)),
            // 结构化变体不改写
            other => other,
        }
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// 调用方输入
    Input,
    /// 源文档获取
    Fetch,
    /// 翻译后端传输或状态
    Backend,
    /// 翻译后端回答的形状
    BackendShape,
    /// 管道内部契约
    Contract,
    Configuration,
    Internal,
}

impl From<EnvError> for TranslationError {
    fn from(error: EnvError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::ParseError(format!("JSON解析错误: {}", error))
    }
}

impl From<tokio::time::error::Elapsed> for TranslationError {
    fn from(error: tokio::time::error::Elapsed) -> Self {
        TranslationError::TimeoutError(format!("异步操作超时: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按类别记录并返回错误
    pub fn log_error<T>(error: TranslationError) -> TranslationResult<T> {
        match error.category() {
            ErrorCategory::Input => tracing::info!("请求被拒绝: {}", error),
            ErrorCategory::Fetch | ErrorCategory::Backend | ErrorCategory::BackendShape => {
                tracing::warn!("翻译失败: {}", error)
            }
            ErrorCategory::Contract | ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!("翻译严重错误: {}", error)
            }
        }

        Err(error)
    }
}
