//! 翻译模块
//!
//! 采用清晰的模块化架构：
//! - **core**: 文档翻译服务、批次引擎、重试策略
//! - **pipeline**: 单元收集、分批、回填
//! - **backend**: 翻译后端接口及 Gemini 实现
//! - **config**: 配置与常量
//! - **error**: 错误处理

pub mod backend;
pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;

pub use backend::{GeminiBackend, GeminiConfig, TranslationBackend};
pub use config::{constants, TranslationConfig};
pub use self::core::{
    DocumentTranslator, EngineStats, RetryPolicy, ServiceStats, TranslatedDocument,
    TranslationEngine,
};
pub use error::{ErrorCategory, TranslationError, TranslationResult};
pub use pipeline::{Batch, Slot, TextCollector, TranslationUnit};
