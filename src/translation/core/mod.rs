//! 翻译系统核心模块
//!
//! ## 架构设计
//!
//! - **服务层** (`service.rs`): 端到端的文档翻译流程
//! - **引擎层** (`engine.rs`): 单个批次的翻译、形状校验和重试
//! - `prompt.rs`: 指令构建与回答解析
//! - `retry.rs`: 指数退避重试策略
//!
//! ## 模块依赖关系
//!
//! ```text
//! DocumentTranslator (service.rs)
//!     ├── DocumentFetcher (network/fetcher.rs)
//!     ├── TextCollector (pipeline/collector.rs)
//!     ├── create_batches (pipeline/batch.rs)
//!     ├── TranslationEngine (engine.rs)
//!     │       ├── RetryPolicy (retry.rs)
//!     │       └── TranslationBackend (backend/)
//!     └── reassemble (pipeline/reassembler.rs)
//! ```

pub mod engine;
pub mod prompt;
pub mod retry;
pub mod service;

pub use engine::{EngineStats, EngineStatsSnapshot, TranslationEngine};
pub use prompt::{build_prompt, parse_translations, strip_code_fences};
pub use retry::RetryPolicy;
pub use service::{DocumentTranslator, ServiceStats, TranslatedDocument};
