//! # HTML Translator
//!
//! 把一个网页整体翻译成目标语言，同时保持文档结构不变。
//!
//! 流程：获取文档，按文档顺序收集可翻译的文本节点和属性值，分批交给
//! 翻译后端，严格按位置回填译文，注入指向原地址的 base 标签后序列化输出。
//!
//! ## 模块组织
//!
//! - `env` - 环境变量配置
//! - `network` - 出站连接池与文档获取
//! - `parsers` - HTML 解析、遍历与序列化
//! - `translation` - 收集、分批、翻译引擎、后端与错误
//! - `utils` - URL 校验等工具函数
//! - `web` - Web 服务器功能（可选）

pub mod env;
pub mod network;
pub mod parsers;
pub mod translation;
pub mod utils;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used items for convenience
pub use network::{DocumentFetcher, FetchedDocument, HttpFetcher, HttpPool};
pub use translation::{
    DocumentTranslator, TranslatedDocument, TranslationBackend, TranslationConfig,
    TranslationEngine, TranslationError, TranslationResult,
};
