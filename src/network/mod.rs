//! # 网络模块
//!
//! - `pool` - 有界的共享 HTTP 客户端，文档获取和翻译后端各用一个
//! - `fetcher` - 浏览器风格的文档获取与字符集解码

pub mod fetcher;
pub mod pool;

// Re-export commonly used items for convenience
pub use fetcher::{decode_body, DocumentFetcher, FetchedDocument, HttpFetcher};
pub use pool::{FetchConfig, HttpPool, BROWSER_USER_AGENT};
