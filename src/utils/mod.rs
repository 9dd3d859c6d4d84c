//! # 工具模块
//!
//! - `url` - 入站 URL 校验、日志用的 URL 脱敏

pub mod url;

// Re-export commonly used items for convenience
pub use self::url::{is_http_url, parse_http_url, redact_url, Url};
