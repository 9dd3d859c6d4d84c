//! # 解析器模块
//!
//! 包含 HTML 解析、DOM 操作和序列化功能。
//!
//! # 模块组织
//!
//! - `html` - HTML文档解析、DOM操作、元数据处理

pub mod html;

// Re-export commonly used items for convenience
pub use html::{
    ensure_base_href, get_base_url, get_charset, html_to_dom, serialize_document, DomTree,
    NodeRef,
};
