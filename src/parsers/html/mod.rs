//! HTML解析和处理模块
//!
//! - `dom`: 基础DOM操作（解析、属性读写、节点查找）
//! - `tree`: 翻译管道使用的 DOM 能力接口及其 `RcDom` 实现
//! - `metadata`: base 标签注入与字符编码嗅探
//! - `serializer`: 序列化功能

pub mod dom;
pub mod metadata;
pub mod serializer;
pub mod tree;

pub use dom::{
    create_html_element, find_descendant_by_name, find_nodes, get_child_node_by_name,
    get_node_attr, get_node_name, html_to_dom, prepend_child, set_node_attr,
    set_text_content,
};
pub use metadata::{
    charset_from_content_type, ensure_base_href, get_base_url, get_charset, BaseHrefOutcome,
};
pub use serializer::serialize_document;
pub use tree::{DomTree, NodeRef, TextFragment};
