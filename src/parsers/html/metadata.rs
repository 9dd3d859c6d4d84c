//! HTML 文档元数据处理模块
//!
//! 此模块提供翻译输出所需的元数据处理：
//! - 注入 `<base href>`，使相对链接和资源仍然指向原始站点
//! - 读取现有的 base URL
//! - 从 meta 标签中嗅探字符编码
//!
//! base 注入通过 [`DomTree`] 完成，因此与具体的树实现无关；
//! 编码嗅探只在拿到原始字节时使用，直接操作 `markup5ever_rcdom`。

use markup5ever_rcdom::Handle;

use super::dom::{find_nodes, get_node_attr};
use super::tree::DomTree;

/// [`ensure_base_href`] 的执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseHrefOutcome {
    /// 新插入了 base 标签
    Inserted,
    /// head 中已有 base 标签，未作修改
    AlreadyPresent,
    /// 文档没有根元素，无法注入
    NoRootElement,
}

/// 确保文档的 `<head>` 中包含指向 `href` 的 `<base>` 标签
///
/// - head 不存在时，新建一个并作为根元素的第一个子节点
/// - head 中已有任何 base 标签时保持原样
/// - 否则插入 `<base href="...">` 作为 head 的第一个子节点
///
/// 重复调用是幂等的：第二次调用总是返回 [`BaseHrefOutcome::AlreadyPresent`]。
///
/// # 示例
///
/// ```ignore
/// let dom = html_to_dom(b"<html><body></body></html>", "utf-8");
/// assert_eq!(ensure_base_href(&dom, "https://example.com/"), BaseHrefOutcome::Inserted);
/// assert_eq!(ensure_base_href(&dom, "https://example.com/"), BaseHrefOutcome::AlreadyPresent);
/// ```
pub fn ensure_base_href<T: DomTree>(tree: &T, href: &str) -> BaseHrefOutcome {
    let Some(root) = tree.root_element() else {
        return BaseHrefOutcome::NoRootElement;
    };

    let head = match tree.child_element(&root, "head") {
        Some(head) => head,
        None => {
            let head = tree.create_element("head", &[]);
            tree.insert_first_child(&root, head.clone());
            head
        }
    };

    if tree.descendant_element(&head, "base").is_some() {
        return BaseHrefOutcome::AlreadyPresent;
    }

    let base = tree.create_element("base", &[("href", href)]);
    tree.insert_first_child(&head, base);
    BaseHrefOutcome::Inserted
}

/// 获取文档的 base URL
///
/// 只有 head 中第一个 base 标签有效。
pub fn get_base_url<T: DomTree>(tree: &T) -> Option<String> {
    let root = tree.root_element()?;
    let head = tree.child_element(&root, "head")?;
    let base = tree.descendant_element(&head, "base")?;
    tree.find_attr(&base, "href")
}

/// 获取文档字符编码
///
/// 支持两种声明方式：
/// 1. HTML5：`<meta charset="utf-8">`
/// 2. HTML4：`<meta http-equiv="content-type" content="text/html; charset=utf-8">`
pub fn get_charset(document: &Handle) -> Option<String> {
    for meta_node in find_nodes(document, &["html", "head", "meta"]).iter() {
        if let Some(charset) = get_node_attr(meta_node, "charset") {
            return Some(charset.trim().to_string());
        }

        let is_content_type = get_node_attr(meta_node, "http-equiv")
            .unwrap_or_default()
            .eq_ignore_ascii_case("content-type");
        if is_content_type {
            if let Some(content) = get_node_attr(meta_node, "content") {
                if let Some(charset) = charset_from_content_type(&content) {
                    return Some(charset);
                }
            }
        }
    }

    None
}

/// 从 `Content-Type` 值中提取 charset 参数
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}
