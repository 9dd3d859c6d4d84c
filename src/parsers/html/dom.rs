use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, StrTendril, TendrilSink};
use html5ever::tree_builder::create_element;
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// 将 HTML 字节转换为 DOM
///
/// 无法识别的编码标签按 UTF-8（有损）处理。
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> RcDom {
    let s: String = match Encoding::for_label(document_encoding.as_bytes()) {
        Some(encoding) => {
            let (string, _, _) = encoding.decode(data);
            string.into_owned()
        }
        None => String::from_utf8_lossy(data).into_owned(),
    };

    parse_document(RcDom::default(), Default::default()).one(s)
}

/// 查找指定路径的DOM节点
pub fn find_nodes(node: &Handle, node_names: &[&str]) -> Vec<Handle> {
    let mut found_nodes = Vec::new();
    let Some((node_name, rest)) = node_names.split_first() else {
        return found_nodes;
    };

    let matches = get_node_name(node) == Some(*node_name);

    if matches && rest.is_empty() {
        found_nodes.push(node.clone());
    }

    let child_names = if matches && !rest.is_empty() {
        rest
    } else {
        node_names
    };
    for child_node in node.children.borrow().iter() {
        found_nodes.append(&mut find_nodes(child_node, child_names));
    }

    found_nodes
}

/// 根据名称获取子节点
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    children
        .iter()
        .find(|child| get_node_name(child) == Some(node_name))
        .cloned()
}

/// 按文档顺序查找第一个匹配名称的后代元素（不包括自身）
pub fn find_descendant_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    for child in parent.children.borrow().iter() {
        if get_node_name(child) == Some(node_name) {
            return Some(child.clone());
        }
        if let Some(found) = find_descendant_by_name(child, node_name) {
            return Some(found);
        }
    }
    None
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 设置节点属性
///
/// `attr_value` 为 `None` 时删除该属性；属性不存在时追加到末尾，
/// 其余属性的顺序和值保持不变。
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();
        let existing = attrs_mut
            .iter()
            .position(|attr| &*attr.name.local == attr_name);

        match (existing, attr_value) {
            (Some(i), Some(value)) => {
                attrs_mut[i].value.clear();
                attrs_mut[i].value.push_slice(value.as_str());
            }
            (Some(i), None) => {
                attrs_mut.remove(i);
            }
            (None, Some(value)) => {
                attrs_mut.push(Attribute {
                    name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                    value: format_tendril!("{}", value),
                });
            }
            (None, None) => {}
        }
    }
}

/// 替换文本节点的内容，非文本节点忽略
pub fn set_text_content(node: &Handle, value: &str) {
    if let NodeData::Text { contents } = &node.data {
        *contents.borrow_mut() = StrTendril::from(value);
    }
}

/// 创建一个游离的 HTML 元素
pub fn create_html_element(dom: &RcDom, tag_name: &str, attrs: &[(&str, &str)]) -> Handle {
    let attrs = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(*name)),
            value: format_tendril!("{}", value),
        })
        .collect();

    create_element(
        dom,
        QualName::new(None, ns!(html), LocalName::from(tag_name)),
        attrs,
    )
}

/// 将 `child` 插入为 `parent` 的第一个子节点，并更新父引用
pub fn prepend_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().insert(0, child);
}
