//! DOM 能力接口
//!
//! 翻译管道只通过 [`DomTree`] 访问文档树：按文档顺序遍历文本与元素、
//! 读写属性、替换文本、插入首个子节点。任何满足该接口的树实现都可以
//! 替换默认的 `markup5ever_rcdom` 实现。

use std::fmt;
use std::rc::Rc;

use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::dom::{
    create_html_element, find_descendant_by_name, get_child_node_by_name, get_node_attr,
    get_node_name, prepend_child, set_node_attr, set_text_content,
};

/// 遍历得到的文本片段
#[derive(Debug, Clone)]
pub struct TextFragment<N> {
    /// 文本节点
    pub node: N,
    /// 最近的包含元素的标签名（小写）
    pub parent_tag: Option<String>,
    /// 节点当前文本
    pub text: String,
}

/// 文档树能力接口
///
/// 所有方法都接受 `&self`：节点句柄本身携带内部可变性，写操作不会
/// 改变树的形状（`insert_first_child` 除外）。
pub trait DomTree {
    /// 节点引用，比较时按节点身份而非内容
    type Node: Clone + PartialEq + fmt::Debug;

    /// 根元素（`<html>`），解析后不存在时返回 `None`
    fn root_element(&self) -> Option<Self::Node>;

    /// 按文档顺序返回所有文本节点
    fn walk_text(&self) -> Vec<TextFragment<Self::Node>>;

    /// 按文档顺序返回所有元素
    fn walk_elements(&self) -> Vec<Self::Node>;

    /// 替换文本节点内容，保持其在兄弟节点中的位置
    fn set_text(&self, node: &Self::Node, value: &str);

    fn find_attr(&self, element: &Self::Node, name: &str) -> Option<String>;

    /// 覆盖（或新增）属性值，不影响其他属性和子节点
    fn set_attr(&self, element: &Self::Node, name: &str, value: &str);

    /// 第一个匹配标签名的直接子元素
    fn child_element(&self, parent: &Self::Node, tag_name: &str) -> Option<Self::Node>;

    /// 第一个匹配标签名的后代元素
    fn descendant_element(&self, parent: &Self::Node, tag_name: &str) -> Option<Self::Node>;

    /// 创建一个尚未挂载的元素
    fn create_element(&self, tag_name: &str, attrs: &[(&str, &str)]) -> Self::Node;

    fn insert_first_child(&self, parent: &Self::Node, child: Self::Node);
}

/// `markup5ever_rcdom` 节点引用，按指针身份比较
#[derive(Clone)]
pub struct NodeRef(pub Handle);

impl NodeRef {
    pub fn handle(&self) -> &Handle {
        &self.0
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            NodeData::Element { name, .. } => write!(f, "NodeRef(<{}>)", name.local),
            NodeData::Text { contents } => write!(f, "NodeRef({:?})", &**contents.borrow()),
            NodeData::Document => write!(f, "NodeRef(#document)"),
            _ => write!(f, "NodeRef(..)"),
        }
    }
}

impl DomTree for RcDom {
    type Node = NodeRef;

    fn root_element(&self) -> Option<NodeRef> {
        get_child_node_by_name(&self.document, "html").map(NodeRef)
    }

    fn walk_text(&self) -> Vec<TextFragment<NodeRef>> {
        let mut fragments = Vec::new();
        collect_text(&self.document, None, &mut fragments);
        fragments
    }

    fn walk_elements(&self) -> Vec<NodeRef> {
        let mut elements = Vec::new();
        collect_elements(&self.document, &mut elements);
        elements
    }

    fn set_text(&self, node: &NodeRef, value: &str) {
        set_text_content(&node.0, value);
    }

    fn find_attr(&self, element: &NodeRef, name: &str) -> Option<String> {
        get_node_attr(&element.0, name)
    }

    fn set_attr(&self, element: &NodeRef, name: &str, value: &str) {
        set_node_attr(&element.0, name, Some(value.to_string()));
    }

    fn child_element(&self, parent: &NodeRef, tag_name: &str) -> Option<NodeRef> {
        get_child_node_by_name(&parent.0, tag_name).map(NodeRef)
    }

    fn descendant_element(&self, parent: &NodeRef, tag_name: &str) -> Option<NodeRef> {
        find_descendant_by_name(&parent.0, tag_name).map(NodeRef)
    }

    fn create_element(&self, tag_name: &str, attrs: &[(&str, &str)]) -> NodeRef {
        NodeRef(create_html_element(self, tag_name, attrs))
    }

    fn insert_first_child(&self, parent: &NodeRef, child: NodeRef) {
        prepend_child(&parent.0, child.0);
    }
}

fn collect_text(node: &Handle, parent_tag: Option<&str>, out: &mut Vec<TextFragment<NodeRef>>) {
    match &node.data {
        NodeData::Text { contents } => out.push(TextFragment {
            node: NodeRef(node.clone()),
            parent_tag: parent_tag.map(str::to_ascii_lowercase),
            text: contents.borrow().to_string(),
        }),
        NodeData::Element {
            template_contents, ..
        } => {
            let tag = get_node_name(node);
            for child in node.children.borrow().iter() {
                collect_text(child, tag, out);
            }
            // <template> 的内容挂在单独的片段上，不在 children 中
            if let Some(content) = template_contents.borrow().as_ref() {
                collect_text(content, tag, out);
            }
        }
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, parent_tag, out);
            }
        }
    }
}

fn collect_elements(node: &Handle, out: &mut Vec<NodeRef>) {
    if let NodeData::Element { .. } = node.data {
        out.push(NodeRef(node.clone()));
    }
    for child in node.children.borrow().iter() {
        collect_elements(child, out);
    }
    if let NodeData::Element {
        ref template_contents,
        ..
    } = node.data
    {
        if let Some(content) = template_contents.borrow().as_ref() {
            collect_elements(content, out);
        }
    }
}
