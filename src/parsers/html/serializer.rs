use std::io;
use std::rc::Rc;

use html5ever::serialize::{serialize, SerializeOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// 序列化文档
///
/// 输出总是 UTF-8 文本，与原文档声明的编码无关。
/// `<template>` 的内容会先移回元素的子节点，否则序列化器会将其丢弃。
pub fn serialize_document(dom: &RcDom) -> io::Result<String> {
    let mut buf: Vec<u8> = Vec::new();

    inline_template_contents(&dom.document);

    let serializable: SerializableHandle = dom.document.clone().into();
    serialize(&mut buf, &serializable, SerializeOpts::default())?;

    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn inline_template_contents(node: &Handle) {
    for child in node.children.borrow().iter() {
        inline_template_contents(child);
    }

    if let NodeData::Element {
        ref template_contents,
        ..
    } = node.data
    {
        if let Some(content) = template_contents.borrow().as_ref() {
            inline_template_contents(content);
            let moved: Vec<Handle> = content.children.borrow_mut().drain(..).collect();
            for child in &moved {
                child.parent.set(Some(Rc::downgrade(node)));
            }
            node.children.borrow_mut().extend(moved);
        }
    }
}
