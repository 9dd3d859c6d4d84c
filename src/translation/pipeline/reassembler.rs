//! 译文回填
//!
//! 按收集顺序把第 i 条译文写回第 i 个单元的位置，每个单元恰好写一次。
//! 数量不一致说明上游契约被破坏，在写入任何内容之前报错。

use crate::parsers::html::tree::DomTree;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::pipeline::collector::{Slot, TranslationUnit};

/// 回填统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReassemblyStats {
    pub texts_written: usize,
    pub attributes_written: usize,
}

/// 将译文写回文档
pub fn reassemble<T: DomTree>(
    tree: &T,
    units: &[TranslationUnit<T::Node>],
    translations: Vec<String>,
) -> TranslationResult<ReassemblyStats> {
    if units.len() != translations.len() {
        return Err(TranslationError::ReassemblyError {
            expected: units.len(),
            actual: translations.len(),
        });
    }

    let mut stats = ReassemblyStats::default();

    for (unit, translated) in units.iter().zip(translations) {
        match &unit.slot {
            Slot::Text { node } => {
                tree.set_text(node, &translated);
                stats.texts_written += 1;
            }
            Slot::Attribute { element, name } => {
                tree.set_attr(element, name, &translated);
                stats.attributes_written += 1;
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::dom::html_to_dom;
    use crate::parsers::html::serializer::serialize_document;
    use crate::translation::pipeline::collector::collect_translation_units;

    #[test]
    fn test_writes_each_slot_in_order() {
        let dom = html_to_dom(
            r#"<html><head></head><body><p>Hello</p><img alt="Dog" src="d.png"></body></html>"#
                .as_bytes(),
            "utf-8",
        );
        let units = collect_translation_units(&dom);

        let stats = reassemble(
            &dom,
            &units,
            vec!["Xin chào".to_string(), "Con chó".to_string()],
        )
        .unwrap();

        assert_eq!(
            stats,
            ReassemblyStats {
                texts_written: 1,
                attributes_written: 1
            }
        );
        let html = serialize_document(&dom).unwrap();
        assert!(html.contains("<p>Xin chào</p>"));
        assert!(html.contains(r#"<img alt="Con chó" src="d.png">"#));
    }

    #[test]
    fn test_length_mismatch_writes_nothing() {
        let dom = html_to_dom(b"<p>a</p><p>b</p>", "utf-8");
        let before = serialize_document(&dom).unwrap();
        let units = collect_translation_units(&dom);

        let err = reassemble(&dom, &units, vec!["x".to_string()]).unwrap_err();

        assert!(matches!(
            err,
            TranslationError::ReassemblyError {
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(serialize_document(&dom).unwrap(), before);
    }

    #[test]
    fn test_whitespace_nodes_stay_untouched() {
        let dom = html_to_dom(b"<div>\n  <p>one</p>\n  <p>two</p>\n</div>", "utf-8");
        let units = collect_translation_units(&dom);

        reassemble(&dom, &units, vec!["1".to_string(), "2".to_string()]).unwrap();

        let html = serialize_document(&dom).unwrap();
        assert!(html.contains("<div>\n  <p>1</p>\n  <p>2</p>\n</div>"));
    }
}
