//! 文本收集器模块
//!
//! 从文档树中收集可翻译单元。收集顺序是固定的：
//! 先是所有文本节点（文档顺序），然后按属性名分组的属性值
//! （`alt` 全部、`title` 全部、`aria-label` 全部，组内按文档顺序）。
//! 回填阶段依赖同样的顺序，两次收集必须得到相同的序列。

use crate::parsers::html::tree::DomTree;
use crate::translation::config::constants;

/// 译文回填的位置
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<N> {
    /// 替换文本节点内容
    Text { node: N },
    /// 覆盖元素属性值
    Attribute { element: N, name: &'static str },
}

impl<N> Slot<N> {
    /// 判断是否为属性位置
    pub fn is_attribute(&self) -> bool {
        matches!(self, Slot::Attribute { .. })
    }
}

/// 单个可翻译单元
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUnit<N> {
    pub slot: Slot<N>,
    /// 原始文本，原样发送（不做 trim）
    pub text: String,
}

/// 收集统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub text_units: usize,
    pub attribute_units: usize,
    /// 位于跳过元素内的非空文本
    pub skipped_fragments: usize,
    /// 纯空白文本
    pub blank_fragments: usize,
}

impl CollectionStats {
    pub fn total_units(&self) -> usize {
        self.text_units + self.attribute_units
    }
}

/// 文本收集器
#[derive(Debug, Clone)]
pub struct TextCollector {
    skip_elements: &'static [&'static str],
    attributes: &'static [&'static str],
    stats: CollectionStats,
}

impl Default for TextCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCollector {
    pub fn new() -> Self {
        Self {
            skip_elements: constants::SKIP_ELEMENTS,
            attributes: constants::TRANSLATABLE_ATTRS,
            stats: CollectionStats::default(),
        }
    }

    /// 收集文档中的所有可翻译单元
    ///
    /// 只读操作，不修改文档。
    pub fn collect<T: DomTree>(&mut self, tree: &T) -> Vec<TranslationUnit<T::Node>> {
        self.stats = CollectionStats::default();

        let mut units = Vec::new();
        self.collect_text_units(tree, &mut units);
        self.collect_attribute_units(tree, &mut units);

        tracing::debug!(
            "收集完成: {} 个文本单元, {} 个属性单元, 跳过 {} 个",
            self.stats.text_units,
            self.stats.attribute_units,
            self.stats.skipped_fragments
        );

        units
    }

    fn collect_text_units<T: DomTree>(&mut self, tree: &T, units: &mut Vec<TranslationUnit<T::Node>>) {
        for fragment in tree.walk_text() {
            if fragment.text.trim().is_empty() {
                self.stats.blank_fragments += 1;
                continue;
            }

            let skipped = fragment
                .parent_tag
                .as_deref()
                .is_some_and(|tag| self.skip_elements.contains(&tag));
            if skipped {
                self.stats.skipped_fragments += 1;
                continue;
            }

            self.stats.text_units += 1;
            units.push(TranslationUnit {
                slot: Slot::Text {
                    node: fragment.node,
                },
                text: fragment.text,
            });
        }
    }

    fn collect_attribute_units<T: DomTree>(
        &mut self,
        tree: &T,
        units: &mut Vec<TranslationUnit<T::Node>>,
    ) {
        let elements = tree.walk_elements();

        for &name in self.attributes {
            for element in &elements {
                let Some(value) = tree.find_attr(element, name) else {
                    continue;
                };
                if value.trim().is_empty() {
                    continue;
                }

                self.stats.attribute_units += 1;
                units.push(TranslationUnit {
                    slot: Slot::Attribute {
                        element: element.clone(),
                        name,
                    },
                    text: value,
                });
            }
        }
    }

    /// 获取上一次收集的统计信息
    pub fn stats(&self) -> CollectionStats {
        self.stats
    }
}

/// 收集可翻译单元（便利函数）
pub fn collect_translation_units<T: DomTree>(tree: &T) -> Vec<TranslationUnit<T::Node>> {
    TextCollector::new().collect(tree)
}

/// 取出单元文本，保持顺序
pub fn unit_texts<N>(units: &[TranslationUnit<N>]) -> Vec<String> {
    units.iter().map(|unit| unit.text.clone()).collect()
}
