//! 翻译批次划分
//!
//! 把有序的单元序列切成连续的小段，每段不超过 `max_batch` 项。
//! 不重排、不去重、不丢弃，最后一批可以更短。

/// 翻译批次，借用原序列的一段连续切片
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch<'a, T> {
    /// 批次序号，从 0 开始
    pub index: usize,
    /// 首项在原序列中的位置
    pub offset: usize,
    pub items: &'a [T],
}

impl<'a, T> Batch<'a, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 原序列中的位置范围
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.items.len()
    }
}

/// 创建批次
///
/// `max_batch` 为 0 时按 1 处理。空输入得到空列表。
pub fn create_batches<T>(items: &[T], max_batch: usize) -> Vec<Batch<'_, T>> {
    let size = max_batch.max(1);

    items
        .chunks(size)
        .enumerate()
        .map(|(index, chunk)| Batch {
            index,
            offset: index * size,
            items: chunk,
        })
        .collect()
}

/// 计算批次数量
pub fn batch_count(len: usize, max_batch: usize) -> usize {
    len.div_ceil(max_batch.max(1))
}
