//! 翻译引擎核心实现
//!
//! 引擎负责一个批次的完整翻译：构建指令、调用后端、校验回答形状，
//! 失败时按 [`RetryPolicy`] 重试。批次之间的顺序由调用方保证。
//!
//! ## 工作流程
//! 1. 把批次文本序列化进指令
//! 2. 调用后端获取回答
//! 3. 去掉代码围栏并解析为等长列表
//! 4. 形状不符或后端失败时退避重试

use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};
use std::time::Instant;

use crate::translation::backend::TranslationBackend;
use crate::translation::core::prompt::{build_prompt, parse_translations};
use crate::translation::core::retry::RetryPolicy;
use crate::translation::error::TranslationResult;

/// 翻译引擎
///
/// 可在多个请求之间共享：后端通过 `Arc` 持有，统计信息使用原子计数。
pub struct TranslationEngine {
    backend: Arc<dyn TranslationBackend>,
    retry: RetryPolicy,
    stats: EngineStats,
}

impl TranslationEngine {
    /// 创建新的翻译引擎
    ///
    /// # 参数
    /// - `backend`: 翻译后端
    /// - `retry`: 每个批次的重试策略
    pub fn new(backend: Arc<dyn TranslationBackend>, retry: RetryPolicy) -> Self {
        Self {
            backend,
            retry,
            stats: EngineStats::default(),
        }
    }

    /// 翻译一个批次
    ///
    /// 返回与 `texts` 等长、顺序一一对应的译文。空输入不会调用后端。
    ///
    /// # 错误
    /// - 不可重试的后端错误（如认证失败）立即返回
    /// - 其他失败在重试耗尽后以 `RetriesExhausted` 返回
    pub async fn translate(&self, texts: &[String], target_lang: &str) -> TranslationResult<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let start_time = Instant::now();
        let prompt = build_prompt(texts, target_lang)?;
        let expected = texts.len();

        tracing::debug!(
            "发送批次到 {}: {} 项, {} 字符",
            self.backend.name(),
            expected,
            prompt.len()
        );

        let backend = self.backend.as_ref();
        let stats = &self.stats;
        let prompt = prompt.as_str();

        let result = self
            .retry
            .run("翻译批次", move |_attempt| async move {
                stats.inc_backend_calls();
                let raw = backend.generate(prompt).await;
                let parsed = raw.and_then(|raw| parse_translations(&raw, expected));
                if parsed.is_err() {
                    stats.inc_failed_attempts();
                }
                parsed
            })
            .await;

        self.stats.add_processing_time(start_time.elapsed());

        match result {
            Ok(translations) => {
                self.stats.inc_batches_translated();
                self.stats.add_strings_translated(translations.len());
                Ok(translations)
            }
            Err(err) => {
                self.stats.inc_batches_failed();
                Err(err)
            }
        }
    }

    /// 后端名称
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// 获取统计信息
    pub fn get_stats(&self) -> &EngineStats {
        &self.stats
    }
}

/// 引擎统计
///
/// 使用 Relaxed 内存顺序，计数器之间没有先后约束。
#[derive(Debug, Default)]
pub struct EngineStats {
    /// 成功翻译的批次数
    pub batches_translated: AtomicUsize,
    /// 最终失败的批次数
    pub batches_failed: AtomicUsize,
    /// 后端调用次数（包含重试）
    pub backend_calls: AtomicUsize,
    /// 失败的尝试次数
    pub failed_attempts: AtomicUsize,
    pub strings_translated: AtomicUsize,
    /// 总处理时间（微秒）
    pub total_processing_time: AtomicU64,
}

impl EngineStats {
    pub fn inc_batches_translated(&self) {
        self.batches_translated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_batches_failed(&self) {
        self.batches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_backend_calls(&self) {
        self.backend_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed_attempts(&self) {
        self.failed_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_strings_translated(&self, count: usize) {
        self.strings_translated.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_processing_time(&self, duration: std::time::Duration) {
        self.total_processing_time
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    /// 当前计数的快照
    pub fn snapshot(&self) -> EngineStatsSnapshot {
        EngineStatsSnapshot {
            batches_translated: self.batches_translated.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
            backend_calls: self.backend_calls.load(Ordering::Relaxed),
            failed_attempts: self.failed_attempts.load(Ordering::Relaxed),
            strings_translated: self.strings_translated.load(Ordering::Relaxed),
        }
    }
}

/// [`EngineStats`] 的快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStatsSnapshot {
    pub batches_translated: usize,
    pub batches_failed: usize,
    pub backend_calls: usize,
    pub failed_attempts: usize,
    pub strings_translated: usize,
}
