//! 文档翻译服务
//!
//! 把获取、收集、分批、翻译、回填和 base 注入串成完整的流程。
//!
//! ## 两次解析
//!
//! `RcDom` 不是 `Send`，不能跨越 `.await` 持有。因此流程分为两段：
//!
//! 1. 解析文档，收集单元文本后立即丢弃文档树
//! 2. 逐批翻译（唯一的挂起点）
//! 3. 重新解析同一份文本，按同样的顺序重新收集单元并核对原文，
//!    然后回填译文、注入 base 标签并序列化
//!
//! 收集是确定性的，两次得到的序列逐项相同；核对失败视为内部错误。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let translator = DocumentTranslator::new(fetcher, engine, TranslationConfig::default());
//! let document = translator.translate_url("https://example.com", Some("vi")).await?;
//! println!("{}", document.html);
//! ```

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Instant;

use crate::network::fetcher::DocumentFetcher;
use crate::parsers::html::{ensure_base_href, html_to_dom, serialize_document, BaseHrefOutcome};
use crate::translation::config::TranslationConfig;
use crate::translation::core::engine::TranslationEngine;
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::translation::pipeline::{
    collect_translation_units, create_batches, reassemble, unit_texts,
};
use crate::utils::{parse_http_url, redact_url};

/// 翻译完成的文档
#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    /// 序列化后的 UTF-8 文档
    pub html: String,
    /// base 标签指向的地址（重定向之后）
    pub final_url: String,
    pub target_lang: String,
    /// 可翻译单元数量
    pub units: usize,
    /// 提交的批次数量
    pub batches: usize,
}

/// 文档翻译服务
///
/// 请求之间没有共享的可变状态，只共享获取器和引擎（及其连接池）。
pub struct DocumentTranslator {
    fetcher: Arc<dyn DocumentFetcher>,
    engine: TranslationEngine,
    config: TranslationConfig,
    stats: ServiceStats,
}

impl DocumentTranslator {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        engine: TranslationEngine,
        config: TranslationConfig,
    ) -> Self {
        Self {
            fetcher,
            engine,
            config,
            stats: ServiceStats::default(),
        }
    }

    /// 获取并翻译一个 URL 指向的文档
    ///
    /// # 参数
    ///
    /// * `raw_url` - 必须是带主机名的绝对 http(s) URL
    /// * `target_lang` - 目标语言，缺省或为空时使用配置的默认语言
    ///
    /// # 错误
    ///
    /// - URL 无效时返回 `InvalidInput`，不会发起任何请求
    /// - 获取失败返回 `FetchError`
    /// - 任一批次失败时整个请求失败，不返回部分翻译的文档
    pub async fn translate_url(
        &self,
        raw_url: &str,
        target_lang: Option<&str>,
    ) -> TranslationResult<TranslatedDocument> {
        let url = parse_http_url(raw_url)?;
        let lang = self.config.resolve_lang(target_lang).to_string();
        let start_time = Instant::now();

        tracing::info!("开始翻译 {} -> {}", redact_url(&url), lang);
        self.stats.inc_requests();

        let result = async {
            let fetched = self.fetcher.fetch(&url).await?;
            self.translate_html(&fetched.body, fetched.final_url.as_str(), Some(&lang))
                .await
        }
        .await;

        match result {
            Ok(document) => {
                self.stats.inc_succeeded();
                tracing::info!(
                    "翻译完成 {}: {} 个单元, {} 个批次, 耗时 {:?}",
                    redact_url(&url),
                    document.units,
                    document.batches,
                    start_time.elapsed()
                );
                Ok(document)
            }
            Err(err) => {
                self.stats.inc_failed();
                tracing::debug!("请求失败: {}", redact_url(&url));
                helpers::log_error(err)
            }
        }
    }

    /// 翻译已经获取到的文档文本
    ///
    /// `base_href` 写入文档的 base 标签。没有可翻译单元时不调用后端。
    pub async fn translate_html(
        &self,
        html: &str,
        base_href: &str,
        target_lang: Option<&str>,
    ) -> TranslationResult<TranslatedDocument> {
        let lang = self.config.resolve_lang(target_lang).to_string();

        let texts = {
            let dom = html_to_dom(html.as_bytes(), "utf-8");
            unit_texts(&collect_translation_units(&dom))
        };

        let batches = create_batches(&texts, self.config.max_batch);
        let mut translated = Vec::with_capacity(texts.len());

        for batch in &batches {
            tracing::debug!(
                "批次 {}/{}: 单元 {:?}",
                batch.index + 1,
                batches.len(),
                batch.range()
            );
            let output = self.engine.translate(batch.items, &lang).await?;
            translated.extend(output);
        }

        let html = rebuild_document(html, base_href, &texts, translated)?;

        Ok(TranslatedDocument {
            html,
            final_url: base_href.to_string(),
            target_lang: lang,
            units: texts.len(),
            batches: batches.len(),
        })
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn engine(&self) -> &TranslationEngine {
        &self.engine
    }

    pub fn get_stats(&self) -> &ServiceStats {
        &self.stats
    }
}

/// 重新解析文档并写回译文
fn rebuild_document(
    html: &str,
    base_href: &str,
    expected_texts: &[String],
    translated: Vec<String>,
) -> TranslationResult<String> {
    let dom = html_to_dom(html.as_bytes(), "utf-8");
    let units = collect_translation_units(&dom);

    if units.len() != expected_texts.len() {
        return Err(TranslationError::ReassemblyError {
            expected: expected_texts.len(),
            actual: units.len(),
        });
    }
    if let Some(position) = units
        .iter()
        .zip(expected_texts)
        .position(|(unit, text)| unit.text != *text)
    {
        return Err(TranslationError::InternalError(format!(
            "第二次收集的第 {} 个单元与第一次不同",
            position
        )));
    }

    let written = reassemble(&dom, &units, translated)?;
    tracing::debug!(
        "回填 {} 个文本, {} 个属性",
        written.texts_written,
        written.attributes_written
    );

    if ensure_base_href(&dom, base_href) == BaseHrefOutcome::NoRootElement {
        tracing::warn!("文档没有根元素，未注入 base 标签");
    }

    serialize_document(&dom)
        .map_err(|e| TranslationError::InternalError(format!("序列化文档失败: {}", e)))
}

/// 服务统计
#[derive(Debug, Default)]
pub struct ServiceStats {
    pub requests: AtomicUsize,
    pub succeeded: AtomicUsize,
    pub failed: AtomicUsize,
}

impl ServiceStats {
    pub fn inc_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}
