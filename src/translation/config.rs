//! 翻译配置管理模块
//!
//! 常量集中在 [`constants`] 中；运行时配置由 [`TranslationConfig`] 承载，
//! 在构造管道时一次性注入，不依赖任何全局状态。

use crate::env::EnvConfig;
use crate::translation::core::retry::RetryPolicy;
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译配置常量
pub mod constants {
    /// 单次请求的最大条目数
    pub const DEFAULT_MAX_BATCH: usize = 32;
    pub const DEFAULT_TARGET_LANG: &str = "vi";
    pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
    pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

    // 重试策略
    pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
    pub const RETRY_BASE_DELAY_SECS: u64 = 1;
    pub const RETRY_MAX_DELAY_SECS: u64 = 8;

    /// 其内部文本不翻译的元素（只检查最近的包含元素）
    pub const SKIP_ELEMENTS: &[&str] = &["script", "style", "code", "pre", "kbd", "samp", "noscript"];

    /// 可翻译属性，顺序即提取顺序
    pub const TRANSLATABLE_ATTRS: &[&str] = &["alt", "title", "aria-label"];

    // 出站 HTTP 限制
    pub const CONNECT_TIMEOUT_SECS: u64 = 15;
    pub const READ_TIMEOUT_SECS: u64 = 60;
    pub const WRITE_TIMEOUT_SECS: u64 = 30;
    pub const POOL_TIMEOUT_SECS: u64 = 30;
    pub const MAX_KEEPALIVE_CONNECTIONS: usize = 10;
    pub const MAX_CONNECTIONS: usize = 20;
    pub const MAX_REDIRECTS: usize = 10;
}

/// 翻译管道配置
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// 每批次最大条目数
    pub max_batch: usize,
    /// 请求未指定语言时使用的目标语言
    pub default_target_lang: String,
    /// 每批次的重试策略
    pub retry: RetryPolicy,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            max_batch: constants::DEFAULT_MAX_BATCH,
            default_target_lang: constants::DEFAULT_TARGET_LANG.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl TranslationConfig {
    /// 从已加载的环境配置构建
    pub fn from_env_config(env: &EnvConfig) -> Self {
        Self {
            max_batch: env.max_batch,
            default_target_lang: env.default_target_lang.clone(),
            retry: RetryPolicy {
                max_attempts: env.max_attempts,
                ..RetryPolicy::default()
            },
        }
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }

    pub fn with_default_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_target_lang = lang.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// 解析请求的目标语言，空值回退到默认语言
    pub fn resolve_lang<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested.map(str::trim) {
            Some(lang) if !lang.is_empty() => lang,
            _ => &self.default_target_lang,
        }
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.max_batch == 0 {
            return Err(TranslationError::ConfigError(
                "max_batch 必须大于 0".to_string(),
            ));
        }
        if self.default_target_lang.trim().is_empty() {
            return Err(TranslationError::ConfigError(
                "默认目标语言不能为空".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(TranslationError::ConfigError(
                "max_attempts 必须大于 0".to_string(),
            ));
        }
        if self.retry.base_delay > self.retry.max_delay {
            return Err(TranslationError::ConfigError(format!(
                "重试基础延迟 {:?} 大于最大延迟 {:?}",
                self.retry.base_delay, self.retry.max_delay
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TranslationConfig::default();
        assert_eq!(config.max_batch, 32);
        assert_eq!(config.default_target_lang, "vi");
        assert_eq!(config.retry.max_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_lang_falls_back_on_blank() {
        let config = TranslationConfig::default();
        assert_eq!(config.resolve_lang(None), "vi");
        assert_eq!(config.resolve_lang(Some("  ")), "vi");
        assert_eq!(config.resolve_lang(Some("ja")), "ja");
    }

    #[test]
    fn test_from_env_config_keeps_default_delays() {
        let env = EnvConfig {
            log_level: "info".to_string(),
            api_key: None,
            model: "m".to_string(),
            api_base: "https://example.com".to_string(),
            json_mode: true,
            max_batch: 8,
            default_target_lang: "de".to_string(),
            max_attempts: 5,
            web_bind_address: "0.0.0.0".to_string(),
            web_port: 8000,
        };

        let config = TranslationConfig::from_env_config(&env);
        assert_eq!(config.max_batch, 8);
        assert_eq!(config.default_target_lang, "de");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay, RetryPolicy::default().base_delay);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let config = TranslationConfig::default().with_max_batch(0);
        assert!(matches!(
            config.validate(),
            Err(TranslationError::ConfigError(_))
        ));
    }

    #[test]
    fn test_skip_and_attribute_sets() {
        assert!(constants::SKIP_ELEMENTS.contains(&"kbd"));
        assert!(!constants::SKIP_ELEMENTS.contains(&"p"));
        assert_eq!(constants::TRANSLATABLE_ATTRS, &["alt", "title", "aria-label"]);
    }
}
