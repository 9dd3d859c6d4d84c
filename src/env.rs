//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量管理。每个变量是一个零大小类型，
//! 通过 [`EnvVar`] 声明名称、默认值、说明和解析规则。

use std::env;
use std::fmt;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "HTML_TRANSLATOR_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }
}

/// 翻译后端（Gemini）相关环境变量
pub mod backend {
    use super::*;

    /// API密钥
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "GEMINI_API_KEY";
        const DEFAULT: Option<String> = None; // 无默认值，必须设置
        const DESCRIPTION: &'static str = "Credential for the translation backend (required)";

        fn parse(value: &str) -> EnvResult<String> {
            let key = value.trim();
            if key.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API key cannot be empty".to_string(),
                });
            }
            Ok(key.to_string())
        }
    }

    /// 模型名称
    pub struct Model;
    impl EnvVar<String> for Model {
        const NAME: &'static str = "GEMINI_MODEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(crate::translation::config::constants::DEFAULT_MODEL.to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Backend model identifier";

        fn parse(value: &str) -> EnvResult<String> {
            let model = value.trim();
            if model.is_empty() || model.contains('/') {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid model name '{}'", value),
                });
            }
            Ok(model.to_string())
        }
    }

    /// API 基础地址
    pub struct ApiBase;
    impl EnvVar<String> for ApiBase {
        const NAME: &'static str = "GEMINI_API_BASE";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(crate::translation::config::constants::DEFAULT_API_BASE.to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Base URL of the generateContent API";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim().trim_end_matches('/');
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "URL must start with http:// or https://".to_string(),
                });
            }
            Ok(url.to_string())
        }
    }

    /// 是否请求 JSON 格式的回答
    pub struct JsonMode;
    impl EnvVar<bool> for JsonMode {
        const NAME: &'static str = "GEMINI_JSON_MODE";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str =
            "Ask the backend for a schema-constrained JSON answer (disabled automatically if rejected)";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 单批次最大条目数
    pub struct MaxBatch;
    impl EnvVar<usize> for MaxBatch {
        const NAME: &'static str = "MAX_BATCH";
        const DEFAULT: Option<usize> = Some(crate::translation::config::constants::DEFAULT_MAX_BATCH);
        const DESCRIPTION: &'static str = "Maximum number of strings per translation request";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 512)
        }
    }

    /// 默认目标语言
    pub struct DefaultLang;
    impl EnvVar<String> for DefaultLang {
        const NAME: &'static str = "DEFAULT_TARGET_LANG";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(crate::translation::config::constants::DEFAULT_TARGET_LANG.to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Target language used when a request does not name one";

        fn parse(value: &str) -> EnvResult<String> {
            let lang = value.trim();
            if lang.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Language code cannot be empty".to_string(),
                });
            }
            Ok(lang.to_string())
        }
    }

    /// 每批次最大尝试次数
    pub struct MaxAttempts;
    impl EnvVar<usize> for MaxAttempts {
        const NAME: &'static str = "TRANSLATION_MAX_ATTEMPTS";
        const DEFAULT: Option<usize> =
            Some(crate::translation::config::constants::DEFAULT_MAX_ATTEMPTS);
        const DESCRIPTION: &'static str = "Attempts per batch before the request fails";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 10)
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "HOST";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("0.0.0.0".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "PORT";
        const DEFAULT: Option<u16> = Some(8000);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }

            Ok(port)
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 环境变量配置汇总
#[derive(Clone)]
pub struct EnvConfig {
    // 核心配置
    pub log_level: String,

    // 后端配置
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub json_mode: bool,

    // 翻译配置
    pub max_batch: usize,
    pub default_target_lang: String,
    pub max_attempts: usize,

    // Web配置
    pub web_bind_address: String,
    pub web_port: u16,
}

impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("log_level", &self.log_level)
            .field("api_key", &self.api_key.as_ref().map(|_| "[configured]"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("json_mode", &self.json_mode)
            .field("max_batch", &self.max_batch)
            .field("default_target_lang", &self.default_target_lang)
            .field("max_attempts", &self.max_attempts)
            .field("web_bind_address", &self.web_bind_address)
            .field("web_port", &self.web_port)
            .finish()
    }
}

impl EnvConfig {
    /// 从环境变量加载配置
    ///
    /// 缺少 API 密钥不会在这里报错，由 [`EnvConfig::require_api_key`] 决定。
    /// 已设置但非法的值总是报错。
    pub fn from_env() -> EnvResult<Self> {
        let api_key = match env::var(backend::ApiKey::NAME) {
            Ok(value) => Some(backend::ApiKey::parse(&value)?),
            Err(_) => None,
        };

        Ok(Self {
            log_level: core::LogLevel::get()?,

            api_key,
            model: backend::Model::get()?,
            api_base: backend::ApiBase::get()?,
            json_mode: backend::JsonMode::get()?,

            max_batch: translation::MaxBatch::get()?,
            default_target_lang: translation::DefaultLang::get()?,
            max_attempts: translation::MaxAttempts::get()?,

            web_bind_address: web::BindAddress::get()?,
            web_port: web::Port::get()?,
        })
    }

    /// 获取必需的 API 密钥
    pub fn require_api_key(&self) -> EnvResult<&str> {
        self.api_key.as_deref().ok_or_else(|| EnvError {
            variable: backend::ApiKey::NAME.to_string(),
            message: "Required environment variable not set".to_string(),
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        self.require_api_key().map(|_| ())
    }

    /// 打印配置摘要（隐藏敏感信息）
    pub fn print_summary(&self) {
        println!("Environment Configuration Summary:");
        println!("  Log Level: {}", self.log_level);
        println!("  Backend: {} ({})", self.model, self.api_base);
        println!("  JSON Mode: {}", if self.json_mode { "enabled" } else { "disabled" });
        println!(
            "  Batching: {} per request, {} attempts",
            self.max_batch, self.max_attempts
        );
        println!("  Default Language: {}", self.default_target_lang);
        println!("  Web Server: {}:{}", self.web_bind_address, self.web_port);
        if self.api_key.is_some() {
            println!("  API Key: [configured]");
        } else {
            println!("  API Key: [missing]");
        }
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    fn line<T: fmt::Debug>(name: &str, description: &str, default: Option<T>) -> String {
        format!("- `{}`: {} (default: {:?})\n", name, description, default)
    }

    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&line(
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION,
        Some("info"),
    ));

    docs.push_str("\n## Backend Configuration\n\n");
    docs.push_str(&line(
        backend::ApiKey::NAME,
        backend::ApiKey::DESCRIPTION,
        backend::ApiKey::DEFAULT,
    ));
    docs.push_str(&line(
        backend::Model::NAME,
        backend::Model::DESCRIPTION,
        Some(crate::translation::config::constants::DEFAULT_MODEL),
    ));
    docs.push_str(&line(
        backend::ApiBase::NAME,
        backend::ApiBase::DESCRIPTION,
        Some(crate::translation::config::constants::DEFAULT_API_BASE),
    ));
    docs.push_str(&line(
        backend::JsonMode::NAME,
        backend::JsonMode::DESCRIPTION,
        backend::JsonMode::DEFAULT,
    ));

    docs.push_str("\n## Translation Configuration\n\n");
    docs.push_str(&line(
        translation::MaxBatch::NAME,
        translation::MaxBatch::DESCRIPTION,
        translation::MaxBatch::DEFAULT,
    ));
    docs.push_str(&line(
        translation::DefaultLang::NAME,
        translation::DefaultLang::DESCRIPTION,
        Some(crate::translation::config::constants::DEFAULT_TARGET_LANG),
    ));
    docs.push_str(&line(
        translation::MaxAttempts::NAME,
        translation::MaxAttempts::DESCRIPTION,
        translation::MaxAttempts::DEFAULT,
    ));

    docs.push_str("\n## Web Server Configuration\n\n");
    docs.push_str(&line(
        web::BindAddress::NAME,
        web::BindAddress::DESCRIPTION,
        Some("0.0.0.0"),
    ));
    docs.push_str(&line(web::Port::NAME, web::Port::DESCRIPTION, web::Port::DEFAULT));

    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(core::LogLevel::parse("DEBUG").unwrap(), "debug");
        assert!(core::LogLevel::parse("verbose").is_err());
    }

    #[test]
    fn test_boolean_parsing() {
        assert!(backend::JsonMode::parse("true").unwrap());
        assert!(backend::JsonMode::parse("1").unwrap());
        assert!(backend::JsonMode::parse("YES").unwrap());

        assert!(!backend::JsonMode::parse("false").unwrap());
        assert!(!backend::JsonMode::parse("off").unwrap());

        assert!(backend::JsonMode::parse("maybe").is_err());
    }

    #[test]
    fn test_api_key_rejects_blank() {
        assert!(backend::ApiKey::parse("   ").is_err());
        assert_eq!(backend::ApiKey::parse(" abc ").unwrap(), "abc");
    }

    #[test]
    fn test_url_validation() {
        assert_eq!(
            backend::ApiBase::parse("https://example.com/v1beta/").unwrap(),
            "https://example.com/v1beta"
        );
        assert!(backend::ApiBase::parse("ftp://example.com").is_err());
    }

    #[test]
    fn test_numeric_validation() {
        assert_eq!(translation::MaxBatch::parse("32").unwrap(), 32);
        assert!(translation::MaxBatch::parse("0").is_err());
        assert!(translation::MaxBatch::parse("1000").is_err());
        assert!(translation::MaxAttempts::parse("11").is_err());
        assert!(web::Port::parse("0").is_err());
        assert_eq!(web::Port::parse("8000").unwrap(), 8000);
    }

    #[test]
    fn test_missing_key_is_reported() {
        let config = EnvConfig {
            log_level: "info".to_string(),
            api_key: None,
            model: "m".to_string(),
            api_base: "https://example.com".to_string(),
            json_mode: true,
            max_batch: 32,
            default_target_lang: "vi".to_string(),
            max_attempts: 3,
            web_bind_address: "0.0.0.0".to_string(),
            web_port: 8000,
        };

        let err = config.validate().unwrap_err();
        assert_eq!(err.variable, "GEMINI_API_KEY");
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_debug_hides_key() {
        let config = EnvConfig {
            log_level: "info".to_string(),
            api_key: Some("secret-key".to_string()),
            model: "m".to_string(),
            api_base: "https://example.com".to_string(),
            json_mode: true,
            max_batch: 32,
            default_target_lang: "vi".to_string(),
            max_attempts: 3,
            web_bind_address: "0.0.0.0".to_string(),
            web_port: 8000,
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[configured]"));
    }

    #[test]
    fn test_docs_list_every_variable() {
        let docs = generate_env_docs();
        for name in [
            "HTML_TRANSLATOR_LOG_LEVEL",
            "GEMINI_API_KEY",
            "GEMINI_MODEL",
            "GEMINI_API_BASE",
            "GEMINI_JSON_MODE",
            "MAX_BATCH",
            "DEFAULT_TARGET_LANG",
            "TRANSLATION_MAX_ATTEMPTS",
            "HOST",
            "PORT",
        ] {
            assert!(docs.contains(name), "missing {}", name);
        }
    }
}
