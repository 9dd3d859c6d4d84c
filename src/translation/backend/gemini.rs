//! Gemini `generateContent` 后端
//!
//! 默认请求 JSON 模式（`responseMimeType` + 字符串数组 `responseSchema`）。
//! 如果服务端以 400 拒绝这些字段，客户端永久关闭 JSON 模式，并立即不带
//! 这些字段重发同一请求。

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::env::{EnvConfig, EnvResult};
use crate::network::pool::HttpPool;
use crate::translation::backend::TranslationBackend;
use crate::translation::config::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// Gemini 后端配置
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// 例如 `https://generativelanguage.googleapis.com/v1beta`
    pub api_base: String,
    pub json_mode: bool,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[configured]")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("json_mode", &self.json_mode)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: constants::DEFAULT_MODEL.to_string(),
            api_base: constants::DEFAULT_API_BASE.to_string(),
            json_mode: true,
            temperature: 0.0,
            max_output_tokens: None,
        }
    }

    /// 从环境配置构建，缺少密钥时报错
    pub fn from_env_config(env: &EnvConfig) -> EnvResult<Self> {
        Ok(Self {
            model: env.model.clone(),
            api_base: env.api_base.clone(),
            json_mode: env.json_mode,
            ..Self::new(env.require_api_key()?)
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    /// 请求地址
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str, config: &GeminiConfig, json_mode: bool) -> Self {
        let (response_mime_type, response_schema) = if json_mode {
            (
                Some("application/json"),
                Some(json!({ "type": "ARRAY", "items": { "type": "STRING" } })),
            )
        } else {
            (None, None)
        };

        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
                response_mime_type,
                response_schema,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// 单次发送的结果
enum Reply {
    Text(String),
    /// 服务端拒绝了 JSON 模式字段
    SchemaRejected(String),
}

/// Gemini 翻译后端
pub struct GeminiBackend {
    pool: HttpPool,
    config: GeminiConfig,
    endpoint: String,
    json_mode: AtomicBool,
}

impl GeminiBackend {
    pub fn new(pool: HttpPool, config: GeminiConfig) -> Self {
        Self {
            pool,
            endpoint: config.endpoint(),
            json_mode: AtomicBool::new(config.json_mode),
            config,
        }
    }

    /// JSON 模式当前是否启用
    pub fn json_mode(&self) -> bool {
        self.json_mode.load(Ordering::Relaxed)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn send(&self, prompt: &str, json_mode: bool) -> TranslationResult<Reply> {
        let body = GenerateRequest::new(prompt, &self.config, json_mode);
        let _permit = self.pool.acquire().await?;

        let response = self
            .pool
            .client()
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(classify_transport_error)?;

        if status.is_success() {
            return extract_text(&text).map(Reply::Text);
        }

        let message = error_message(&text);
        if json_mode && is_schema_rejection(status, &message) {
            return Ok(Reply::SchemaRejected(message));
        }

        Err(classify_status(status, &message))
    }
}

#[async_trait]
impl TranslationBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> TranslationResult<String> {
        let json_mode = self.json_mode();

        match self.send(prompt, json_mode).await? {
            Reply::Text(text) => Ok(text),
            Reply::SchemaRejected(message) => {
                tracing::warn!("模型 {} 不支持 JSON 模式，已关闭: {}", self.config.model, message);
                self.json_mode.store(false, Ordering::Relaxed);

                match self.send(prompt, false).await? {
                    Reply::Text(text) => Ok(text),
                    Reply::SchemaRejected(message) => {
                        Err(classify_status(StatusCode::BAD_REQUEST, &message))
                    }
                }
            }
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

fn classify_transport_error(error: reqwest::Error) -> TranslationError {
    if error.is_timeout() {
        TranslationError::TimeoutError(format!("Gemini 请求超时: {}", error))
    } else {
        TranslationError::NetworkError(format!("Gemini 请求失败: {}", error))
    }
}

/// 按状态码和错误信息归类
fn classify_status(status: StatusCode, message: &str) -> TranslationError {
    let lower = message.to_lowercase();
    let key_problem = lower.contains("api key") || lower.contains("api_key") || lower.contains("expired");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            TranslationError::AuthenticationError(format!("HTTP {}: {}", status.as_u16(), message))
        }
        StatusCode::BAD_REQUEST if key_problem => {
            TranslationError::AuthenticationError(format!("HTTP 400: {}", message))
        }
        _ => TranslationError::TranslationServiceError(format!(
            "HTTP {}: {}",
            status.as_u16(),
            truncate(message, 280)
        )),
    }
}

fn is_schema_rejection(status: StatusCode, message: &str) -> bool {
    if status != StatusCode::BAD_REQUEST {
        return false;
    }
    let lower = message.to_lowercase();
    ["responsemimetype", "responseschema", "response_mime_type", "response_schema", "schema", "unknown field"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// 提取错误信息，优先使用 `error.message`
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.trim().to_string(),
    }
}

/// 拼接第一个候选的所有文本片段
fn extract_text(body: &str) -> TranslationResult<String> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| TranslationError::ParseError(format!("无法解析 Gemini 响应: {}", e)))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .unwrap_or_else(|| "无候选结果".to_string());
        return Err(TranslationError::TranslationServiceError(format!(
            "Gemini 未返回内容: {}",
            reason
        )));
    };

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(TranslationError::TranslationServiceError(format!(
            "Gemini 返回空内容 (finishReason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_in_json_mode() {
        let config = GeminiConfig::new("k");
        let body = serde_json::to_value(GenerateRequest::new("hi", &config, true)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn test_request_body_without_json_mode() {
        let config = GeminiConfig::new("k");
        let body = serde_json::to_value(GenerateRequest::new("hi", &config, false)).unwrap();

        assert!(body["generationConfig"].get("responseMimeType").is_none());
        assert!(body["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn test_endpoint_and_debug_hide_key() {
        let config = GeminiConfig::new("secret")
            .with_api_base("https://example.com/v1beta/")
            .with_model("gemini-test");

        assert_eq!(
            config.endpoint(),
            "https://example.com/v1beta/models/gemini-test:generateContent"
        );
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_extract_concatenates_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"[\"a\","},{"text":"\"b\"]"}],"role":"model"},"finishReason":"STOP"}]}"#;
        assert_eq!(extract_text(body).unwrap(), r#"["a","b"]"#);
    }

    #[test]
    fn test_extract_reports_blocked_prompt() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let err = extract_text(body).unwrap_err();
        assert!(matches!(err, TranslationError::TranslationServiceError(ref m) if m.contains("SAFETY")));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_extract_rejects_non_json() {
        assert!(matches!(
            extract_text("<html>bad gateway</html>"),
            Err(TranslationError::ParseError(_))
        ));
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "denied"),
            TranslationError::AuthenticationError(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, "API key not valid. Please pass a valid API key."),
            TranslationError::AuthenticationError(_)
        ));

        let overloaded = classify_status(StatusCode::SERVICE_UNAVAILABLE, "overloaded");
        assert!(matches!(overloaded, TranslationError::TranslationServiceError(_)));
        assert!(overloaded.is_retryable());
        assert!(classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down").is_retryable());
    }

    #[test]
    fn test_schema_rejection_detection() {
        let message = error_message(
            r#"{"error":{"code":400,"message":"Invalid JSON payload received. Unknown name \"responseSchema\"","status":"INVALID_ARGUMENT"}}"#,
        );
        assert!(is_schema_rejection(StatusCode::BAD_REQUEST, &message));
        assert!(!is_schema_rejection(StatusCode::INTERNAL_SERVER_ERROR, &message));
        assert!(!is_schema_rejection(StatusCode::BAD_REQUEST, "API key expired"));
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("  plain failure "), "plain failure");
    }
}
