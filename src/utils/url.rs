use crate::translation::error::{TranslationError, TranslationResult};

pub use url::Url;

/// 解析并校验待翻译文档的 URL
///
/// 只接受带主机名的绝对 http(s) URL。
pub fn parse_http_url(raw: &str) -> TranslationResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TranslationError::InvalidInput("URL 不能为空".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| TranslationError::InvalidInput(format!("URL 无效 '{}': {}", trimmed, e)))?;

    if !is_http_url(&url) {
        return Err(TranslationError::InvalidInput(format!(
            "只支持 http/https URL: '{}'",
            trimmed
        )));
    }

    Ok(url)
}

pub fn is_http_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}

/// 去掉用户名和密码，用于日志输出
pub fn redact_url(url: &Url) -> String {
    let mut clean = url.clone();
    if !clean.username().is_empty() {
        let _ = clean.set_username("");
    }
    if clean.password().is_some() {
        let _ = clean.set_password(None);
    }
    clean.to_string()
}
