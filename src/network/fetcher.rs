//! 文档获取
//!
//! 以浏览器的方式请求页面：跟随重定向、接受压缩传输，返回解码后的
//! 文本以及重定向之后的最终 URL。获取失败不重试。

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use url::Url;

use crate::network::pool::HttpPool;
use crate::parsers::html::{charset_from_content_type, get_charset, html_to_dom};
use crate::translation::error::{TranslationError, TranslationResult};
use crate::utils::redact_url;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// 获取到的文档
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// 解码后的文档文本
    pub body: String,
    /// 跟随重定向后的最终地址
    pub final_url: Url,
    pub content_type: Option<String>,
}

/// 文档获取接口
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> TranslationResult<FetchedDocument>;
}

/// 基于 reqwest 的文档获取器
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    pool: HttpPool,
}

impl HttpFetcher {
    pub fn new(pool: HttpPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> TranslationResult<FetchedDocument> {
        let shown = redact_url(url);
        let _permit = self
            .pool
            .acquire()
            .await
            .map_err(|e| TranslationError::FetchError(format!("{}: {}", shown, e)))?;

        tracing::debug!("获取文档: {}", shown);

        let response = self
            .pool
            .client()
            .get(url.clone())
            .header(ACCEPT, HTML_ACCEPT)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| describe_request_error(&shown, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::FetchError(format!(
                "{} 返回 HTTP {}",
                shown, status
            )));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| describe_request_error(&shown, &e))?;

        if final_url != *url {
            tracing::debug!("重定向到: {}", redact_url(&final_url));
        }

        Ok(FetchedDocument {
            body: decode_body(&bytes, content_type.as_deref()),
            final_url,
            content_type,
        })
    }
}

fn describe_request_error(shown: &str, error: &reqwest::Error) -> TranslationError {
    if error.is_timeout() {
        TranslationError::FetchError(format!("{} 请求超时", shown))
    } else if error.is_redirect() {
        TranslationError::FetchError(format!("{} 重定向次数过多", shown))
    } else {
        TranslationError::FetchError(format!("{}: {}", shown, error))
    }
}

/// 解码响应体
///
/// 编码优先级：`Content-Type` 的 charset 参数，其次文档内的 meta 声明，
/// 最后按 UTF-8 宽松解码。BOM 总是优先。
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(charset_from_content_type)
        .or_else(|| get_charset(&html_to_dom(bytes, "utf-8").document));

    if let Some(encoding) = declared.and_then(|label| Encoding::for_label(label.as_bytes())) {
        let (text, _, _) = encoding.decode(bytes);
        return text.into_owned();
    }

    let (text, _, _) = UTF_8.decode(bytes);
    text.into_owned()
}
