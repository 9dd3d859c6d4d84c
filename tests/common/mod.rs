// 集成测试公共模块
//
// 提供 HTML 样例、内存中的翻译后端和文档获取器

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use html_translator::network::{DocumentFetcher, FetchedDocument};
use html_translator::translation::{
    DocumentTranslator, RetryPolicy, TranslationBackend, TranslationConfig, TranslationEngine,
    TranslationError, TranslationResult,
};

/// 测试用的快速重试策略：3 次尝试，毫秒级退避
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(4),
    }
}

/// 从翻译指令中取出提交的列表
pub fn prompt_items(prompt: &str) -> Vec<String> {
    let (_, input) = prompt
        .split_once("INPUT:\n")
        .expect("prompt carries an INPUT section");
    serde_json::from_str(input).expect("INPUT is a JSON list of strings")
}

/// 给每一项加前缀的后端，记录每次提交的批次
pub struct EchoBackend {
    prefix: String,
    pub batches: Mutex<Vec<Vec<String>>>,
}

impl EchoBackend {
    pub fn new(prefix: &str) -> Arc<Self> {
        Arc::new(Self {
            prefix: prefix.to_string(),
            batches: Mutex::new(Vec::new()),
        })
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationBackend for EchoBackend {
    async fn generate(&self, prompt: &str) -> TranslationResult<String> {
        let items = prompt_items(prompt);
        let translated: Vec<String> = items
            .iter()
            .map(|item| format!("{}{}", self.prefix, item))
            .collect();
        self.batches.lock().unwrap().push(items);
        Ok(serde_json::to_string(&translated).unwrap())
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// 按顺序返回预设回答的后端
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<TranslationResult<String>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<TranslationResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        })
    }

    /// 每次都返回同一个回答
    pub fn repeating(reply: &str, times: usize) -> Arc<Self> {
        Self::new((0..times).map(|_| Ok(reply.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationBackend for ScriptedBackend {
    async fn generate(&self, _prompt: &str) -> TranslationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TranslationError::InternalError("script exhausted".into())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// 返回固定文档或固定错误的获取器
pub struct StubFetcher {
    outcome: Result<(String, Url), String>,
    calls: AtomicUsize,
}

impl StubFetcher {
    /// 成功获取，最终地址为 `final_url`
    pub fn serving(body: &str, final_url: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok((body.to_string(), Url::parse(final_url).unwrap())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentFetcher for StubFetcher {
    async fn fetch(&self, _url: &Url) -> TranslationResult<FetchedDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok((body, final_url)) => Ok(FetchedDocument {
                body: body.clone(),
                final_url: final_url.clone(),
                content_type: Some("text/html; charset=utf-8".to_string()),
            }),
            Err(message) => Err(TranslationError::FetchError(message.clone())),
        }
    }
}

/// 组装翻译服务
pub fn build_translator(
    fetcher: Arc<dyn DocumentFetcher>,
    backend: Arc<dyn TranslationBackend>,
    max_batch: usize,
) -> DocumentTranslator {
    let config = TranslationConfig::default()
        .with_max_batch(max_batch)
        .with_retry(fast_retry());
    let engine = TranslationEngine::new(backend, config.retry);
    DocumentTranslator::new(fetcher, engine, config)
}

/// HTML 测试样例
pub struct HtmlFixtures;

impl HtmlFixtures {
    /// 一个段落加一张带 alt 的图片
    pub fn hello_dog() -> &'static str {
        r#"<html><head></head><body><p>Hello</p><img alt="Dog"></body></html>"#
    }

    /// 包含跳过元素和各种属性的页面
    pub fn mixed_page() -> &'static str {
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Page title</title>
    <style>body { color: red; }</style>
    <script>var greeting = "hi";</script>
</head>
<body>
    <!-- a comment -->
    <h1 title="Heading tip">Welcome</h1>
    <p>First <b>bold</b> paragraph</p>
    <pre>let x = 1;</pre>
    <code>fn main()</code>
    <textarea>draft</textarea>
    <noscript>enable js</noscript>
    <a href="/about" aria-label="About us" data-note="keep">About</a>
    <input placeholder="Search here" value="query">
</body>
</html>"#
    }

    /// `count` 个编号段落
    pub fn numbered_paragraphs(count: usize) -> String {
        let body: String = (0..count).map(|i| format!("<p>item {}</p>", i)).collect();
        format!("<html><head></head><body>{}</body></html>", body)
    }
}
