//! 出站 HTTP 连接池
//!
//! 每个池是一个 `reqwest::Client` 加一个并发上限信号量。文档获取和翻译
//! 后端各持有一个池，进程内共享，跨请求复用。

use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::translation::config::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 浏览器风格的 User-Agent
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127 Safari/537.36";

/// 出站请求配置
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// 请求体写入上限，计入总超时
    pub write_timeout: Duration,
    /// 等待空闲连接槽位的上限
    pub pool_timeout: Duration,
    pub max_idle_per_host: usize,
    /// 同时进行的请求数上限
    pub max_connections: usize,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(constants::CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(constants::READ_TIMEOUT_SECS),
            write_timeout: Duration::from_secs(constants::WRITE_TIMEOUT_SECS),
            pool_timeout: Duration::from_secs(constants::POOL_TIMEOUT_SECS),
            max_idle_per_host: constants::MAX_KEEPALIVE_CONNECTIONS,
            max_connections: constants::MAX_CONNECTIONS,
            max_redirects: constants::MAX_REDIRECTS,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// 单个请求的总超时
    pub fn total_timeout(&self) -> Duration {
        self.connect_timeout + self.read_timeout + self.write_timeout
    }
}

/// 有界的共享 HTTP 客户端
#[derive(Debug, Clone)]
pub struct HttpPool {
    client: Client,
    permits: Arc<Semaphore>,
    pool_timeout: Duration,
}

impl HttpPool {
    /// 按配置创建连接池
    pub fn new(config: &FetchConfig) -> TranslationResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .timeout(config.total_timeout())
            .pool_idle_timeout(config.pool_timeout)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            client,
            permits: Arc::new(Semaphore::new(config.max_connections.max(1))),
            pool_timeout: config.pool_timeout,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// 获取一个并发槽位，等待超过 `pool_timeout` 时返回超时错误
    pub async fn acquire(&self) -> TranslationResult<OwnedSemaphorePermit> {
        let permit = tokio::time::timeout(self.pool_timeout, self.permits.clone().acquire_owned())
            .await
            .map_err(|_| {
                TranslationError::TimeoutError(format!(
                    "等待连接池槽位超过 {:?}",
                    self.pool_timeout
                ))
            })?;

        permit.map_err(|_| TranslationError::InternalError("连接池已关闭".to_string()))
    }

    /// 当前可用槽位
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}
