//! 重试策略
//!
//! 每次尝试返回显式的结果，由 [`TranslationError::is_retryable`] 决定是否继续。
//! 第 n 次失败后的等待时间为 `base * 2^(n-1)`，并限制在 `[base, max]` 区间内。

use std::future::Future;
use std::time::Duration;

use crate::translation::config::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 指数退避重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 总尝试次数（包含第一次）
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: constants::DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(constants::RETRY_BASE_DELAY_SECS),
            max_delay: Duration::from_secs(constants::RETRY_MAX_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    /// 不重试
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// 第 `attempt` 次尝试失败后的等待时间（`attempt` 从 1 开始）
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1u32 << exponent);
        delay.min(self.max_delay).max(self.base_delay)
    }

    /// 执行操作，按策略重试
    ///
    /// - 成功立即返回
    /// - 不可重试的错误原样返回
    /// - 尝试次数耗尽时返回 [`TranslationError::RetriesExhausted`]，携带最后一次失败
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> TranslationResult<T>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = TranslationResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!("{} 在第 {} 次尝试成功", label, attempt);
                    }
                    return Ok(value);
                }
                Err(err) if !err.is_retryable() => {
                    tracing::warn!("{} 失败（不可重试）: {}", label, err);
                    return Err(err);
                }
                Err(err) if attempt >= max_attempts => {
                    tracing::warn!("{} 失败，已尝试 {} 次: {}", label, attempt, err);
                    return Err(TranslationError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
                Err(err) => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "{} 第 {}/{} 次尝试失败: {}，{:?} 后重试",
                        label,
                        attempt,
                        max_attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_delay_schedule_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            ..RetryPolicy::default()
        };

        let delays: Vec<u64> = (1..=6).map(|n| policy.delay_for(n).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 8, 8]);
        assert_eq!(policy.delay_for(1000), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let started = tokio::time::Instant::now();

        let result = RetryPolicy::default()
            .run("test", move |_| async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(TranslationError::NetworkError("reset".into()))
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        // 1s + 2s
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_wraps_last_error() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let err = RetryPolicy::default()
            .run("test", move |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    Err::<(), _>(TranslationError::ShapeMismatch {
                        expected: 2,
                        found: format!("attempt {attempt}"),
                    })
                }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            TranslationError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(matches!(
                    *source,
                    TranslationError::ShapeMismatch { ref found, .. } if found == "attempt 3"
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_stops_immediately() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let err = RetryPolicy::default()
            .run("test", move |_| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TranslationError::AuthenticationError("401".into()))
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, TranslationError::AuthenticationError(_)));
    }
}
