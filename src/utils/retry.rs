use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;

/// Retry an async operation with exponential backoff (1s, 2s, 4s).
/// Only transient failures (timeouts, connection errors, 5xx) are retried;
/// client errors return immediately.
///
/// `max_retries` excludes the first attempt, so the operation runs at most
/// `max_retries + 1` times.
pub async fn retry_with_backoff<F, Fut, T>(max_retries: u32, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if !is_retryable(&e) || attempt == max_retries {
                    return Err(e);
                }
                let delay = Duration::from_secs(1 << attempt);
                log::warn!(
                    "request failed (attempt {}), retrying in {}s: {}",
                    attempt + 1,
                    delay.as_secs(),
                    e
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

fn is_retryable(err: &anyhow::Error) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("timeout")
        || msg.contains("timed out")
        || msg.contains("connection")
        || msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("504")
        || msg.contains("server error")
        || msg.contains("broken pipe")
        || msg.contains("reset by peer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_non_retryable_error_returns_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_with_backoff(3, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("400 bad request"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retryable_error_is_retried() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(2, || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(anyhow!("connection refused"))
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
