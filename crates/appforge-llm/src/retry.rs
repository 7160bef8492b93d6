use crate::errors::LlmError;
use rand::Rng;
use std::future::Future;
use tokio::time::{sleep, Duration};
use tracing::warn;

pub trait Backoff: Send + Sync {
    fn next_delay_ms(&self, attempt: u32) -> i64;
    fn max_attempts(&self) -> u32;
}

#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_ms: i64,
    pub factor: f64,
    pub jitter: f64,
    pub cap_ms: i64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        // Exponential backoff starting near 1s, capped near 60s, three
        // total attempts.
        RetryPolicy {
            max_attempts: 3,
            base_ms: 1_000,
            factor: 2.0,
            jitter: 0.2,
            cap_ms: 60_000,
        }
    }
}

impl Backoff for RetryPolicy {
    fn next_delay_ms(&self, attempt: u32) -> i64 {
        if attempt == 0 {
            return 0;
        }
        let exp = (attempt - 1) as f64;
        let mut delay = (self.base_ms as f64) * self.factor.powf(exp);
        if delay > self.cap_ms as f64 {
            delay = self.cap_ms as f64;
        }
        if self.jitter > 0.0 {
            let mut rng = rand::thread_rng();
            let jitter = rng.gen_range(-(self.jitter)..self.jitter);
            delay *= 1.0 + jitter;
            if delay < 0.0 {
                delay = self.base_ms as f64;
            }
        }
        delay.round() as i64
    }

    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Runs `op` under the backoff policy. Transient errors are retried until
/// the attempt budget is spent; the last underlying error is surfaced.
/// Deterministic failures abort immediately.
pub async fn retry_async<T, F, Fut>(policy: &dyn Backoff, mut op: F) -> Result<T, LlmError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut attempt: u32 = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.retry_class().is_transient() || attempt >= policy.max_attempts() {
                    return Err(err);
                }
                let delay = policy.next_delay_ms(attempt).max(0) as u64;
                warn!(
                    attempt,
                    delay_ms = delay,
                    "llm call failed, retrying: {}",
                    err.message()
                );
                sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
        }
    }
}
