use std::time::Duration;

use crate::errors::CallError;

/// Transient failure classes that are worth another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    RateLimited,
    Transport,
}

impl RetryReason {
    /// The error reported once no attempts remain
    pub fn exhausted(self, attempts: u32, detail: String) -> CallError {
        match self {
            RetryReason::RateLimited => CallError::RateLimited { attempts, detail },
            RetryReason::Transport => CallError::Transport { attempts, detail },
        }
    }
}

/// Exponential backoff without jitter, bounded only by the attempt ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub rate_limit_base_delay: Duration,
    pub transport_base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_base_delay: Duration::from_secs(2),
            transport_base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn base_delay(&self, reason: RetryReason) -> Duration {
        match reason {
            RetryReason::RateLimited => self.rate_limit_base_delay,
            RetryReason::Transport => self.transport_base_delay,
        }
    }

    /// Wait before the attempt following the failed attempt `attempt_index` (zero based)
    pub fn backoff(&self, reason: RetryReason, attempt_index: u32) -> Duration {
        self.base_delay(reason)
            .saturating_mul(2u32.saturating_pow(attempt_index))
    }

    /// Every wait taken when all attempts fail for the same reason
    pub fn schedule(&self, reason: RetryReason) -> Vec<Duration> {
        (0..self.max_attempts.saturating_sub(1))
            .map(|attempt_index| self.backoff(reason, attempt_index))
            .collect()
    }
}
