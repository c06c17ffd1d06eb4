//! Retry policy for the target page fetch.
//!
//! Only timeouts are retried. Any other transport failure is terminal on the
//! first attempt.

use crate::config::FetchSettings;
use crate::network::errors::FetchError;
use std::time::Duration;

/// Classification of a fetch failure for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The attempt exceeded its timeout.
    Timeout,
    /// Anything else (connection refused, DNS, TLS, redirect loop, bad URL).
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Bounded attempts with a fixed (default zero) delay between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Pause before the next attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&FetchSettings::default())
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &FetchSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            delay: Duration::ZERO,
        }
    }

    /// `attempt` is 1-based (1 = first attempt).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        match kind {
            ErrorKind::Timeout => RetryDecision::RetryAfter(self.delay),
            ErrorKind::Other => RetryDecision::NoRetry,
        }
    }
}

pub fn classify(err: &FetchError) -> ErrorKind {
    if err.is_timeout() {
        ErrorKind::Timeout
    } else {
        ErrorKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_retry_until_bound() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_attempts, 3);
        assert_eq!(
            p.decide(1, ErrorKind::Timeout),
            RetryDecision::RetryAfter(Duration::ZERO)
        );
        assert_eq!(
            p.decide(2, ErrorKind::Timeout),
            RetryDecision::RetryAfter(Duration::ZERO)
        );
        assert_eq!(p.decide(3, ErrorKind::Timeout), RetryDecision::NoRetry);
    }

    #[test]
    fn other_errors_never_retry() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, ErrorKind::Other), RetryDecision::NoRetry);
    }

    #[test]
    fn classify_fetch_errors() {
        assert_eq!(
            classify(&FetchError::Timeout(Duration::from_secs(5))),
            ErrorKind::Timeout
        );
        assert_eq!(
            classify(&FetchError::Connection("refused".into())),
            ErrorKind::Other
        );
        assert_eq!(classify(&FetchError::TooManyRedirects(10)), ErrorKind::Other);
    }
}
