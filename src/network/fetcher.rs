// * Content Fetcher
// * Wraps a PageSource with the timeout-only retry policy and produces a FetchResult.

use crate::engine::diagnostics::{Diagnostic, Stage};
use crate::network::client::PageSource;
use crate::network::retry::{classify, ErrorKind, RetryDecision, RetryPolicy};
use crate::ops::telemetry;
use std::sync::Arc;
use std::time::Instant;

// * Outcome of the live fetch for one classification request.
// * Consumed once by the content extractor, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Fetched {
        body: String,
        redirect_history_len: usize,
    },
    Unavailable,
}

impl FetchResult {
    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchResult::Fetched { .. })
    }
}

#[derive(Debug, Clone)]
pub struct FetchReport {
    pub result: FetchResult,
    pub attempts: u32,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ContentFetcher {
    source: Arc<dyn PageSource>,
    policy: RetryPolicy,
}

impl ContentFetcher {
    pub fn new(source: Arc<dyn PageSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    // * Never fails: exhausted timeouts and non-timeout errors both yield Unavailable.
    pub async fn fetch(&self, url: &str) -> FetchReport {
        let mut diagnostics = Vec::new();
        let mut attempt = 1u32;

        loop {
            let started = Instant::now();
            let outcome = self.source.get(url).await;
            telemetry::observe_fetch_duration(started.elapsed().as_secs_f64());

            match outcome {
                Ok(page) => {
                    telemetry::record_fetch_attempt("success");
                    tracing::debug!(
                        url = url,
                        attempt = attempt,
                        status = page.status,
                        redirects = page.redirect_history_len,
                        bytes = page.body.len(),
                        "Fetched page"
                    );
                    return FetchReport {
                        result: FetchResult::Fetched {
                            body: page.body,
                            redirect_history_len: page.redirect_history_len,
                        },
                        attempts: attempt,
                        diagnostics,
                    };
                }
                Err(e) => {
                    let kind = classify(&e);
                    telemetry::record_fetch_attempt(match kind {
                        ErrorKind::Timeout => "timeout",
                        ErrorKind::Other => "error",
                    });

                    match self.policy.decide(attempt, kind) {
                        RetryDecision::RetryAfter(delay) => {
                            diagnostics.push(Diagnostic::warning(
                                Stage::Fetch,
                                format!(
                                    "Attempt {} of {}: {}. Retrying...",
                                    attempt, self.policy.max_attempts, e
                                ),
                            ));
                            if !delay.is_zero() {
                                tokio::time::sleep(delay).await;
                            }
                            attempt += 1;
                        }
                        RetryDecision::NoRetry => {
                            let message = match kind {
                                ErrorKind::Timeout => format!(
                                    "Failed to retrieve {} after {} attempts: {}",
                                    url, attempt, e
                                ),
                                ErrorKind::Other => format!("Failed to retrieve {}: {}", url, e),
                            };
                            diagnostics.push(Diagnostic::error(Stage::Fetch, message));
                            return FetchReport {
                                result: FetchResult::Unavailable,
                                attempts: attempt,
                                diagnostics,
                            };
                        }
                    }
                }
            }
        }
    }
}
