use std::time::Duration;
use thiserror::Error;

// * Failure to construct the network layer.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("HTTP client construction failed: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

// * Failure of a single page fetch attempt.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Exceeded {0} redirects")]
    TooManyRedirects(usize),
}

impl FetchError {
    // * Maps reqwest's error taxonomy onto ours; timeouts must stay distinguishable.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else {
            FetchError::Request(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout(_))
    }
}

// * Failure of a ranking service lookup. Always absorbed by the caller.
#[derive(Error, Debug)]
pub enum RankError {
    #[error("No ranking service API key configured")]
    MissingApiKey,

    #[error("Ranking request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Ranking service returned HTTP {0}")]
    Status(u16),

    #[error("Ranking response is not valid JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Ranking response has no GlobalRank.Rank field")]
    MissingRank,

    #[error("Ranking response has a non-numeric rank: {0}")]
    InvalidRank(String),
}
