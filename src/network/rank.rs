// * Rank Lookup Client
// * Queries a third-party traffic ranking service. Every failure degrades to the
// * unsafe default so this one signal never blocks a classification.

use crate::config::constants::{RANK_THRESHOLD, USER_AGENT};
use crate::config::{ApiKey, RankSettings};
use crate::engine::diagnostics::{Diagnostic, Stage};
use crate::network::errors::{NetworkError, RankError};
use crate::ops::telemetry;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;

const HEADER_API_KEY: &str = "X-RapidAPI-Key";
const HEADER_API_HOST: &str = "X-RapidAPI-Host";

// * A source of global traffic ranks. Lower rank = more traffic.
pub trait RankService: Send + Sync {
    fn rank<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<u64, RankError>>;
}

// * HTTP client for the SimilarWeb analysis endpoint on RapidAPI.
pub struct SimilarWebClient {
    inner: Client,
    endpoint: String,
    api_host: String,
    api_key: Option<ApiKey>,
}

impl SimilarWebClient {
    pub fn new(settings: &RankSettings) -> Result<Self, NetworkError> {
        let inner = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            inner,
            endpoint: settings.endpoint.clone(),
            api_host: settings.api_host.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    // * The full URL, not just the domain, is sent as the `domain` parameter.
    pub async fn lookup(&self, url: &str) -> Result<u64, RankError> {
        let api_key = self.api_key.as_ref().ok_or(RankError::MissingApiKey)?;

        let resp = self
            .inner
            .get(&self.endpoint)
            .query(&[("domain", url)])
            .header(HEADER_API_KEY, api_key.expose())
            .header(HEADER_API_HOST, &self.api_host)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RankError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let data: Value = serde_json::from_str(&body)?;
        parse_rank(&data)
    }
}

impl RankService for SimilarWebClient {
    fn rank<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<u64, RankError>> {
        self.lookup(url).boxed()
    }
}

// * Reads GlobalRank.Rank; accepts integers, whole floats and numeric strings.
pub fn parse_rank(data: &Value) -> Result<u64, RankError> {
    let rank = data
        .get("GlobalRank")
        .and_then(|g| g.get("Rank"))
        .filter(|r| !r.is_null())
        .ok_or(RankError::MissingRank)?;

    match rank {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.trunc() as u64)
            })
            .ok_or_else(|| RankError::InvalidRank(n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| RankError::InvalidRank(s.clone())),
        other => Err(RankError::InvalidRank(other.to_string())),
    }
}

// * Traffic feature for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficSignal {
    pub low_traffic: bool,
    // * None when the lookup failed and the default was applied
    pub rank: Option<u64>,
    pub diagnostic: Option<Diagnostic>,
}

pub struct RankLookup {
    service: Arc<dyn RankService>,
}

impl RankLookup {
    pub fn new(service: Arc<dyn RankService>) -> Self {
        Self { service }
    }

    // * Never raises. Rank below RANK_THRESHOLD sets the flag; failures set it too.
    pub async fn low_traffic(&self, url: &str) -> TrafficSignal {
        match self.service.rank(url).await {
            Ok(rank) => {
                telemetry::record_rank_lookup("success");
                tracing::debug!(url = url, rank = rank, "Rank lookup succeeded");
                TrafficSignal {
                    low_traffic: rank < RANK_THRESHOLD,
                    rank: Some(rank),
                    diagnostic: None,
                }
            }
            Err(e) => {
                telemetry::record_rank_lookup("failure");
                TrafficSignal {
                    low_traffic: true,
                    rank: None,
                    diagnostic: Some(Diagnostic::warning(
                        Stage::Rank,
                        format!("Error retrieving web traffic data: {}", e),
                    )),
                }
            }
        }
    }
}
