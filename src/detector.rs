//! Top-level phishing detector.
//!
//! Wires the feature assembler to a loaded classifier. Construction is the
//! only fallible step that aborts the process: once a detector exists, every
//! recoverable failure of a request ends up as a default feature value plus a
//! [`Diagnostic`] on the returned [`Classification`].

use crate::classifier::{load_classifier, Classifier, ClassifierError, Label};
use crate::config::Settings;
use crate::engine::{normalize_url, Assembly, Diagnostic, FeatureAssembler, FeatureVector, Stage};
use crate::network::{
    ContentFetcher, HttpPageSource, NetworkError, RankLookup, RetryPolicy, SimilarWebClient,
};
use crate::ops::telemetry;
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

// * Only https URLs ending in .com or .net pass the domain gate
static DOMAIN_GATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://.*\.(com|net)$").unwrap());

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Failed to build HTTP client: {0}")]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Outcome of classifying one URL.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub url: String,
    pub label: Label,
    pub vector: FeatureVector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u64>,
    pub fetch_attempts: u32,
    /// What produced the label
    pub decided_by: DecisionSource,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Model,
    DomainGate,
}

pub struct PhishingDetector {
    assembler: FeatureAssembler,
    classifier: Arc<dyn Classifier>,
    domain_gate: bool,
}

impl PhishingDetector {
    pub fn new(assembler: FeatureAssembler, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            assembler,
            classifier,
            domain_gate: false,
        }
    }

    /// Labels every URL outside `https://...(.com|.net)` as phishing before
    /// any feature is fetched or the model is consulted.
    pub fn with_domain_gate(mut self, enabled: bool) -> Self {
        self.domain_gate = enabled;
        self
    }

    pub fn passes_domain_gate(url: &str) -> bool {
        DOMAIN_GATE.is_match(url)
    }

    /// Builds the production pipeline: HTTP page source, rank client, and the
    /// classifier artifact named in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, DetectorError> {
        let classifier = load_classifier(&settings.model_path)?;

        let source = Arc::new(HttpPageSource::new(&settings.fetch)?);
        let fetcher = ContentFetcher::new(source, RetryPolicy::from_settings(&settings.fetch));

        if settings.rank.api_key.is_none() {
            tracing::warn!("No rank API key configured, every URL will be scored as low traffic");
        }
        let rank = RankLookup::new(Arc::new(SimilarWebClient::new(&settings.rank)?));

        tracing::info!(
            model = %settings.model_path.display(),
            fallback = ?settings.content_fallback,
            iframe_rule = ?settings.iframe_rule,
            domain_gate = settings.domain_gate,
            max_attempts = settings.fetch.max_attempts,
            "Detector ready"
        );

        Ok(Self::new(
            FeatureAssembler::new(rank, fetcher, settings.content_rules()),
            classifier,
        )
        .with_domain_gate(settings.domain_gate))
    }

    /// Assembles the feature vector for `raw_url` without classifying it.
    pub async fn features(&self, raw_url: &str) -> Assembly {
        self.assembler.assemble(raw_url).await
    }

    pub async fn classify(&self, raw_url: &str) -> Result<Classification, DetectorError> {
        if self.domain_gate && !Self::passes_domain_gate(&normalize_url(raw_url)) {
            return Ok(self.gated(raw_url));
        }

        let assembly = self.assembler.assemble(raw_url).await;

        let label = self.classifier.predict(&assembly.vector).map_err(|e| {
            tracing::error!(stage = Stage::Classify.as_str(), url = %assembly.url, error = %e, "Classification failed");
            e
        })?;

        telemetry::record_classification(label.as_str());
        tracing::info!(url = %assembly.url, label = %label, vector = %assembly.vector, "Classified URL");

        Ok(Classification {
            url: assembly.url,
            label,
            vector: assembly.vector,
            rank: assembly.rank,
            fetch_attempts: assembly.fetch_attempts,
            decided_by: DecisionSource::Model,
            diagnostics: assembly.diagnostics,
        })
    }

    // * Vector is lexical-only with offline defaults; the model is not called
    fn gated(&self, raw_url: &str) -> Classification {
        let mut assembly = self.assembler.assemble_offline(raw_url);
        assembly.diagnostics.push(Diagnostic::warning(
            Stage::Classify,
            format!("{} is not an https .com/.net URL, labeled phishing by the domain gate", assembly.url),
        ));
        telemetry::record_classification(Label::Phishing.as_str());

        Classification {
            url: assembly.url,
            label: Label::Phishing,
            vector: assembly.vector,
            rank: None,
            fetch_attempts: 0,
            decided_by: DecisionSource::DomainGate,
            diagnostics: assembly.diagnostics,
        }
    }
}
