// * Feature Vector Assembler
// * Normalize -> lexical features -> (rank lookup || page fetch) -> content features -> vector.
// * The join on rank + fetch is the only synchronization point of a request.

use crate::engine::diagnostics::{Diagnostic, Stage};
use crate::engine::lexical::LexicalFeatures;
use crate::engine::normalization::{normalize_url, UrlParts};
use crate::engine::vector::*;
use crate::network::{ContentFetcher, FetchResult, RankLookup};
use crate::refinery::{ContentFeatures, ContentRules};

/// Everything the assembler learned about one URL.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// The normalized URL all features were measured on
    pub url: String,
    pub vector: FeatureVector,
    /// Rank reported by the ranking service, if the lookup succeeded
    pub rank: Option<u64>,
    pub fetch_attempts: u32,
    pub page_fetched: bool,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct FeatureAssembler {
    rank: RankLookup,
    fetcher: ContentFetcher,
    rules: ContentRules,
}

impl FeatureAssembler {
    pub fn new(rank: RankLookup, fetcher: ContentFetcher, rules: impl Into<ContentRules>) -> Self {
        Self {
            rank,
            fetcher,
            rules: rules.into(),
        }
    }

    pub async fn assemble(&self, raw_url: &str) -> Assembly {
        let mut diagnostics = Vec::new();

        let url = normalize_url(raw_url);
        if raw_url.trim().is_empty() {
            diagnostics.push(Diagnostic::warning(
                Stage::Normalize,
                "Empty URL, lexical features take their defaults",
            ));
        }

        // * Lexical features need no I/O and are settled before any request goes out
        let parts = UrlParts::parse(&url);
        let lexical = LexicalFeatures::extract_with(&url, &parts);

        // ! Nothing to look up or fetch without a host: no rank quota, no request
        if !parts.is_valid() {
            if !raw_url.trim().is_empty() {
                diagnostics.push(Diagnostic::warning(
                    Stage::Normalize,
                    format!("Could not parse {}, host and path features are 0", url),
                ));
            }
            return self.offline(url, &lexical, diagnostics);
        }

        let (traffic, fetch) = tokio::join!(self.rank.low_traffic(&url), self.fetcher.fetch(&url));

        let content = ContentFeatures::extract(&fetch.result, self.rules);
        let vector = build_vector(&lexical, traffic.low_traffic, &content);

        diagnostics.extend(traffic.diagnostic);
        diagnostics.extend(fetch.diagnostics);

        tracing::debug!(url = %url, vector = %vector, attempts = fetch.attempts, "Assembled feature vector");

        Assembly {
            url,
            vector,
            rank: traffic.rank,
            fetch_attempts: fetch.attempts,
            page_fetched: fetch.result.is_fetched(),
            diagnostics,
        }
    }

    /// Assembles without any network call: unknown rank, page unavailable.
    pub fn assemble_offline(&self, raw_url: &str) -> Assembly {
        let url = normalize_url(raw_url);
        let lexical = LexicalFeatures::extract(&url);
        self.offline(url, &lexical, Vec::new())
    }

    // * Same defaults a failed rank lookup and an exhausted fetch would produce
    fn offline(&self, url: String, lexical: &LexicalFeatures, diagnostics: Vec<Diagnostic>) -> Assembly {
        let content = ContentFeatures::extract(&FetchResult::Unavailable, self.rules);
        let vector = build_vector(lexical, true, &content);

        tracing::debug!(url = %url, vector = %vector, "Assembled feature vector without network");

        Assembly {
            url,
            vector,
            rank: None,
            fetch_attempts: 0,
            page_fetched: false,
            diagnostics,
        }
    }
}

// * Writes every slot by name. The DNS slots are stubs and stay 0.
pub fn build_vector(
    lexical: &LexicalFeatures,
    low_traffic: bool,
    content: &ContentFeatures,
) -> FeatureVector {
    let mut v = FeatureVector::new();

    v.set_flag(FEAT_HAVE_IP, lexical.has_literal_ip);
    v.set_flag(FEAT_HAVE_AT, lexical.has_at_sign);
    v.set_flag(FEAT_URL_LENGTH, lexical.is_long_url);
    v.set(FEAT_URL_DEPTH, lexical.path_depth);
    v.set_flag(FEAT_REDIRECTION, lexical.has_double_redirect_marker);
    v.set_flag(FEAT_HTTPS_DOMAIN, lexical.is_non_https);
    v.set_flag(FEAT_TINY_URL, lexical.uses_shortening_service);
    v.set_flag(FEAT_PREFIX_SUFFIX, lexical.host_has_hyphen);

    v.set(FEAT_DNS_RECORD, 0);
    v.set(FEAT_DOMAIN_AGE, 0);
    v.set(FEAT_DOMAIN_END, 0);
    v.set_flag(FEAT_WEB_TRAFFIC, low_traffic);

    v.set_flag(FEAT_IFRAME, content.suspicious_iframe);
    v.set_flag(FEAT_MOUSE_OVER, content.onmouseover_script);
    v.set_flag(FEAT_RIGHT_CLICK, content.disables_right_click);
    v.set_flag(FEAT_WEB_FORWARDS, content.excessive_redirects);

    v
}
