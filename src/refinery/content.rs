// * Content Extractor
// * HTML & JavaScript features computed from a fetched page. Pure given a FetchResult.

use crate::config::constants::MAX_BENIGN_REDIRECTS;
use crate::network::FetchResult;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::LazyLock;

// * Frame markers: iframe/frame elements or any frameborder attribute
static SELECTOR_FRAMES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("iframe, frame, [frameborder]").unwrap());

static SELECTOR_SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").unwrap());

// * Frame marker character set the classifier was trained against.
// * Any one of these characters in the body counts as a marker.
const FRAME_MARKER_CHARS: [char; 12] = ['<', 'i', 'f', 'r', 'a', 'm', 'e', '>', '|', 'B', 'o', 'd'];

// * Right mouse button check used to block the context menu
static RIGHT_CLICK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"event\.button ?== ?2").unwrap());

/// Values given to the four content features when the page could not be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFallback {
    /// Absence of evidence is risk: every content feature is 1.
    #[default]
    Suspicious,
    /// Every content feature is 0.
    #[serde(rename = "zero", alias = "zero-fill")]
    ZeroFill,
}

impl FromStr for ContentFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "suspicious" => Ok(ContentFallback::Suspicious),
            "zero" | "zero-fill" | "zerofill" => Ok(ContentFallback::ZeroFill),
            other => Err(format!("unknown content fallback: {}", other)),
        }
    }
}

/// How the iframe feature looks for frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IframeRule {
    /// Marker characters anywhere in the raw body. Matches the training data.
    #[default]
    Markers,
    /// Real `iframe`/`frame` elements or a `frameborder` attribute.
    Elements,
}

impl FromStr for IframeRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markers" => Ok(IframeRule::Markers),
            "elements" => Ok(IframeRule::Elements),
            other => Err(format!("unknown iframe rule: {}", other)),
        }
    }
}

/// Knobs of the content extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentRules {
    pub fallback: ContentFallback,
    pub iframe: IframeRule,
}

impl From<ContentFallback> for ContentRules {
    fn from(fallback: ContentFallback) -> Self {
        Self {
            fallback,
            ..Self::default()
        }
    }
}

/// The four HTML & JavaScript features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentFeatures {
    pub suspicious_iframe: bool,
    pub onmouseover_script: bool,
    pub disables_right_click: bool,
    pub excessive_redirects: bool,
}

impl ContentFeatures {
    pub fn extract(result: &FetchResult, rules: impl Into<ContentRules>) -> Self {
        let rules = rules.into();
        match result {
            FetchResult::Fetched {
                body,
                redirect_history_len,
            } => {
                let document = Html::parse_document(body);
                let suspicious_iframe = match rules.iframe {
                    IframeRule::Markers => lacks_frame_markers(body),
                    IframeRule::Elements => lacks_frame_elements(&document),
                };
                Self {
                    suspicious_iframe,
                    onmouseover_script: has_onmouseover_script(&document),
                    disables_right_click: disables_right_click(body),
                    excessive_redirects: excessive_redirect_history(*redirect_history_len),
                }
            }
            FetchResult::Unavailable => Self::fallback(rules.fallback),
        }
    }

    pub fn fallback(fallback: ContentFallback) -> Self {
        let flag = fallback == ContentFallback::Suspicious;
        Self {
            suspicious_iframe: flag,
            onmouseover_script: flag,
            disables_right_click: flag,
            excessive_redirects: flag,
        }
    }
}

// * Flag is set when the body carries NO frame marker character.
// ! Any markup at all contains one, so fetched HTML pages score 0 here.
pub fn lacks_frame_markers(body: &str) -> bool {
    !body.contains(FRAME_MARKER_CHARS)
}

// * Flag is set when the document has NO frame element or frameborder attribute
pub fn lacks_frame_elements(document: &Html) -> bool {
    document.select(&SELECTOR_FRAMES).next().is_none()
}

pub fn has_onmouseover_script(document: &Html) -> bool {
    document.select(&SELECTOR_SCRIPT).any(|script| {
        script
            .text()
            .any(|chunk| chunk.to_ascii_lowercase().contains("onmouseover"))
    })
}

// * Flag is set when the page does NOT test for the right mouse button
pub fn disables_right_click(body: &str) -> bool {
    !RIGHT_CLICK_REGEX.is_match(body)
}

pub fn excessive_redirect_history(redirect_history_len: usize) -> bool {
    redirect_history_len > MAX_BENIGN_REDIRECTS
}
