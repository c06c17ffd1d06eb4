// * The Refinery: features extracted from fetched page content

pub mod content;

pub use content::{ContentFallback, ContentFeatures, ContentRules, IframeRule};
