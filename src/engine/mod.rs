pub mod assembler;
pub mod diagnostics;
pub mod lexical;
pub mod normalization;
pub mod vector;

pub use assembler::{Assembly, FeatureAssembler};
pub use diagnostics::{Diagnostic, Severity, Stage};
pub use lexical::LexicalFeatures;
pub use normalization::{normalize_url, UrlParts};
pub use vector::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};
