//! Phishing URL detection.
//!
//! A URL is turned into a fixed 16-slot [`FeatureVector`] from three sources:
//! lexical structure of the URL string, a traffic rank lookup, and the content
//! of the live page. A pre-trained classifier maps the vector to a [`Label`].

pub mod classifier;
pub mod config;
pub mod detector;
pub mod engine;
pub mod network;
pub mod ops;
pub mod refinery;

pub use classifier::{Classifier, ClassifierError, Label};
pub use config::Settings;
pub use detector::{Classification, DecisionSource, DetectorError, PhishingDetector};
pub use engine::{Diagnostic, FeatureVector, FEATURE_NAMES};
