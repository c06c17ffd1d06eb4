//! Fixed-layout feature vector handed to the classifier.
//!
//! The slot order is the training schema of the classifier. Reordering,
//! inserting or removing a slot silently corrupts every prediction, so a
//! layout change must bump [`FEATURE_SCHEMA_VERSION`] and ship a retrained
//! model artifact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the slot layout below. Model artifacts declare the version they were trained on.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Number of slots.
pub const FEATURE_COUNT: usize = 16;

// ── Address bar (0-7) ──
pub const FEAT_HAVE_IP: usize = 0;
pub const FEAT_HAVE_AT: usize = 1;
pub const FEAT_URL_LENGTH: usize = 2;
pub const FEAT_URL_DEPTH: usize = 3;
pub const FEAT_REDIRECTION: usize = 4;
pub const FEAT_HTTPS_DOMAIN: usize = 5;
pub const FEAT_TINY_URL: usize = 6;
pub const FEAT_PREFIX_SUFFIX: usize = 7;

// ── Domain (8-11) ──
pub const FEAT_DNS_RECORD: usize = 8;
pub const FEAT_DOMAIN_AGE: usize = 9;
pub const FEAT_DOMAIN_END: usize = 10;
pub const FEAT_WEB_TRAFFIC: usize = 11;

// ── HTML & JavaScript (12-15) ──
pub const FEAT_IFRAME: usize = 12;
pub const FEAT_MOUSE_OVER: usize = 13;
pub const FEAT_RIGHT_CLICK: usize = 14;
pub const FEAT_WEB_FORWARDS: usize = 15;

/// Column names of the training set, in slot order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Have_IP",
    "Have_At",
    "URL_Length",
    "URL_Depth",
    "Redirection",
    "https_Domain",
    "TinyURL",
    "Prefix/Suffix",
    "DNS_Record",
    "Domain_Age",
    "Domain_End",
    "Web_Traffic",
    "iFrame",
    "Mouse_Over",
    "Right_Click",
    "Web_Forwards",
];

/// Sixteen non-negative integers; every slot is 0/1 except [`FEAT_URL_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([u32; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: [u32; FEATURE_COUNT]) -> Self {
        Self(slots)
    }

    pub fn set(&mut self, slot: usize, value: u32) {
        self.0[slot] = value;
    }

    pub fn set_flag(&mut self, slot: usize, flag: bool) {
        self.0[slot] = u32::from(flag);
    }

    pub fn get(&self, slot: usize) -> u32 {
        self.0[slot]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Slot values as model inputs.
    pub fn to_f64(&self) -> [f64; FEATURE_COUNT] {
        self.0.map(f64::from)
    }

    /// Pairs each slot with its training column name.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_indices_are_dense_and_ordered() {
        let slots = [
            FEAT_HAVE_IP,
            FEAT_HAVE_AT,
            FEAT_URL_LENGTH,
            FEAT_URL_DEPTH,
            FEAT_REDIRECTION,
            FEAT_HTTPS_DOMAIN,
            FEAT_TINY_URL,
            FEAT_PREFIX_SUFFIX,
            FEAT_DNS_RECORD,
            FEAT_DOMAIN_AGE,
            FEAT_DOMAIN_END,
            FEAT_WEB_TRAFFIC,
            FEAT_IFRAME,
            FEAT_MOUSE_OVER,
            FEAT_RIGHT_CLICK,
            FEAT_WEB_FORWARDS,
        ];
        for (expected, slot) in slots.iter().enumerate() {
            assert_eq!(expected, *slot);
        }
    }

    #[test]
    fn test_display_and_json_are_flat() {
        let mut v = FeatureVector::new();
        v.set(FEAT_URL_DEPTH, 3);
        v.set_flag(FEAT_WEB_FORWARDS, true);
        assert_eq!(v.to_string(), "[0,0,0,3,0,0,0,0,0,0,0,0,0,0,0,1]");
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            "[0,0,0,3,0,0,0,0,0,0,0,0,0,0,0,1]"
        );
    }

    #[test]
    fn test_named_pairs_follow_slot_order() {
        let v = FeatureVector::from_slots([1; FEATURE_COUNT]);
        let names: Vec<&str> = v.named().map(|(n, _)| n).collect();
        assert_eq!(names.first(), Some(&"Have_IP"));
        assert_eq!(names.last(), Some(&"Web_Forwards"));
        assert_eq!(names.len(), FEATURE_COUNT);
    }
}
