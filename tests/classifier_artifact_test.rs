use phishnet::classifier::{load_classifier, ClassifierError};
use phishnet::engine::vector::{FeatureVector, FEAT_HAVE_IP, FEAT_HAVE_AT, FEAT_TINY_URL};
use phishnet::Label;
use std::path::PathBuf;

// * Test Suite for the bundled classifier artifact

fn bundled() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/phishnet-v1.json")
}

#[test]
fn test_bundled_artifact_loads() {
    assert!(load_classifier(&bundled()).is_ok());
}

#[test]
fn test_bundled_artifact_polarity() {
    let classifier = load_classifier(&bundled()).unwrap();

    let clean = FeatureVector::from_slots([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 1, 0]);
    assert_eq!(classifier.predict(&clean).unwrap(), Label::Benign);

    let mut shady = clean;
    shady.set_flag(FEAT_HAVE_IP, true);
    shady.set_flag(FEAT_HAVE_AT, true);
    shady.set_flag(FEAT_TINY_URL, true);
    assert_eq!(classifier.predict(&shady).unwrap(), Label::Phishing);
}

#[test]
fn test_missing_artifact_is_io_error() {
    let err = load_classifier(&bundled().with_file_name("missing.json")).err().unwrap();
    assert!(matches!(err, ClassifierError::Io { .. }));
}
