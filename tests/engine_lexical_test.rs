use phishnet::engine::lexical::*;
use phishnet::engine::normalization::{normalize_url, UrlParts};
use phishnet::engine::LexicalFeatures;

// * Test Suite for Lexical Feature Extraction

fn parts(url: &str) -> UrlParts {
    UrlParts::parse(url)
}

#[test]
fn test_path_depth() {
    assert_eq!(path_depth(&parts("http://h/a/b/c")), 3);
    assert_eq!(path_depth(&parts("http://h/")), 0);
    assert_eq!(path_depth(&parts("http://h")), 0);
    // * Empty segments do not count
    assert_eq!(path_depth(&parts("http://h//a///b/")), 2);
}

#[test]
fn test_long_url_threshold() {
    let base = "http://example.com/";
    let url_53 = format!("{}{}", base, "a".repeat(53 - base.len()));
    let url_54 = format!("{}{}", base, "a".repeat(54 - base.len()));
    assert_eq!(url_53.len(), 53);
    assert!(!is_long_url(&url_53));
    assert!(is_long_url(&url_54));
}

#[test]
fn test_literal_ip_host() {
    assert!(has_literal_ip(&parts("http://192.168.1.1")));
    assert!(!has_literal_ip(&parts("http://example.com")));
    assert!(!has_literal_ip(&parts("http://")));
}

#[test]
fn test_at_sign_anywhere() {
    // * Insert '@' at every position of a clean URL
    let clean = "https://example.com/path/to/page";
    assert!(!has_at_sign(clean));
    for i in 0..=clean.len() {
        let mut injected = clean.to_string();
        injected.insert(i, '@');
        assert!(has_at_sign(&injected), "missed '@' at {}", i);
    }
}

#[test]
fn test_ip_with_at_in_path() {
    let url = normalize_url("http://192.168.1.1/a@b/c");
    let f = LexicalFeatures::extract(&url);
    assert!(f.has_literal_ip);
    assert!(f.has_at_sign);
    assert_eq!(f.path_depth, 2);
    assert!(f.is_non_https);
    assert!(!f.is_long_url);
    assert!(!f.has_double_redirect_marker);
    assert!(!f.uses_shortening_service);
    assert!(!f.host_has_hyphen);
}

#[test]
fn test_clean_https_url() {
    let f = LexicalFeatures::extract("https://example.com");
    assert_eq!(f, LexicalFeatures::default());
}

#[test]
fn test_shortener_url() {
    let f = LexicalFeatures::extract(&normalize_url("bit.ly/3xYz"));
    assert!(f.uses_shortening_service);
    assert!(f.is_non_https);
    assert_eq!(f.path_depth, 1);
}

#[test]
fn test_hyphenated_lookalike() {
    let f = LexicalFeatures::extract("https://paypal-secure-login.example.com/verify");
    assert!(f.host_has_hyphen);
    assert!(!f.is_non_https);
}

#[test]
fn test_unparseable_url_keeps_string_features() {
    let url = "http://bad host@//x.com";
    let f = LexicalFeatures::extract(url);
    assert!(f.has_at_sign);
    assert!(f.has_double_redirect_marker);
    assert!(f.is_non_https);
    // * Host and path features fall back to 0
    assert!(!f.has_literal_ip);
    assert_eq!(f.path_depth, 0);
    assert!(!f.host_has_hyphen);
}

#[test]
fn test_host_features_read_host_as_typed() {
    let f = LexicalFeatures::extract("http://bücher.de/");
    assert!(!f.host_has_hyphen);
    assert!(!f.has_literal_ip);

    // * Numeric host forms are not dotted IP literals
    assert!(!has_literal_ip(&parts("http://1234567/")));
    assert!(!has_literal_ip(&parts("http://0x7f.1/")));
    assert!(has_literal_ip(&parts("http://[2001:db8::1]:8080/")));
}
