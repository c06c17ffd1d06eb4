// * Lexical Extractor
// * Structural features computed from the URL string alone. No I/O.

use crate::config::constants::{
    LONG_URL_THRESHOLD, REDIRECT_MARKER_MIN_INDEX, SHORTENING_SERVICES,
};
use crate::engine::normalization::UrlParts;
use std::net::IpAddr;

/// The eight address-bar features of a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexicalFeatures {
    pub has_literal_ip: bool,
    pub has_at_sign: bool,
    pub is_long_url: bool,
    pub path_depth: u32,
    pub has_double_redirect_marker: bool,
    pub is_non_https: bool,
    pub uses_shortening_service: bool,
    pub host_has_hyphen: bool,
}

impl LexicalFeatures {
    /// Computes every lexical feature of a normalized URL.
    pub fn extract(url: &str) -> Self {
        Self::extract_with(url, &UrlParts::parse(url))
    }

    /// Same as [`LexicalFeatures::extract`] with components already parsed.
    pub fn extract_with(url: &str, parts: &UrlParts) -> Self {
        Self {
            has_literal_ip: has_literal_ip(parts),
            has_at_sign: has_at_sign(url),
            is_long_url: is_long_url(url),
            path_depth: path_depth(parts),
            has_double_redirect_marker: has_double_redirect_marker(url),
            is_non_https: is_non_https(parts),
            uses_shortening_service: uses_shortening_service(parts),
            host_has_hyphen: host_has_hyphen(parts),
        }
    }
}

// * True iff the host, as typed, is a dotted-quad IPv4 or an IPv6 literal.
// ! Numeric forms the URL parser also accepts ("1234567", "0x7f.1") do not count.
pub fn has_literal_ip(parts: &UrlParts) -> bool {
    parts.raw_host().is_some_and(is_ip_literal)
}

/// Total check for an IP literal; bracketed IPv6 is accepted.
pub fn is_ip_literal(host: &str) -> bool {
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    host.parse::<IpAddr>().is_ok()
}

pub fn has_at_sign(url: &str) -> bool {
    url.contains('@')
}

// * Length in characters, not bytes
pub fn is_long_url(url: &str) -> bool {
    url.chars().count() >= LONG_URL_THRESHOLD
}

pub fn path_depth(parts: &UrlParts) -> u32 {
    parts.path().split('/').filter(|s| !s.is_empty()).count() as u32
}

// * An embedded "//" past the scheme delimiter signals a redirect.
// * "https://" puts its own "//" at index 6, so only index > 7 counts.
pub fn has_double_redirect_marker(url: &str) -> bool {
    url.rfind("//")
        .is_some_and(|pos| pos > REDIRECT_MARKER_MIN_INDEX)
}

pub fn is_non_https(parts: &UrlParts) -> bool {
    parts.scheme() != "https"
}

// * Host equals a denylisted shortener or is one of its subdomains
pub fn uses_shortening_service(parts: &UrlParts) -> bool {
    let Some(host) = parts.raw_host() else {
        return false;
    };
    let host = host.to_ascii_lowercase();

    SHORTENING_SERVICES.iter().any(|service| {
        let service = service.to_ascii_lowercase();
        host == service
            || host
                .strip_suffix(service.as_str())
                .is_some_and(|rest| rest.ends_with('.'))
    })
}

pub fn host_has_hyphen(parts: &UrlParts) -> bool {
    parts.raw_host().is_some_and(|host| host.contains('-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(url: &str) -> UrlParts {
        UrlParts::parse(url)
    }

    #[test]
    fn test_ip_literal_total() {
        assert!(is_ip_literal("10.0.0.1"));
        assert!(is_ip_literal("[2001:db8::1]"));
        assert!(is_ip_literal("2001:db8::1"));
        assert!(!is_ip_literal("example.com"));
        assert!(!is_ip_literal(""));
    }

    #[test]
    fn test_literal_ip_ignores_port() {
        assert!(has_literal_ip(&parts("http://10.1.2.3:8080/login")));
        assert!(has_literal_ip(&parts("http://[::1]/")));
    }

    #[test]
    fn test_ip_in_path_is_not_ip_host() {
        assert!(!has_literal_ip(&parts("http://example.com/192.168.1.1")));
    }

    #[test]
    fn test_redirect_marker_positions() {
        assert!(!has_double_redirect_marker("https://example.com"));
        assert!(!has_double_redirect_marker("http://example.com"));
        assert!(has_double_redirect_marker("http://example.com//evil.com"));
        assert!(has_double_redirect_marker(
            "https://a.com/redirect?to=http://evil.com"
        ));
        assert!(!has_double_redirect_marker("no slashes here"));
    }

    #[test]
    fn test_shortening_service_matches_host_only() {
        assert!(uses_shortening_service(&parts("http://bit.ly/abc")));
        assert!(uses_shortening_service(&parts("https://www.bit.ly/abc")));
        assert!(uses_shortening_service(&parts("http://BudURL.com/x")));
        assert!(uses_shortening_service(&parts("http://budurl.com/x")));
        // * "t.co" must not match hosts that merely contain it
        assert!(!uses_shortening_service(&parts("https://microsoft.com")));
        assert!(!uses_shortening_service(&parts("https://example.com/bit.ly")));
        assert!(!uses_shortening_service(&parts("https://notbit.ly")));
    }

    #[test]
    fn test_numeric_hosts_are_not_ip_literals() {
        assert!(!has_literal_ip(&parts("http://1234567/")));
        assert!(!has_literal_ip(&parts("http://0x7f.1/")));
    }

    #[test]
    fn test_unicode_host_has_no_hyphen() {
        assert!(!host_has_hyphen(&parts("http://bücher.de/")));
        assert!(host_has_hyphen(&parts("http://bü-cher.de/")));
    }

    #[test]
    fn test_hyphen_in_host_only() {
        assert!(host_has_hyphen(&parts("http://secure-login.example.com")));
        assert!(!host_has_hyphen(&parts("http://example.com/secure-login")));
    }

    #[test]
    fn test_scheme_checks() {
        assert!(!is_non_https(&parts("https://example.com")));
        assert!(is_non_https(&parts("http://example.com")));
        assert!(is_non_https(&parts("ftp://example.com")));
    }

    #[test]
    fn test_long_url_counts_chars() {
        // * 53 multi-byte characters is still short
        let url = "é".repeat(53);
        assert!(!is_long_url(&url));
        assert!(is_long_url(&format!("{}x", url)));
    }
}
