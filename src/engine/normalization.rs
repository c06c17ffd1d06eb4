use url::{Host, Url};

// * Scheme prepended to input that arrives without one
const DEFAULT_SCHEME_PREFIX: &str = "http://";

// * Normalizes raw user input into a URL that carries a scheme.
// *
// * Logic:
// * 1. Input already starting with http:// or https:// passes through untouched.
// * 2. Anything else gets http:// prepended.
// *
// ! No other rewriting: no trimming, no punycode, no trailing-slash changes.
// ! The lexical features are measured on exactly this string.
pub fn normalize_url(raw: &str) -> String {
    if has_http_scheme(raw) {
        raw.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, raw)
    }
}

fn has_http_scheme(raw: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        raw.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

// * Parsed components of a normalized URL.
// * Parsing never fails: an input the URL parser rejects keeps its scheme
// * (read from the prefix) but has no host and an empty path.
// ! The parser rewrites hosts (punycode, numeric IPv4 forms). Host features
// ! read `raw_host`, the host exactly as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlParts {
    scheme: String,
    host: Option<Host<String>>,
    raw_host: Option<String>,
    path: String,
    valid: bool,
}

impl UrlParts {
    pub fn parse(url: &str) -> Self {
        match Url::parse(url) {
            Ok(parsed) => Self {
                scheme: parsed.scheme().to_string(),
                host: parsed.host().map(|h| h.to_owned()),
                raw_host: raw_authority_host(url),
                path: parsed.path().to_string(),
                valid: true,
            },
            Err(e) => {
                tracing::debug!(url = url, error = %e, "URL did not parse, using prefix scheme only");
                Self {
                    scheme: prefix_scheme(url),
                    host: None,
                    raw_host: None,
                    path: String::new(),
                    valid: false,
                }
            }
        }
    }

    // * False when the URL parser rejected the input
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> Option<&Host<String>> {
        self.host.as_ref()
    }

    // * Host as text; IPv6 literals are rendered without brackets
    pub fn host_str(&self) -> Option<String> {
        self.host.as_ref().map(|host| match host {
            Host::Domain(domain) => domain.clone(),
            Host::Ipv4(addr) => addr.to_string(),
            Host::Ipv6(addr) => addr.to_string(),
        })
    }

    // * Host text as it appears in the input: no userinfo, no port, no brackets
    pub fn raw_host(&self) -> Option<&str> {
        self.raw_host.as_deref().filter(|h| !h.is_empty())
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

// * Authority runs from "://" to the first '/', '?' or '#'.
fn raw_authority_host(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("://")?;
    let authority = rest
        .find(['/', '?', '#'])
        .map_or(rest, |end| &rest[..end]);
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);

    let host = match host_port.strip_prefix('[') {
        Some(bracketed) => bracketed.split_once(']').map_or(bracketed, |(h, _)| h),
        None => host_port.split(':').next().unwrap_or_default(),
    };
    Some(host.to_string())
}

fn prefix_scheme(url: &str) -> String {
    url.split_once("://")
        .map(|(scheme, _)| scheme.to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_scheme_fallback() {
        assert_eq!(prefix_scheme("HTTPS://bad host"), "https");
        assert_eq!(prefix_scheme("no-scheme"), "");
    }

    #[test]
    fn test_unparseable_keeps_scheme() {
        let parts = UrlParts::parse("http://exa mple.com/a/b");
        assert!(!parts.is_valid());
        assert_eq!(parts.scheme(), "http");
        assert!(parts.host().is_none());
        assert_eq!(parts.path(), "");
    }

    #[test]
    fn test_raw_host_strips_userinfo_and_port() {
        assert_eq!(
            raw_authority_host("http://user:pw@Sub.Example.com:8080/x?y#z").as_deref(),
            Some("Sub.Example.com")
        );
        assert_eq!(raw_authority_host("http://[::1]:80/").as_deref(), Some("::1"));
        assert_eq!(raw_authority_host("http://a.com?q=b/c").as_deref(), Some("a.com"));
        assert_eq!(raw_authority_host("no-scheme"), None);
    }

    #[test]
    fn test_raw_host_keeps_unicode() {
        let parts = UrlParts::parse("http://bücher.de/");
        assert_eq!(parts.host_str().as_deref(), Some("xn--bcher-kva.de"));
        assert_eq!(parts.raw_host(), Some("bücher.de"));
    }

    #[test]
    fn test_ipv6_host_str_has_no_brackets() {
        let parts = UrlParts::parse("http://[::1]:8080/x");
        assert_eq!(parts.host_str().as_deref(), Some("::1"));
    }
}
