use crate::config::constants::USER_AGENT;
use crate::config::FetchSettings;
use crate::network::errors::{FetchError, NetworkError};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

// * A fetched page as seen by the content extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub final_url: String,
    pub status: u16,
    pub body: String,
    // * Number of redirect hops taken before the final response
    pub redirect_history_len: usize,
}

// * One fetch attempt against a target site.
// * Implementations report timeouts as FetchError::Timeout so the retry policy can tell them apart.
pub trait PageSource: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Page, FetchError>>;
}

// * The HTTP engine for target pages.
pub struct HttpPageSource {
    inner: Client,
    timeout: Duration,
    max_redirects: usize,
    max_body_bytes: usize,
}

impl HttpPageSource {
    // * Builds a client that never follows redirects on its own: hops are walked
    // * manually so the redirect history can be counted.
    pub fn new(settings: &FetchSettings) -> Result<Self, NetworkError> {
        let inner = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            inner,
            timeout: settings.timeout(),
            max_redirects: settings.max_redirects,
            max_body_bytes: settings.max_body_bytes,
        })
    }

    // * Fetches a URL, following redirects, bounded by the per-attempt timeout.
    pub async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        match tokio::time::timeout(self.timeout, self.follow(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        }
    }

    async fn follow(&self, url: &str) -> Result<Page, FetchError> {
        let mut current =
            Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        let mut hops = 0usize;

        loop {
            let resp = self
                .inner
                .get(current.clone())
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

            if resp.status().is_redirection() {
                if let Some(next) = redirect_target(&current, &resp) {
                    if hops >= self.max_redirects {
                        return Err(FetchError::TooManyRedirects(self.max_redirects));
                    }
                    tracing::debug!(from = %current, to = %next, hop = hops + 1, "Following redirect");
                    hops += 1;
                    current = next;
                    continue;
                }
            }

            let status = resp.status().as_u16();
            let body = self.read_body(resp).await?;

            return Ok(Page {
                final_url: current.to_string(),
                status,
                body,
                redirect_history_len: hops,
            });
        }
    }

    // * Reads at most max_body_bytes; content-type is ignored and bytes are decoded lossily.
    async fn read_body(&self, mut resp: Response) -> Result<String, FetchError> {
        let mut buf: Vec<u8> = Vec::new();

        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?
        {
            let remaining = self.max_body_bytes.saturating_sub(buf.len());
            if remaining == 0 {
                tracing::debug!(limit = self.max_body_bytes, "Body truncated");
                break;
            }
            let take = chunk.len().min(remaining);
            buf.extend_from_slice(&chunk[..take]);
        }

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl PageSource for HttpPageSource {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Page, FetchError>> {
        self.fetch(url).boxed()
    }
}

fn redirect_target(current: &Url, resp: &Response) -> Option<Url> {
    let location = resp.headers().get(LOCATION)?.to_str().ok()?;
    current.join(location).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_initialization() {
        let client = HttpPageSource::new(&FetchSettings::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_fails_without_network() {
        let client = HttpPageSource::new(&FetchSettings::default()).unwrap();
        let result = client.fetch("http://exa mple.com").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
