// * Network layer: target page fetch with retries and the traffic rank lookup

pub mod client;
pub mod errors;
pub mod fetcher;
pub mod rank;
pub mod retry;

pub use client::{HttpPageSource, Page, PageSource};
pub use errors::{FetchError, NetworkError, RankError};
pub use fetcher::{ContentFetcher, FetchReport, FetchResult};
pub use rank::{RankLookup, RankService, SimilarWebClient, TrafficSignal};
pub use retry::RetryPolicy;
