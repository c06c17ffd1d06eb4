// * Configuration Constants
// * Central location for fixed thresholds, timeouts, and denylists

// * Per-attempt timeout for the target page fetch, in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 5;

// * Total attempts for the target page fetch (timeouts only are retried)
pub const FETCH_MAX_ATTEMPTS: u32 = 3;

// * Redirect hops followed before the fetch gives up on the chain
pub const MAX_REDIRECTS: usize = 10;

// * Body bytes kept from the target page; the rest is discarded
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

// * URLs at or above this many characters count as long
pub const LONG_URL_THRESHOLD: usize = 54;

// * Index of the last "//" must exceed this to count as an embedded redirect
pub const REDIRECT_MARKER_MIN_INDEX: usize = 7;

// * Redirect history longer than this is excessive
pub const MAX_BENIGN_REDIRECTS: usize = 2;

// * Ranks strictly below this threshold set the traffic feature
pub const RANK_THRESHOLD: u64 = 100_000;

// * Timeout for the ranking service call, in seconds
pub const RANK_TIMEOUT_SECS: u64 = 5;

// * Ranking service defaults
pub const RANK_ENDPOINT: &str = "https://similar-web.p.rapidapi.com/get-analysis";
pub const RANK_API_HOST: &str = "similar-web.p.rapidapi.com";

// * Default classifier artifact location
pub const MODEL_PATH: &str = "models/phishnet-v1.json";

// * User agent sent with every outbound request
pub const USER_AGENT: &str = concat!("phishnet/", env!("CARGO_PKG_VERSION"));

// * Known URL shortening services.
// ! Data, not logic: kept exactly as the classifier's training pipeline listed it,
// ! duplicates included. Entries without a TLD never match a full host.
pub const SHORTENING_SERVICES: &[&str] = &[
    "bit.ly", "goo.gl", "shorte.st", "go2l.ink", "x.co", "ow.ly", "t.co", "tinyurl", "tr.im",
    "is.gd", "cli.gs", "yfrog.com", "migre.me", "ff.im", "tiny.cc", "url4.eu", "twit.ac",
    "su.pr", "twurl.nl", "snipurl.com", "short.to", "BudURL.com", "ping.fm", "post.ly",
    "Just.as", "bkite.com", "snipr.com", "fic.kr", "loopt.us", "doiop.com", "short.ie",
    "kl.am", "wp.me", "rubyurl.com", "om.ly", "to.ly", "bit.do", "t.co", "lnkd.in", "db.tt",
    "qr.ae", "adf.ly", "goo.gl", "bitly.com", "cur.lv", "tinyurl.com", "ow.ly", "bit.ly",
    "ity.im", "q.gs", "is.gd", "po.st", "bc.vc", "twitthis.com", "u.to", "j.mp",
    "buzurl.com", "cutt.us", "u.bb", "yourls.org", "x.co", "prettylinkpro.com", "scrnch.me",
    "filoops.info", "vzturl.com", "qr.net", "1url.com", "tweez.me", "v.gd", "tr.im",
    "link.zip.net",
];
