// * Configuration: fixed constants and runtime settings

pub mod constants;
pub mod settings;

pub use settings::{ApiKey, ConfigError, FetchSettings, RankSettings, Settings};
