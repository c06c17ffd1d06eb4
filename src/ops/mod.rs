// * Operations
// * Structured logging and metrics shared by every stage of the pipeline

pub mod telemetry;

pub use telemetry::{
    get_metrics_string, init_tracing, init_tracing_pretty, init_tracing_with_level,
    observe_fetch_duration, record_classification, record_fetch_attempt, record_rank_lookup,
};
