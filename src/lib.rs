// feedlab library
//
// Test tooling for an external matching engine: synthetic order-flow feeds,
// byte-level run comparison and per-stage latency summaries

pub mod types;
pub mod generator;
pub mod feed;
pub mod validation;  // Feed invariant checks
pub mod compare;
pub mod latency;
pub mod config;
pub mod error;       // Unified error handling
pub mod progress;

/// Crate version constant
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export core types
pub use types::{Event, EventKind, Order, OrderId, Side};

// Re-export generator
pub use generator::{
    generate, EventStream, GeneratorError, GeneratorParams, GeneratorStats, Iteration, LiveOrders,
    OrderFlowGenerator,
};

// Re-export feed I/O
pub use feed::{read_feed_file, write_feed_file, FeedReader, FeedWriter, FEED_HEADER};

// Re-export error types
pub use error::{FeedError, FeedResult};

// Re-export validation types
pub use validation::{FeedValidator, ValidationCheck, ValidationLevel, ValidationResult};

// Re-export comparison
pub use compare::{compare_bytes, compare_files, compare_readers, ByteDiff, Comparison};

// Re-export latency analysis
pub use latency::{
    analyze, read_samples, read_samples_file, Histogram, LatencyReport, LatencySample,
    StageAnalysis, StageSummary,
};

// Re-export configuration
pub use config::{Config, ConfigError, GeneratorConfig, LatencyConfig, OutputConfig};

// Re-export progress widgets
pub use progress::{GenerationProgress, Spinner};
