//! Services for data loading, aggregation, and narrative generation

pub mod aggregator;
pub mod breakdown;
pub mod feed;
pub mod filter;
pub mod insights;
pub mod settings;

pub use aggregator::Aggregator;
pub use feed::{MockFeed, RecordFeed};
pub use filter::{normalize_source, SourceFilter};
pub use insights::InsightsService;
pub use settings::{Settings, ThemePreference};
