use thiserror::Error;

/// leadtrack error types
#[derive(Error, Debug)]
pub enum LeadtrackError {
    /// Record feed failed to produce data
    #[error("feed error: {0}")]
    Feed(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings load/save failed
    #[error("settings error: {0}")]
    Settings(String),

    /// Narrative generation failed
    #[error("insights error: {0}")]
    Insights(String),
}

/// Result type alias for leadtrack
pub type Result<T> = std::result::Result<T, LeadtrackError>;
