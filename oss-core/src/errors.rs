use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised inside the tenant store.
///
/// These stay inside the subsystem: the boundary operations (bindings,
/// seeding, bootstrap) absorb them into defaults, outcomes and log lines.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Tenant id must not be empty")]
    EmptyTenant,

    #[error("Invalid dataset name: {0:?}")]
    InvalidDataset(String),

    #[error("Storage quota exceeded: {needed} bytes (quota: {quota})")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for failures of the underlying storage facility, as opposed
    /// to bad input.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. } | Self::Io(_))
    }
}
