/// Change notifications emitted by [`crate::TenantStore`] after a write or
/// removal has been applied to the storage facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Written { key: String },
    Removed { key: String },
}

impl StoreEvent {
    pub fn key(&self) -> &str {
        match self {
            Self::Written { key } | Self::Removed { key } => key,
        }
    }
}
