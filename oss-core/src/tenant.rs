//! Core multi-tenant types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{StoreError, StoreResult};

/// An opaque tenant identifier handed over by the auth/session layer.
///
/// A `TenantId` is never empty: every storage key is built from one, and
/// an empty id would collapse all tenants onto a shared suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Validate and wrap a tenant id. Empty and whitespace-only ids are rejected.
    pub fn new<S: Into<String>>(tenant: S) -> StoreResult<Self> {
        let tenant = tenant.into();
        if tenant.trim().is_empty() {
            return Err(StoreError::EmptyTenant);
        }
        Ok(Self(tenant))
    }

    /// Convenience for optional ids coming from the auth layer, where
    /// "no tenant" may arrive as `None` or as an empty string.
    pub fn from_optional(tenant: Option<&str>) -> Option<Self> {
        tenant.and_then(|t| Self::new(t).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for TenantId {
    type Error = StoreError;

    fn try_from(value: &str) -> StoreResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for TenantId {
    type Error = StoreError;

    fn try_from(value: String) -> StoreResult<Self> {
        Self::new(value)
    }
}

// Deserialization goes through the same validation as `new`.
impl<'de> Deserialize<'de> for TenantId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_blank_ids() {
        assert!(matches!(TenantId::new(""), Err(StoreError::EmptyTenant)));
        assert!(matches!(TenantId::new("   "), Err(StoreError::EmptyTenant)));
        assert_eq!(TenantId::new("t-1").unwrap().as_str(), "t-1");
    }

    #[test]
    fn optional_ids_treat_empty_as_absent() {
        assert_eq!(TenantId::from_optional(None), None);
        assert_eq!(TenantId::from_optional(Some("")), None);
        assert_eq!(
            TenantId::from_optional(Some("academy-9")),
            Some(TenantId::new("academy-9").unwrap())
        );
    }

    #[test]
    fn deserializing_an_empty_id_fails() {
        let ok: TenantId = serde_json::from_str("\"t-2\"").unwrap();
        assert_eq!(ok.to_string(), "t-2");
        assert!(serde_json::from_str::<TenantId>("\"\"").is_err());
    }
}
