use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::keys::DatasetName;

/// A record that lives in a tenant-scoped collection.
///
/// The store is generic over record shape; all it needs is the dataset the
/// type belongs to plus the `id` and `tenant_id` fields every record carries.
pub trait TenantRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Dataset this record type is stored under.
    const DATASET: DatasetName;

    fn id(&self) -> &str;

    fn tenant_id(&self) -> &str;
}
