//! Record shapes for the academy datasets.
//!
//! Field names serialize in camelCase (`tenantId`, `branchId`, ...) to
//! match the records the web client already keeps in storage.

mod branch;
mod payment;
mod people;
mod schedule;

pub use branch::Branch;
pub use payment::{Payment, PaymentStatus};
pub use people::{Belt, Student, Teacher};
pub use schedule::{Championship, ClassSession};

/// Implement [`oss_core::TenantRecord`] for a record with `id` and
/// `tenant_id` string fields.
#[macro_export]
macro_rules! tenant_record {
    ($ty:ty, $dataset:expr) => {
        impl oss_core::TenantRecord for $ty {
            const DATASET: oss_core::DatasetName = $dataset.name();

            fn id(&self) -> &str {
                &self.id
            }

            fn tenant_id(&self) -> &str {
                &self.tenant_id
            }
        }
    };
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
