//! oss-academy: the academy's datasets and their starter data.
//!
//! - [`Dataset`]: the closed set of logical datasets persisted per tenant
//! - [`models`]: record shapes (students, teachers, branches, ...)
//! - [`SampleSet`]: starter records stamped with a tenant id
//! - [`SeedOrchestrator`]: writes the starter records exactly once per tenant

pub mod datasets;
pub mod models;
pub mod samples;
pub mod seed;

pub use datasets::{Dataset, UnknownDataset};
pub use models::{
    Belt, Branch, Championship, ClassSession, Payment, PaymentStatus, Student, Teacher,
};
pub use samples::SampleSet;
pub use seed::{SeedOrchestrator, SeedOutcome, SeedPolicy};
