use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::new_id;
use crate::{tenant_record, Dataset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

/// A monthly membership charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub tenant_id: String,
    pub student_id: String,
    pub amount_cents: u64,
    pub currency: String,
    pub due_on: NaiveDate,
    pub status: PaymentStatus,
}

impl Payment {
    pub fn new(
        tenant_id: impl Into<String>,
        student_id: impl Into<String>,
        amount_cents: u64,
        due_on: NaiveDate,
        status: PaymentStatus,
    ) -> Self {
        Self {
            id: new_id(),
            tenant_id: tenant_id.into(),
            student_id: student_id.into(),
            amount_cents,
            currency: "BRL".to_string(),
            due_on,
            status,
        }
    }
}

tenant_record!(Payment, Dataset::Payments);
