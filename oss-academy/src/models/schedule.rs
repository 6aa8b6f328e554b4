use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::new_id;
use crate::{tenant_record, Dataset};

/// A recurring weekly class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    pub id: String,
    pub tenant_id: String,
    pub title: String,
    pub branch_id: String,
    pub teacher_id: String,
    pub weekday: Weekday,
    /// Local start time, `HH:MM`.
    pub starts_at: String,
    pub duration_minutes: u16,
    pub capacity: u16,
}

impl ClassSession {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: impl Into<String>,
        title: impl Into<String>,
        branch_id: impl Into<String>,
        teacher_id: impl Into<String>,
        weekday: Weekday,
        starts_at: impl Into<String>,
        duration_minutes: u16,
        capacity: u16,
    ) -> Self {
        Self {
            id: new_id(),
            tenant_id: tenant_id.into(),
            title: title.into(),
            branch_id: branch_id.into(),
            teacher_id: teacher_id.into(),
            weekday,
            starts_at: starts_at.into(),
            duration_minutes,
            capacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Championship {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub location: String,
    pub date: NaiveDate,
    pub registration_deadline: NaiveDate,
    #[serde(default)]
    pub registered_student_ids: Vec<String>,
}

impl Championship {
    pub fn new(
        tenant_id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        date: NaiveDate,
        registration_deadline: NaiveDate,
    ) -> Self {
        Self {
            id: new_id(),
            tenant_id: tenant_id.into(),
            name: name.into(),
            location: location.into(),
            date,
            registration_deadline,
            registered_student_ids: Vec::new(),
        }
    }

    pub fn registration_open(&self, today: NaiveDate) -> bool {
        today <= self.registration_deadline
    }
}

tenant_record!(ClassSession, Dataset::Classes);
tenant_record!(Championship, Dataset::Championships);
