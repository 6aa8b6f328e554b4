use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::new_id;
use crate::{tenant_record, Dataset};

/// Jiu-jitsu belt ranks, adult and kids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Belt {
    White,
    Grey,
    Yellow,
    Orange,
    Green,
    Blue,
    Purple,
    Brown,
    Black,
}

impl Belt {
    pub fn is_kids(self) -> bool {
        matches!(self, Belt::Grey | Belt::Yellow | Belt::Orange | Belt::Green)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub email: String,
    pub belt: Belt,
    pub branch_id: String,
    #[serde(default)]
    pub specialties: Vec<String>,
}

impl Teacher {
    pub fn new(
        tenant_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        belt: Belt,
        branch_id: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            tenant_id: tenant_id.into(),
            name: name.into(),
            email: email.into(),
            belt,
            branch_id: branch_id.into(),
            specialties: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub email: Option<String>,
    pub birth_date: NaiveDate,
    pub belt: Belt,
    pub stripes: u8,
    pub branch_id: String,
    pub teacher_id: Option<String>,
    pub enrolled_on: NaiveDate,
    pub active: bool,
}

impl Student {
    /// Stripes go from 0 to 4 on every belt.
    pub const MAX_STRIPES: u8 = 4;

    pub fn new(
        tenant_id: impl Into<String>,
        name: impl Into<String>,
        birth_date: NaiveDate,
        belt: Belt,
        branch_id: impl Into<String>,
        enrolled_on: NaiveDate,
    ) -> Self {
        Self {
            id: new_id(),
            tenant_id: tenant_id.into(),
            name: name.into(),
            email: None,
            birth_date,
            belt,
            stripes: 0,
            branch_id: branch_id.into(),
            teacher_id: None,
            enrolled_on,
            active: true,
        }
    }

    pub fn with_stripes(mut self, stripes: u8) -> Self {
        self.stripes = stripes.min(Self::MAX_STRIPES);
        self
    }
}

tenant_record!(Teacher, Dataset::Teachers);
tenant_record!(Student, Dataset::Students);
