use serde::{Deserialize, Serialize};

use super::new_id;
use crate::{tenant_record, Dataset};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    pub phone: Option<String>,
    pub active: bool,
}

impl Branch {
    pub fn new(tenant_id: impl Into<String>, name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            tenant_id: tenant_id.into(),
            name: name.into(),
            city: city.into(),
            address: String::new(),
            phone: None,
            active: true,
        }
    }
}

tenant_record!(Branch, Dataset::Branches);
