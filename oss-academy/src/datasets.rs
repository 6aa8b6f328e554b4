use std::fmt;
use std::str::FromStr;

use oss_core::DatasetName;
use thiserror::Error;

/// The closed set of datasets persisted per tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    Branches,
    Teachers,
    Students,
    Championships,
    Classes,
    Payments,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown dataset: {0}")]
pub struct UnknownDataset(pub String);

impl Dataset {
    /// Every dataset, in seeding order: records later in the list may
    /// reference records earlier in it.
    pub const ALL: [Dataset; 6] = [
        Dataset::Branches,
        Dataset::Teachers,
        Dataset::Students,
        Dataset::Championships,
        Dataset::Classes,
        Dataset::Payments,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Dataset::Branches => "branches",
            Dataset::Teachers => "teachers",
            Dataset::Students => "students",
            Dataset::Championships => "championships",
            Dataset::Classes => "classes",
            Dataset::Payments => "payments",
        }
    }

    pub const fn name(self) -> DatasetName {
        DatasetName::from_static(self.as_str())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = UnknownDataset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDataset(s.to_string()))
    }
}
