use std::fmt;

use serde::{Deserialize, Serialize};

/// Taxing authority a parameter table or program belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Jurisdiction {
    #[serde(rename = "QC")]
    Quebec,
    #[serde(rename = "CA")]
    Federal,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 2] = [Jurisdiction::Quebec, Jurisdiction::Federal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quebec => "QC",
            Self::Federal => "CA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "QC" => Some(Self::Quebec),
            "CA" => Some(Self::Federal),
            _ => None,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
