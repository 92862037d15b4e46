//! Co-operative generation sites

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A generation site owned by the co-operative.
///
/// Serialized with the upper snake case names used throughout the API and
/// inside token ownership claims.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Site {
    GraigFatha,
    KirkHill,
    DerrilWater,
}

impl Site {
    pub const ALL: [Site; 3] = [Site::GraigFatha, Site::KirkHill, Site::DerrilWater];

    pub fn as_str(self) -> &'static str {
        match self {
            Site::GraigFatha => "GRAIG_FATHA",
            Site::KirkHill => "KIRK_HILL",
            Site::DerrilWater => "DERRIL_WATER",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Site::GraigFatha => "Graig Fatha",
            Site::KirkHill => "Kirk Hill",
            Site::DerrilWater => "Derril Water",
        }
    }
}

impl Display for Site {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GRAIG_FATHA" => Ok(Site::GraigFatha),
            "KIRK_HILL" => Ok(Site::KirkHill),
            "DERRIL_WATER" => Ok(Site::DerrilWater),
            _ => Err(format!("Invalid site: {}", s)),
        }
    }
}
