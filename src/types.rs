use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Unique catalog key of an orbital system, e.g. `"lunar-gateway"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(pub String);

/// Launch-vehicle class as keyed in a [`crate::config::RateTable`].
/// The set of valid classes belongs to the rate table, not to this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchVehicle(pub String);

impl LaunchVehicle {
    pub fn new(name: impl Into<String>) -> Self {
        LaunchVehicle(name.into())
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Display for LaunchVehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// BOM line-item category. `Shielding` covers MMOD and radiation protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BomCategory {
    Structure,
    Power,
    Thermal,
    Propulsion,
    Avionics,
    LifeSupport,
    Communications,
    Payload,
    Shielding,
    Docking,
    Robotics,
    Software,
}

/// Deserializes through [`FromStr`], so an unknown label carries the same
/// `InvalidInput` message wherever it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum SystemCategory {
    Habitat,
    Manufacturing,
    Infrastructure,
    Power,
    Services,
    Science,
}

impl SystemCategory {
    pub const ALL: [SystemCategory; 6] = [
        SystemCategory::Habitat,
        SystemCategory::Manufacturing,
        SystemCategory::Infrastructure,
        SystemCategory::Power,
        SystemCategory::Services,
        SystemCategory::Science,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SystemCategory::Habitat => "habitat",
            SystemCategory::Manufacturing => "manufacturing",
            SystemCategory::Infrastructure => "infrastructure",
            SystemCategory::Power => "power",
            SystemCategory::Services => "services",
            SystemCategory::Science => "science",
        }
    }
}

impl fmt::Display for SystemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SystemCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::invalid("category", format!("unknown system category {s:?}")))
    }
}

impl TryFrom<String> for SystemCategory {
    type Error = Error;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label.parse()
    }
}

/// Technology Readiness Level, 1 (basic principles) to 9 (flight proven).
/// Construction rejects anything outside that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Trl(u8);

impl Trl {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    pub fn new(level: u8) -> Result<Self, Error> {
        if !(Self::MIN..=Self::MAX).contains(&level) {
            return Err(Error::invalid(
                "tech_readiness_level",
                format!("must lie in {}..={}, got {level}", Self::MIN, Self::MAX),
            ));
        }
        Ok(Trl(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Trl {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Trl::new(level)
    }
}

impl From<Trl> for u8 {
    fn from(trl: Trl) -> u8 {
        trl.0
    }
}
