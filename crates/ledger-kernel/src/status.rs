//! Parameter lifecycle status.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of lifecycle tags for a parameter entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamStatus {
    /// Externally measured; only replaceable from an authoritative source.
    #[serde(alias = "ESTABLISHED")]
    Authoritative,
    /// Fixed by topology or geometry.
    Geometric,
    /// Computed from other registry parameters.
    Derived,
    /// A forward prediction awaiting comparison.
    Predicted,
    /// Tuned against a reference value.
    Calibrated,
    /// Rule-of-thumb estimate.
    Heuristic,
    /// Bookkeeping written by the pipeline itself.
    System,
}

impl ParamStatus {
    pub const ALL: [ParamStatus; 7] = [
        ParamStatus::Authoritative,
        ParamStatus::Geometric,
        ParamStatus::Derived,
        ParamStatus::Predicted,
        ParamStatus::Calibrated,
        ParamStatus::Heuristic,
        ParamStatus::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamStatus::Authoritative => "AUTHORITATIVE",
            ParamStatus::Geometric => "GEOMETRIC",
            ParamStatus::Derived => "DERIVED",
            ParamStatus::Predicted => "PREDICTED",
            ParamStatus::Calibrated => "CALIBRATED",
            ParamStatus::Heuristic => "HEURISTIC",
            ParamStatus::System => "SYSTEM",
        }
    }

    /// Whether entries with this status reject non-authoritative writers.
    pub fn is_write_protected(&self) -> bool {
        match self {
            ParamStatus::Authoritative => true,
            ParamStatus::Geometric
            | ParamStatus::Derived
            | ParamStatus::Predicted
            | ParamStatus::Calibrated
            | ParamStatus::Heuristic
            | ParamStatus::System => false,
        }
    }
}

impl fmt::Display for ParamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AUTHORITATIVE" | "ESTABLISHED" => Ok(ParamStatus::Authoritative),
            "GEOMETRIC" => Ok(ParamStatus::Geometric),
            "DERIVED" => Ok(ParamStatus::Derived),
            "PREDICTED" => Ok(ParamStatus::Predicted),
            "CALIBRATED" => Ok(ParamStatus::Calibrated),
            "HEURISTIC" => Ok(ParamStatus::Heuristic),
            "SYSTEM" => Ok(ParamStatus::System),
            _ => Err(RegistryError::InvalidStatus(s.to_string())),
        }
    }
}
