//! Grouping dimensions of a scored table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DiagnosisError;

/// One of the categorical specification columns every scored table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Concept,
    Domain,
    SourceTag,
}

impl Dimension {
    /// All specification columns, in canonical order.
    pub const ALL: [Dimension; 3] = [Dimension::Concept, Dimension::Domain, Dimension::SourceTag];

    /// Column name in the scored table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Domain => "domain",
            Self::SourceTag => "source_tag",
        }
    }

    /// Position in [`Dimension::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Concept => 0,
            Self::Domain => 1,
            Self::SourceTag => 2,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = DiagnosisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concept" => Ok(Self::Concept),
            "domain" => Ok(Self::Domain),
            "source_tag" => Ok(Self::SourceTag),
            other => Err(DiagnosisError::InvalidSpecification {
                message: format!(
                    "unknown dimension '{other}': use 'concept', 'domain' or 'source_tag'"
                ),
            }),
        }
    }
}

/// Dimension used to filter rows down to a whitelist of target groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    Domain,
    Concept,
}

impl GroupType {
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Domain => Dimension::Domain,
            Self::Concept => Dimension::Concept,
        }
    }
}

impl FromStr for GroupType {
    type Err = DiagnosisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(Self::Domain),
            "concept" => Ok(Self::Concept),
            other => Err(DiagnosisError::InvalidGroupType {
                group_type: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_round_trips_through_str() {
        for dim in Dimension::ALL {
            assert_eq!(dim.as_str().parse::<Dimension>().unwrap(), dim);
        }
    }

    #[test]
    fn test_group_type_rejects_source_tag() {
        let err = "source_tag".parse::<GroupType>().unwrap_err();
        assert!(matches!(err, DiagnosisError::InvalidGroupType { .. }));
    }
}
