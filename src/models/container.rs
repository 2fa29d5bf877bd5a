//! Reference to the container a place lives in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire value the frontend uses for the unassigned bucket.
pub const UNASSIGNED: &str = "unassigned";

/// Either the trip's unassigned bucket or one of its days.
///
/// Serialized as a plain string: `"unassigned"` or the day id. An empty string
/// is read as the unassigned bucket, which is what the browser app sends when
/// no day is selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContainerRef {
    #[default]
    Unassigned,
    Day(String),
}

impl ContainerRef {
    pub fn day(id: impl Into<String>) -> Self {
        ContainerRef::Day(id.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContainerRef::Unassigned => UNASSIGNED,
            ContainerRef::Day(id) => id,
        }
    }
}

impl From<String> for ContainerRef {
    fn from(value: String) -> Self {
        if value.is_empty() || value == UNASSIGNED {
            ContainerRef::Unassigned
        } else {
            ContainerRef::Day(value)
        }
    }
}

impl From<&str> for ContainerRef {
    fn from(value: &str) -> Self {
        ContainerRef::from(value.to_string())
    }
}

impl From<ContainerRef> for String {
    fn from(value: ContainerRef) -> Self {
        match value {
            ContainerRef::Unassigned => UNASSIGNED.to_string(),
            ContainerRef::Day(id) => id,
        }
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_maps_to_unassigned() {
        assert_eq!(ContainerRef::from("unassigned"), ContainerRef::Unassigned);
        assert_eq!(ContainerRef::from(""), ContainerRef::Unassigned);
        assert_eq!(ContainerRef::from("1700000000000"), ContainerRef::day("1700000000000"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&vec![ContainerRef::Unassigned, ContainerRef::day("42")])
            .unwrap();
        assert_eq!(json, r#"["unassigned","42"]"#);

        let parsed: ContainerRef = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(parsed, ContainerRef::day("42"));
    }
}
