use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// One of the vision tasks the upstream API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Caption,
    Query,
    Point,
    Detect,
}

impl Operation {
    /// The allow-list, in the order the upstream documents its endpoints.
    pub const ALL: [Operation; 4] = [
        Operation::Query,
        Operation::Point,
        Operation::Detect,
        Operation::Caption,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Caption => "caption",
            Operation::Query => "query",
            Operation::Point => "point",
            Operation::Detect => "detect",
        }
    }

    /// Whether a successful result can carry overlay shapes.
    pub fn has_overlay(&self) -> bool {
        matches!(self, Operation::Point | Operation::Detect)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::InvalidOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_list() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        for name in ["", "Caption", "segment", "detect/", " query", "../point"] {
            let err = name.parse::<Operation>().unwrap_err();
            assert_eq!(err, Error::InvalidOperation(name.to_string()));
            assert_eq!(err.to_string(), "Invalid endpoint");
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Operation::Detect).unwrap();
        assert_eq!(json, "\"detect\"");
        let op: Operation = serde_json::from_str("\"caption\"").unwrap();
        assert_eq!(op, Operation::Caption);
    }

    #[test]
    fn test_has_overlay() {
        assert!(Operation::Point.has_overlay());
        assert!(Operation::Detect.has_overlay());
        assert!(!Operation::Caption.has_overlay());
        assert!(!Operation::Query.has_overlay());
    }
}
