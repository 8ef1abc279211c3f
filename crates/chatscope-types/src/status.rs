//! Conversation lifecycle status and operator overrides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a conversation.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (flag_status IN ('pending', 'incomplete', 'complete'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlagStatus {
    /// Active and unresolved.
    #[default]
    Pending,
    Incomplete,
    Complete,
}

impl FlagStatus {
    pub const ALL: [FlagStatus; 3] = [
        FlagStatus::Pending,
        FlagStatus::Incomplete,
        FlagStatus::Complete,
    ];
}

impl fmt::Display for FlagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagStatus::Pending => write!(f, "pending"),
            FlagStatus::Incomplete => write!(f, "incomplete"),
            FlagStatus::Complete => write!(f, "complete"),
        }
    }
}

impl FromStr for FlagStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FlagStatus::Pending),
            "incomplete" => Ok(FlagStatus::Incomplete),
            "complete" => Ok(FlagStatus::Complete),
            other => Err(format!("invalid flag status: '{other}'")),
        }
    }
}

/// An operator-assigned status persisted against a session.
///
/// Created on the first write for a session and only updated afterwards;
/// `created_at` never changes once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOverride {
    pub session_id: String,
    pub flag_status: FlagStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// All overrides currently in the status store, keyed by session id.
pub type OverrideTable = HashMap<String, StatusOverride>;

/// Result of an upsert against the status store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertOutcome {
    /// `true` when a record for the session already existed and was updated.
    pub matched_existing: bool,
    /// The record as stored after the write.
    pub record: StatusOverride,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_status_roundtrip() {
        for status in FlagStatus::ALL {
            let s = status.to_string();
            let parsed: FlagStatus = s.parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_flag_status_rejects_unknown() {
        assert!("done".parse::<FlagStatus>().is_err());
        assert!("".parse::<FlagStatus>().is_err());
        // The stored enum is case-sensitive.
        assert!("Complete".parse::<FlagStatus>().is_err());
    }

    #[test]
    fn test_flag_status_default() {
        assert_eq!(FlagStatus::default(), FlagStatus::Pending);
    }

    #[test]
    fn test_flag_status_serde() {
        let json = serde_json::to_string(&FlagStatus::Incomplete).unwrap();
        assert_eq!(json, "\"incomplete\"");
        let parsed: FlagStatus = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(parsed, FlagStatus::Complete);
    }

    #[test]
    fn test_status_override_serialize() {
        let now = Utc::now();
        let record = StatusOverride {
            session_id: "abc".to_string(),
            flag_status: FlagStatus::Complete,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"flag_status\":\"complete\""));
    }
}
