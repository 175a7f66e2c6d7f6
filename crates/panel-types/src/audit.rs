//! Audit records appended to the log channel.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::action::ActionKind;

/// Sortable timestamp layout used in audit lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Who triggered which action and when. Written once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub actor: String,
    pub action: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    pub timestamp: NaiveDateTime,
}

impl AuditEntry {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.action.action().label;
        write!(f, "📝 **Log:** `{}` pressed **{}**", self.actor, label)?;
        if let Some(extra) = &self.extra {
            write!(f, " (Time: {})", extra)?;
        }
        write!(f, " at `{}`", self.formatted_timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_line_without_extra() {
        let entry = AuditEntry {
            actor: "alice".to_string(),
            action: ActionKind::Online,
            extra: None,
            timestamp: at(9, 5, 7),
        };
        assert_eq!(
            entry.to_string(),
            "📝 **Log:** `alice` pressed **Online** at `2025-08-01 09:05:07`"
        );
    }

    #[test]
    fn test_line_with_time_extra() {
        let entry = AuditEntry {
            actor: "bob".to_string(),
            action: ActionKind::CustomRestart,
            extra: Some("10:30 AM".to_string()),
            timestamp: at(23, 0, 0),
        };
        assert_eq!(
            entry.to_string(),
            "📝 **Log:** `bob` pressed **Custom Restart** (Time: 10:30 AM) at `2025-08-01 23:00:00`"
        );
    }

    #[test]
    fn test_timestamp_sorts_lexically() {
        let early = AuditEntry {
            actor: "a".to_string(),
            action: ActionKind::Restart,
            extra: None,
            timestamp: at(9, 0, 0),
        };
        let late = AuditEntry {
            timestamp: at(10, 0, 0),
            ..early.clone()
        };
        assert!(early.formatted_timestamp() < late.formatted_timestamp());
    }
}
