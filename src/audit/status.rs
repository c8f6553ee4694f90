/// Audit status definitions for tracking an audit run
///
/// The status is stored with each audit row so callers can show progress.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AuditError;

/// Represents the current status of an audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    // ===== Active States =====
    /// Audit has been created but not started
    Pending,

    /// Pages are being fetched
    Crawling,

    /// Checks are running over the crawled pages
    Analyzing,

    /// The caller is rendering the report
    GeneratingReport,

    // ===== Terminal States =====
    /// Audit finished and was scored
    Completed,

    /// Audit stopped with an error message
    Failed,
}

impl AuditStatus {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the audit is still running
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether moving from `self` to `next` is a legal step
    ///
    /// The happy path is pending, crawling, analyzing, optionally
    /// generating_report, then completed. Any active status may fail.
    pub fn can_transition_to(&self, next: AuditStatus) -> bool {
        use AuditStatus::*;
        match (self, next) {
            (Pending, Crawling)
            | (Crawling, Analyzing)
            | (Analyzing, GeneratingReport)
            | (Analyzing, Completed)
            | (GeneratingReport, Completed) => true,
            (from, Failed) => from.is_active(),
            _ => false,
        }
    }

    /// Returns `next` if the step is legal
    pub fn transition(self, next: AuditStatus) -> Result<AuditStatus, AuditError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AuditError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Crawling => "crawling",
            Self::Analyzing => "analyzing",
            Self::GeneratingReport => "generating_report",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parses a status from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "crawling" => Some(Self::Crawling),
            "analyzing" => Some(Self::Analyzing),
            "generating_report" => Some(Self::GeneratingReport),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns all statuses
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Crawling,
            Self::Analyzing,
            Self::GeneratingReport,
            Self::Completed,
            Self::Failed,
        ]
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!AuditStatus::Pending.is_terminal());
        assert!(!AuditStatus::Crawling.is_terminal());
        assert!(!AuditStatus::Analyzing.is_terminal());
        assert!(!AuditStatus::GeneratingReport.is_terminal());

        assert!(AuditStatus::Completed.is_terminal());
        assert!(AuditStatus::Failed.is_terminal());
    }

    #[test]
    fn test_happy_path_transitions() {
        let status = AuditStatus::Pending
            .transition(AuditStatus::Crawling)
            .and_then(|s| s.transition(AuditStatus::Analyzing))
            .and_then(|s| s.transition(AuditStatus::Completed))
            .unwrap();
        assert_eq!(status, AuditStatus::Completed);

        assert!(AuditStatus::Analyzing.can_transition_to(AuditStatus::GeneratingReport));
        assert!(AuditStatus::GeneratingReport.can_transition_to(AuditStatus::Completed));
    }

    #[test]
    fn test_any_active_status_can_fail() {
        for status in AuditStatus::all_states() {
            assert_eq!(
                status.can_transition_to(AuditStatus::Failed),
                status.is_active(),
                "unexpected fail transition from {status}"
            );
        }
    }

    #[test]
    fn test_rejects_skips_and_restarts() {
        assert!(!AuditStatus::Pending.can_transition_to(AuditStatus::Analyzing));
        assert!(!AuditStatus::Crawling.can_transition_to(AuditStatus::Completed));
        assert!(!AuditStatus::Completed.can_transition_to(AuditStatus::Crawling));
        assert!(!AuditStatus::Failed.can_transition_to(AuditStatus::Pending));

        let err = AuditStatus::Completed
            .transition(AuditStatus::Crawling)
            .unwrap_err();
        assert!(matches!(
            err,
            AuditError::InvalidTransition {
                from: AuditStatus::Completed,
                to: AuditStatus::Crawling
            }
        ));
        assert_eq!(
            err.to_string(),
            "Invalid status transition: completed -> crawling"
        );
    }

    #[test]
    fn test_roundtrip_db_string() {
        for status in AuditStatus::all_states() {
            let parsed = AuditStatus::from_db_string(status.to_db_string());
            assert_eq!(Some(status), parsed, "Failed roundtrip for {:?}", status);
        }
        assert_eq!(AuditStatus::from_db_string("invalid"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", AuditStatus::GeneratingReport), "generating_report");
        assert_eq!(format!("{}", AuditStatus::Failed), "failed");
    }
}
