//! Check outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Fully compliant
    Pass,
    /// Clearly violates best practice
    Fail,
    /// Partial or borderline violation
    Warning,
    /// Cannot be measured from crawled data
    Info,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pass" => Some(Self::Pass),
            "fail" => Some(Self::Fail),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check category, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Technical SEO")]
    Technical,
    #[serde(rename = "Performance")]
    Performance,
    #[serde(rename = "On-Page SEO")]
    OnPage,
    #[serde(rename = "Content Quality")]
    Content,
    #[serde(rename = "Social Media")]
    Social,
    #[serde(rename = "Off-Page SEO")]
    OffPage,
    #[serde(rename = "Analytics & Reporting")]
    Analytics,
    #[serde(rename = "GEO & AEO")]
    Geo,
    #[serde(rename = "Advanced Technical & Security")]
    Advanced,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Technical,
        Self::Performance,
        Self::OnPage,
        Self::Content,
        Self::Social,
        Self::OffPage,
        Self::Analytics,
        Self::Geo,
        Self::Advanced,
    ];

    /// Display name, also used as the stored value
    pub fn name(&self) -> &'static str {
        match self {
            Self::Technical => "Technical SEO",
            Self::Performance => "Performance",
            Self::OnPage => "On-Page SEO",
            Self::Content => "Content Quality",
            Self::Social => "Social Media",
            Self::OffPage => "Off-Page SEO",
            Self::Analytics => "Analytics & Reporting",
            Self::Geo => "GEO & AEO",
            Self::Advanced => "Advanced Technical & Security",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The result of running one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_name: String,
    pub category: Category,
    pub status: CheckStatus,
    /// Weight (0-100) applied by the aggregate score on fail or warning
    pub impact_score: u8,
    pub current_value: String,
    pub recommended_value: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub ranking_impact: String,
    pub solution: String,
    pub enhancements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CheckResult {
    pub fn pro(mut self, text: impl Into<String>) -> Self {
        self.pros.push(text.into());
        self
    }

    pub fn con(mut self, text: impl Into<String>) -> Self {
        self.cons.push(text.into());
        self
    }

    /// Adds a pro only when `cond` holds
    pub fn pro_if(self, cond: bool, text: impl Into<String>) -> Self {
        if cond {
            self.pro(text)
        } else {
            self
        }
    }

    /// Adds a con only when `cond` holds
    pub fn con_if(self, cond: bool, text: impl Into<String>) -> Self {
        if cond {
            self.con(text)
        } else {
            self
        }
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// True for the statuses the aggregate score penalizes
    pub fn is_scored_issue(&self) -> bool {
        matches!(self.status, CheckStatus::Fail | CheckStatus::Warning)
    }
}
