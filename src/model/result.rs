use serde::Serialize;

use super::component::Component;
use super::import::Location;
use super::usage::UsageInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Reachable,
    Imported,
    NotReachable,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Cap this confidence at `ceiling`, never raising it — used by every
    /// downgrade rule in §4.5 (namespace import, dynamic code, conditional
    /// load, inferred namespace).
    pub fn cap(self, ceiling: Confidence) -> Confidence {
        self.min(ceiling)
    }
}

/// Closed set of warning codes from §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    DynamicImport,
    NamespaceImport,
    UnusedImport,
    DynamicCode,
    IndirectUsage,
    TypeOnlyImport,
    WildcardRefer,
    ConditionalLoad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisWarning {
    pub code: WarningCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub severity: WarningSeverity,
}

impl AnalysisWarning {
    pub fn new(code: WarningCode, message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            severity,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentResult {
    pub component: Component,
    pub status: Status,
    pub confidence: Confidence,
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AnalysisWarning>,
}

impl ComponentResult {
    pub fn unhandled(component: Component) -> Self {
        Self {
            component,
            status: Status::Unknown,
            confidence: Confidence::Low,
            reasons: vec!["no adapter".to_string()],
            usage: None,
            warnings: Vec::new(),
        }
    }

    pub fn no_source_files(component: Component) -> Self {
        Self {
            component,
            status: Status::Unknown,
            confidence: Confidence::Low,
            reasons: vec!["No source files found for this ecosystem".to_string()],
            usage: None,
            warnings: Vec::new(),
        }
    }
}
