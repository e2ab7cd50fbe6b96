pub mod callgraph;
pub mod component;
pub mod import;
pub mod report;
pub mod result;
pub mod usage;

pub use callgraph::{CallGraph, CallSite, DynamicCodeKind, DynamicCodeWarning};
pub use component::{Component, Severity, Vulnerability};
pub use import::{Binding, ImportKind, ImportRecord, Location};
pub use report::{Report, Summary};
pub use result::{AnalysisWarning, ComponentResult, Confidence, Status, WarningCode, WarningSeverity};
pub use usage::UsageInfo;
