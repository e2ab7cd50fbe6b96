use serde::Serialize;

use super::import::Location;

/// How a component's imports were used across the files that reference it.
#[derive(Debug, Clone, Serialize)]
pub struct UsageInfo {
    /// A short description of the import style seen, e.g. `"named"`,
    /// `"namespace"`, `"require"` — the dominant `ImportKind` among matches,
    /// or `"mixed"` when more than one shape is present.
    #[serde(rename = "importStyle")]
    pub import_style: String,
    #[serde(rename = "usedMembers", skip_serializing_if = "Option::is_none")]
    pub used_members: Option<Vec<String>>,
    pub locations: Vec<Location>,
}
