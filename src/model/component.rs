use serde::{Deserialize, Serialize};

/// Severity of a declared vulnerability. Defaults to `Unknown` when the
/// input omits it (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

/// A single known vulnerability affecting a component.
///
/// `affected_functions` is the decisive field for reachability: when present,
/// the analyzer (§4.5) reduces the question to "is any of these called".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, rename = "affectedFunctions")]
    pub affected_functions: Vec<String>,
    #[serde(default, rename = "fixedVersion")]
    pub fixed_version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A third-party dependency declared by the project under analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub version: String,
    #[serde(default = "default_ecosystem")]
    pub ecosystem: String,
    #[serde(default)]
    pub purl: Option<String>,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
}

fn default_ecosystem() -> String {
    "npm".to_string()
}

impl Component {
    /// Fill in the `purl` default (`pkg:{eco}/{name}@{version}`) when absent.
    /// Per §6, the purl is omitted entirely when the ecosystem is `"unknown"`.
    pub fn with_defaults(mut self) -> Self {
        if self.purl.is_none() && self.ecosystem != "unknown" {
            self.purl = Some(format!(
                "pkg:{}/{}@{}",
                self.ecosystem, self.name, self.version
            ));
        }
        self
    }

    /// The union of every `affectedFunctions` entry across all declared
    /// vulnerabilities for this component (§4.5 step 4, the set `V`).
    pub fn affected_function_union(&self) -> std::collections::HashSet<&str> {
        self.vulnerabilities
            .iter()
            .flat_map(|v| v.affected_functions.iter().map(String::as_str))
            .collect()
    }
}
