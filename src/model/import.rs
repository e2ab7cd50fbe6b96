use std::path::PathBuf;

use serde::Serialize;

/// Where an import statement was found, and the trimmed source for evidence
/// display. `snippet` is truncated to 100 chars per §4.2.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub file: PathBuf,
    /// 1-indexed line number.
    pub line: usize,
    pub column: Option<usize>,
    pub snippet: String,
}

impl Location {
    pub fn new(file: PathBuf, line: usize, snippet: &str) -> Self {
        let trimmed = snippet.trim();
        let snippet = if trimmed.chars().count() > 100 {
            trimmed.chars().take(100).collect()
        } else {
            trimmed.to_string()
        };
        Self {
            file,
            line,
            column: None,
            snippet,
        }
    }
}

/// The syntactic shape of one import statement, per §4.2's dialect table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    Named,
    Default,
    Namespace,
    SideEffect,
    Dynamic,
    Require,
    RequireDestructure,
    RequireProperty,
    TypeOnly,
    ReExport,
}

/// One `{imported, local}` pair. `imported == "*"` marks a namespace binding.
#[derive(Debug, Clone, Serialize)]
pub struct Binding {
    pub imported: String,
    pub local: String,
}

/// A single import statement extracted from one source file.
///
/// Invariant: every non-side-effect import has at least one binding.
/// `is_type_only` marks `import type` / `import { type T }` forms, which are
/// never treated as runtime reachability evidence (§4.2, §8 invariant 6).
#[derive(Debug, Clone, Serialize)]
pub struct ImportRecord {
    pub kind: ImportKind,
    /// The module specifier as written, e.g. `"lodash"` or `"lodash/merge"`.
    pub source: String,
    pub bindings: Vec<Binding>,
    pub alias: Option<String>,
    pub is_type_only: bool,
    /// True when this import sits inside a guarded block (try/catch or an
    /// `if` over the binding) — feeds the `conditional_load` / `indirect_usage`
    /// warning in §4.5 step 7.
    pub is_conditional: bool,
    pub location: Location,
}

impl ImportRecord {
    /// Every local name this statement binds (namespace alias included).
    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.local.as_str())
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self.kind, ImportKind::Namespace)
            || self.bindings.iter().any(|b| b.imported == "*")
    }
}
