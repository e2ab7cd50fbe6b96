use std::collections::HashSet;

use serde::Serialize;

use super::import::Location;

/// A closed enumeration of dynamic-code escape hatches (§4.3). New patterns
/// extend this enum; downstream consumers only ever see the `dynamic_code`
/// warning code (§9 design note), never a new warning taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicCodeKind {
    Eval,
    IndirectEval,
    Function,
    SetTimeoutString,
    SetIntervalString,
    ExecScript,
}

#[derive(Debug, Clone, Serialize)]
pub struct DynamicCodeWarning {
    #[serde(rename = "type")]
    pub kind: DynamicCodeKind,
    pub location: Location,
}

/// One syntactic function application `<expr>(args)`.
#[derive(Debug, Clone, Serialize)]
pub struct CallSite {
    /// The derived callee string. For `a.b.c(...)` this is the dotted path;
    /// both the dotted path and its final segment are separately recorded
    /// in `calledFunctions` by the builder (§4.3, §9 permissive-by-design note).
    pub callee: String,
    pub is_constructor: bool,
    pub location: Location,
}

/// Flat-table call graph for one source file (§9: no pointer-graph
/// representation — the analyzer only needs set membership and counts).
///
/// Invariant: `called_functions ⊆ { c.callee for c in calls }` (plus the
/// final-segment spelling added alongside dotted paths).
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    pub calls: Vec<CallSite>,
    pub called_functions: HashSet<String>,
    /// Names mentioned in value position that are never themselves applied
    /// in that occurrence — "referenced but not called" (§3).
    pub references: HashSet<String>,
    pub dynamic_code_warnings: Vec<DynamicCodeWarning>,
}

impl CallGraph {
    pub fn merge(&mut self, other: CallGraph) {
        self.calls.extend(other.calls);
        self.called_functions.extend(other.called_functions);
        self.references.extend(other.references);
        self.dynamic_code_warnings.extend(other.dynamic_code_warnings);
    }

    /// `true` if `name`, or (for a namespace alias `ns`) `ns.name`, was
    /// applied anywhere in this file.
    pub fn is_called(&self, name: &str) -> bool {
        self.called_functions.contains(name)
    }

    pub fn is_referenced(&self, name: &str) -> bool {
        self.references.contains(name)
    }
}
