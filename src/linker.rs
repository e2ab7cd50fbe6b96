//! Import-usage linking (§4.4): decide, for one imported local name, whether
//! the call graph shows it called, merely referenced, or neither.

use std::collections::HashSet;

use crate::model::{CallGraph, Component};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Called,
    Uncertain,
    NotCalled,
}

/// Classify one bound local name against a file's call graph (§4.4).
pub fn classify_local_name(local: &str, graph: &CallGraph) -> Usage {
    if graph.is_called(local) {
        Usage::Called
    } else if graph.is_referenced(local) {
        Usage::Uncertain
    } else {
        Usage::NotCalled
    }
}

/// Member names called through a namespace-like local binding (`ns.member(…)`),
/// derived from the call graph's dotted callee spellings. Used for both
/// `import * as ns` and bare `require('m')` bindings, which both stand for
/// the whole module object.
pub fn derive_namespace_usage(alias: &str, graph: &CallGraph) -> HashSet<String> {
    let prefix = format!("{alias}.");
    graph
        .called_functions
        .iter()
        .filter_map(|callee| callee.strip_prefix(prefix.as_str()))
        .map(|member| member.to_string())
        .collect()
}

/// Whether an import's module specifier matches this component: exact
/// equality, subpath (`lodash/merge` matches `lodash`), or via a curated
/// package→module alias (§4.5 step 1).
pub fn specifier_matches(source: &str, component: &Component) -> bool {
    if matches_name_or_subpath(source, &component.name) {
        return true;
    }
    crate::packages::module_aliases(&component.ecosystem, &component.name)
        .iter()
        .any(|alias| matches_name_or_subpath(source, alias))
}

fn matches_name_or_subpath(source: &str, name: &str) -> bool {
    source == name || source.starts_with(&format!("{name}/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CallSite;
    use crate::model::Location;
    use std::path::PathBuf;

    fn loc() -> Location {
        Location::new(PathBuf::from("a.js"), 1, "x")
    }

    #[test]
    fn local_name_called() {
        let mut graph = CallGraph::default();
        graph.called_functions.insert("merge".to_string());
        graph.calls.push(CallSite { callee: "merge".to_string(), is_constructor: false, location: loc() });
        assert_eq!(classify_local_name("merge", &graph), Usage::Called);
    }

    #[test]
    fn local_name_uncertain() {
        let mut graph = CallGraph::default();
        graph.references.insert("merge".to_string());
        assert_eq!(classify_local_name("merge", &graph), Usage::Uncertain);
    }

    #[test]
    fn local_name_not_called() {
        let graph = CallGraph::default();
        assert_eq!(classify_local_name("merge", &graph), Usage::NotCalled);
    }

    #[test]
    fn namespace_members_derived_from_dotted_callees() {
        let mut graph = CallGraph::default();
        graph.called_functions.insert("_.template".to_string());
        graph.called_functions.insert("template".to_string());
        let members = derive_namespace_usage("_", &graph);
        assert!(members.contains("template"));
    }

    #[test]
    fn subpath_specifier_matches() {
        let component = Component {
            name: "lodash".into(),
            version: "1.0.0".into(),
            ecosystem: "npm".into(),
            purl: None,
            vulnerabilities: vec![],
        };
        assert!(specifier_matches("lodash/merge", &component));
        assert!(specifier_matches("lodash", &component));
        assert!(!specifier_matches("lodashx", &component));
    }
}
