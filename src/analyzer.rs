//! Component Analyzer (§4.5): combines one component's matching imports and
//! their files' call graphs into a single `ComponentResult`.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::adapters::ParsedFile;
use crate::linker::{self, Usage};
use crate::model::{
    AnalysisWarning, Component, ComponentResult, Confidence, ImportKind, Location, Status, UsageInfo, WarningCode,
    WarningSeverity,
};

#[derive(Default)]
struct MatchAccumulator {
    called: HashSet<String>,
    uncertain: HashSet<String>,
    not_called: HashSet<String>,
    locations: Vec<Location>,
    import_styles: HashSet<&'static str>,
    has_namespace: bool,
    has_conditional: bool,
    has_dynamic_import: bool,
    has_type_only_match: bool,
    has_non_type_match: bool,
    files_with_match: HashSet<PathBuf>,
}

fn kind_label(kind: ImportKind) -> &'static str {
    match kind {
        ImportKind::Named => "named",
        ImportKind::Default => "default",
        ImportKind::Namespace => "namespace",
        ImportKind::SideEffect => "side-effect",
        ImportKind::Dynamic => "dynamic",
        ImportKind::Require => "require",
        ImportKind::RequireDestructure => "require-destructure",
        ImportKind::RequireProperty => "require-property",
        ImportKind::TypeOnly => "type-only",
        ImportKind::ReExport => "re-export",
    }
}

/// Run the full §4.5 algorithm for one component against every parsed file.
pub fn analyze_component(component: Component, files: &[ParsedFile]) -> ComponentResult {
    let mut acc = MatchAccumulator::default();

    for file in files {
        for import in &file.imports {
            if !linker::specifier_matches(&import.source, &component) {
                continue;
            }

            if import.is_type_only {
                acc.has_type_only_match = true;
                acc.locations.push(import.location.clone());
                continue;
            }

            acc.has_non_type_match = true;
            acc.files_with_match.insert(file.path.clone());
            acc.locations.push(import.location.clone());
            acc.import_styles.insert(kind_label(import.kind));
            if import.is_conditional {
                acc.has_conditional = true;
            }

            let is_namespace_like = import.kind == ImportKind::Namespace
                || (import.kind == ImportKind::Require
                    && import.bindings.first().map(|b| b.imported == "*").unwrap_or(false));

            if import.kind == ImportKind::Dynamic {
                acc.has_dynamic_import = true;
            } else if is_namespace_like {
                acc.has_namespace |= import.kind == ImportKind::Namespace;
                if let Some(binding) = import.bindings.first() {
                    acc.called.extend(linker::derive_namespace_usage(&binding.local, &file.graph));
                }
            } else {
                for binding in &import.bindings {
                    match linker::classify_local_name(&binding.local, &file.graph) {
                        Usage::Called => {
                            acc.called.insert(binding.imported.clone());
                        }
                        Usage::Uncertain => {
                            acc.uncertain.insert(binding.imported.clone());
                        }
                        Usage::NotCalled => {
                            acc.not_called.insert(binding.imported.clone());
                        }
                    }
                }
            }
        }
    }

    if !acc.has_type_only_match && !acc.has_non_type_match {
        return ComponentResult {
            component,
            status: Status::NotReachable,
            confidence: Confidence::High,
            reasons: vec!["No import statements found".to_string()],
            usage: None,
            warnings: Vec::new(),
        };
    }

    if !acc.has_non_type_match {
        return ComponentResult {
            component,
            status: Status::NotReachable,
            confidence: Confidence::High,
            reasons: vec!["Only type-only imports found".to_string()],
            usage: None,
            warnings: vec![AnalysisWarning::new(
                WarningCode::TypeOnlyImport,
                "All matching imports are type-only",
                WarningSeverity::Info,
            )],
        };
    }

    let has_dynamic_code = acc
        .files_with_match
        .iter()
        .filter_map(|path| files.iter().find(|f| &f.path == path))
        .any(|f| !f.graph.dynamic_code_warnings.is_empty());

    let vulnerable = component.affected_function_union();
    let mut confidence;
    let status;
    let mut reasons = Vec::new();
    let mut used_members: Option<Vec<String>> = None;

    if !vulnerable.is_empty() {
        let mut called_hit: Vec<String> = vulnerable.iter().filter(|v| acc.called.contains(**v)).map(|s| s.to_string()).collect();
        called_hit.sort();
        let mut broad_hit: Vec<String> = vulnerable
            .iter()
            .filter(|v| acc.called.contains(**v) || acc.uncertain.contains(**v))
            .map(|s| s.to_string())
            .collect();
        broad_hit.sort();

        if !called_hit.is_empty() {
            status = Status::Reachable;
            confidence = Confidence::High;
            reasons.push(format!("Vulnerable method(s) called: {}", called_hit.join(", ")));
            used_members = Some(called_hit);
        } else if !broad_hit.is_empty() {
            status = Status::Reachable;
            confidence = Confidence::Medium;
            reasons.push(format!("Vulnerable method(s) referenced but not confirmed called: {}", broad_hit.join(", ")));
            used_members = Some(broad_hit);
        } else {
            status = Status::Imported;
            confidence = Confidence::High;
            reasons.push(format!("Used in {} location(s)", acc.locations.len()));
        }
    } else if !acc.called.is_empty() {
        let mut names: Vec<String> = acc.called.iter().cloned().collect();
        names.sort();
        status = Status::Reachable;
        confidence = Confidence::High;
        reasons.push(format!("Called: {}", names.join(", ")));
        used_members = Some(names);
    } else if acc.has_dynamic_import {
        status = Status::Reachable;
        confidence = Confidence::Medium;
        reasons.push("Dynamically imported; call sites cannot be statically confirmed".to_string());
    } else {
        status = Status::Imported;
        confidence = Confidence::High;
        reasons.push(format!("Used in {} location(s)", acc.locations.len()));
    }

    let mut warnings = Vec::new();

    if acc.has_namespace {
        confidence = confidence.cap(Confidence::Medium);
        warnings.push(AnalysisWarning::new(
            WarningCode::NamespaceImport,
            "Namespace import — members are resolved dynamically",
            WarningSeverity::Warning,
        ));
    }

    if has_dynamic_code {
        confidence = confidence.cap(Confidence::Medium);
        warnings.push(AnalysisWarning::new(
            WarningCode::DynamicCode,
            "Dynamic code execution found in a file that imports this component",
            WarningSeverity::Warning,
        ));
    }

    if acc.has_conditional {
        confidence = confidence.cap(Confidence::Medium);
        warnings.push(AnalysisWarning::new(
            WarningCode::IndirectUsage,
            "Conditional import",
            WarningSeverity::Info,
        ));
    }

    if acc.has_dynamic_import {
        confidence = confidence.cap(Confidence::Medium);
        warnings.push(AnalysisWarning::new(
            WarningCode::DynamicImport,
            "Component is loaded via a dynamic import()",
            WarningSeverity::Info,
        ));
    }

    if acc.has_type_only_match {
        warnings.push(AnalysisWarning::new(
            WarningCode::TypeOnlyImport,
            "Some matching imports are type-only and excluded from runtime reachability",
            WarningSeverity::Info,
        ));
    }

    let mut not_called_names: Vec<&String> = acc.not_called.iter().collect();
    not_called_names.sort();
    for name in not_called_names {
        warnings.push(AnalysisWarning::new(
            WarningCode::UnusedImport,
            format!("Unused import: {name}"),
            WarningSeverity::Info,
        ));
    }

    let import_style = if acc.import_styles.len() == 1 {
        acc.import_styles.iter().next().unwrap().to_string()
    } else {
        "mixed".to_string()
    };

    let mut locations = acc.locations;
    locations.sort_by(|a, b| (&a.file, a.line, a.column).cmp(&(&b.file, b.line, b.column)));

    ComponentResult {
        component,
        status,
        confidence,
        reasons,
        usage: Some(UsageInfo { import_style, used_members, locations }),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::javascript::{callgraph, imports};
    use crate::model::{Component, Severity, Vulnerability};
    use std::path::Path;

    fn component(name: &str, affected: &[&str]) -> Component {
        Component {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            ecosystem: "npm".to_string(),
            purl: None,
            vulnerabilities: if affected.is_empty() {
                vec![]
            } else {
                vec![Vulnerability {
                    id: "CVE-TEST".to_string(),
                    severity: Severity::High,
                    affected_functions: affected.iter().map(|s| s.to_string()).collect(),
                    fixed_version: None,
                    description: None,
                }]
            },
        }
    }

    fn parse(source: &str) -> Vec<ParsedFile> {
        let path = Path::new("src/a.js").to_path_buf();
        vec![ParsedFile {
            imports: imports::extract_imports(source, &path),
            graph: callgraph::extract_call_graph(source, &path),
            path,
        }]
    }

    #[test]
    fn scenario_1_imported_but_vulnerable_symbol_not_called() {
        let files = parse("import { merge } from 'lodash'; merge({}, {});");
        let result = analyze_component(component("lodash", &["template"]), &files);
        assert_eq!(result.status, Status::Imported);
    }

    #[test]
    fn scenario_2_reachable_high_confidence() {
        let files = parse("import { template } from 'lodash'; template('<%=x%>')({x:1});");
        let result = analyze_component(component("lodash", &["template"]), &files);
        assert_eq!(result.status, Status::Reachable);
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.usage.unwrap().used_members, Some(vec!["template".to_string()]));
    }

    #[test]
    fn scenario_3_namespace_downgrades_confidence() {
        let files = parse("import * as _ from 'lodash'; _.template('x');");
        let result = analyze_component(component("lodash", &["template"]), &files);
        assert_eq!(result.status, Status::Reachable);
        assert_eq!(result.confidence, Confidence::Medium);
        assert!(result.warnings.iter().any(|w| w.code == WarningCode::NamespaceImport));
    }

    #[test]
    fn scenario_4_dynamic_import_is_reachable_medium() {
        let files = parse("const lodash = await import('lodash'); lodash.merge({},{});");
        let result = analyze_component(component("lodash", &[]), &files);
        assert_eq!(result.status, Status::Reachable);
        assert_eq!(result.confidence, Confidence::Medium);
        assert!(result.warnings.iter().any(|w| w.code == WarningCode::DynamicImport));
    }

    #[test]
    fn scenario_5_type_only_import_is_not_reachable() {
        let files = parse("import type { Request } from 'express'; function h(r) {}");
        let result = analyze_component(component("express", &[]), &files);
        assert_eq!(result.status, Status::NotReachable);
        assert!(result.warnings.iter().any(|w| w.code == WarningCode::TypeOnlyImport));
    }

    #[test]
    fn scenario_6_unused_destructured_name_is_flagged() {
        let files = parse("const { merge, clone } = require('lodash'); merge({}, {});");
        let result = analyze_component(component("lodash", &["template", "merge"]), &files);
        assert_eq!(result.status, Status::Reachable);
        let usage = result.usage.unwrap();
        assert!(usage.used_members.unwrap().contains(&"merge".to_string()));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.code == WarningCode::UnusedImport && w.message.contains("clone")));
    }

    #[test]
    fn scenario_7_dynamic_code_downgrades_confidence() {
        let files = parse("const fs = require('fs'); eval('fs.readFileSync(\"x\")');");
        let result = analyze_component(component("fs", &[]), &files);
        assert_eq!(result.confidence, Confidence::Medium);
        assert!(result.warnings.iter().any(|w| w.code == WarningCode::DynamicCode));
    }

    #[test]
    fn scenario_8_no_imports_is_not_reachable() {
        let files: Vec<ParsedFile> = Vec::new();
        let result = analyze_component(component("lodash", &[]), &files);
        assert_eq!(result.status, Status::NotReachable);
        assert_eq!(result.reasons[0], "No import statements found");
    }

    #[test]
    fn conditional_require_caps_confidence() {
        let files = parse("try {\n  const fs = require('fs');\n  fs.readFileSync('x');\n} catch (e) {}\n");
        let result = analyze_component(component("fs", &[]), &files);
        assert_eq!(result.confidence, Confidence::Medium);
        assert!(result.warnings.iter().any(|w| w.code == WarningCode::IndirectUsage));
    }
}
