//! Shared pattern-pack machinery for the non-JavaScript adapters (§1: "their
//! bodies are regular-expression pattern packs around the same contract and
//! are not the interesting engineering"). Each language supplies only an
//! import-statement regex and a handful of identifiers; call detection,
//! matching, and verdict construction are shared here.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;

use crate::adapters::LanguageAdapter;
use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::discovery::discover_files;
use crate::language::LanguageKind;
use crate::linker;
use crate::model::{
    AnalysisWarning, Component, ComponentResult, Confidence, Location, Status, UsageInfo, WarningCode,
    WarningSeverity,
};

pub struct PatternPack {
    pub kind: LanguageKind,
    pub language_tag: &'static str,
    pub import_pattern: Regex,
    /// True for ecosystems where the adapter infers a namespace by
    /// title-casing the package name (§9 ambiguity note: PHP/C#/Swift). Any
    /// match found only through that inference is downgraded to `low`
    /// confidence with an explanatory reason.
    pub infers_namespace: bool,
}

impl LanguageAdapter for PatternPack {
    fn language(&self) -> &'static str {
        self.language_tag
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.kind.file_extensions()
    }

    fn can_handle(&self, root: &Path) -> bool {
        self.kind.manifest_files().iter().any(|name| root.join(name).exists())
            || any_matching_file(root, self.kind.file_extensions())
    }

    fn analyze(
        &self,
        root: &Path,
        components: &[Component],
        config: &EngineConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<ComponentResult>> {
        let relevant: Vec<&Component> = components
            .iter()
            .filter(|c| self.kind.ecosystem_tags().contains(&c.ecosystem.as_str()))
            .collect();
        if relevant.is_empty() {
            return Ok(Vec::new());
        }

        let files = discover_files(root, self.kind, config, false, cancel);

        let mut file_imports: Vec<(String, Vec<(String, Location)>, HashSet<String>)> = Vec::new();
        for path in &files {
            if cancel.is_cancelled() {
                break;
            }
            let text = match std::fs::read_to_string(path) {
                Ok(t) => t,
                Err(err) => {
                    eprintln!("warning: failed to read {}: {err}", path.display());
                    continue;
                }
            };
            let mut modules = Vec::new();
            for mat in self.import_pattern.captures_iter(&text) {
                if let Some(module) = mat.get(1) {
                    let line = text[..module.start()].bytes().filter(|b| *b == b'\n').count() + 1;
                    let snippet = text.lines().nth(line - 1).unwrap_or("");
                    modules.push((module.as_str().to_string(), Location::new(path.clone(), line, snippet)));
                }
            }
            let called = generic_called_names(&text);
            file_imports.push((path.display().to_string(), modules, called));
        }

        Ok(relevant.into_iter().map(|c| self.analyze_one(c, &file_imports)).collect())
    }
}

impl PatternPack {
    fn analyze_one(
        &self,
        component: &Component,
        files: &[(String, Vec<(String, Location)>, HashSet<String>)],
    ) -> ComponentResult {
        let title_cased = title_case(&component.name);
        let mut matched_locations: Vec<Location> = Vec::new();
        let mut matched_called: HashSet<String> = HashSet::new();
        let mut inferred_only = true;

        for (_, modules, called) in files {
            let mut file_matched = false;
            for (module, location) in modules {
                if linker::specifier_matches(module, component) {
                    inferred_only = false;
                    matched_locations.push(location.clone());
                    file_matched = true;
                } else if self.infers_namespace && module == &title_cased {
                    matched_locations.push(location.clone());
                    file_matched = true;
                }
            }
            if file_matched {
                matched_called.extend(called.iter().cloned());
            }
        }

        if matched_locations.is_empty() {
            return ComponentResult {
                component: component.clone(),
                status: Status::NotReachable,
                confidence: Confidence::High,
                reasons: vec!["No import statements found".to_string()],
                usage: None,
                warnings: Vec::new(),
            };
        }

        let vulnerable = component.affected_function_union();
        let mut warnings = Vec::new();
        let mut confidence = Confidence::Medium;
        let (status, reason, used_members) = if !vulnerable.is_empty() {
            let hit: Vec<String> = vulnerable.iter().filter(|v| matched_called.contains(**v)).map(|s| s.to_string()).collect();
            if !hit.is_empty() {
                (Status::Reachable, format!("Vulnerable method(s) called: {}", hit.join(", ")), Some(hit))
            } else {
                (Status::Imported, format!("Used in {} location(s)", matched_locations.len()), None)
            }
        } else if !matched_called.is_empty() {
            (Status::Reachable, "Import present and call sites found in the same file(s)".to_string(), None)
        } else {
            (Status::Imported, format!("Used in {} location(s)", matched_locations.len()), None)
        };

        if inferred_only && self.infers_namespace {
            confidence = Confidence::Low;
            warnings.push(AnalysisWarning::new(
                WarningCode::NamespaceImport,
                format!("Namespace inferred by title-casing package name \"{}\" — low confidence", component.name),
                WarningSeverity::Warning,
            ));
        }

        matched_locations.sort_by(|a, b| (&a.file, a.line).cmp(&(&b.file, b.line)));

        ComponentResult {
            component: component.clone(),
            status,
            confidence,
            reasons: vec![reason],
            usage: Some(UsageInfo {
                import_style: self.language_tag.to_string(),
                used_members,
                locations: matched_locations,
            }),
            warnings,
        }
    }
}

fn generic_call_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\s*\(").expect("static pattern is valid"))
}

fn generic_called_names(text: &str) -> HashSet<String> {
    generic_call_pattern()
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// `guzzlehttp/guzzle` → `GuzzlehttpGuzzle`, the crude transform §9 flags as
/// a source of false positives in the PHP/C#/Swift adapters.
fn title_case(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

pub(crate) fn any_matching_file(root: &Path, extensions: &[&str]) -> bool {
    ignore::WalkBuilder::new(root)
        .standard_filters(true)
        .build()
        .filter_map(std::result::Result::ok)
        .any(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| extensions.contains(&ext))
                .unwrap_or(false)
        })
}
