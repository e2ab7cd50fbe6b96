pub mod callgraph;
pub mod imports;

use std::path::Path;

use anyhow::Result;
use rayon::prelude::*;

use crate::adapters::{LanguageAdapter, ParsedFile};
use crate::analyzer;
use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::discovery::discover_files;
use crate::language::LanguageKind;
use crate::model::{Component, ComponentResult};

/// The JavaScript/TypeScript adapter — the one language this engine analyzes
/// with a real call graph rather than a pattern pack (§1, §4.2–§4.5).
pub struct JavaScriptAdapter;

impl LanguageAdapter for JavaScriptAdapter {
    fn language(&self) -> &'static str {
        "javascript"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        LanguageKind::JavaScriptTypeScript.file_extensions()
    }

    fn can_handle(&self, root: &Path) -> bool {
        LanguageKind::JavaScriptTypeScript
            .manifest_files()
            .iter()
            .any(|name| root.join(name).exists())
            || crate::adapters::regex_pack::any_matching_file(root, self.file_extensions())
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
            .filter(|c| LanguageKind::JavaScriptTypeScript.ecosystem_tags().contains(&c.ecosystem.as_str()))
            .collect();

        if relevant.is_empty() {
            return Ok(Vec::new());
        }

        let files = discover_files(root, LanguageKind::JavaScriptTypeScript, config, false, cancel);

        if files.is_empty() {
            return Ok(relevant
                .into_iter()
                .map(|component| ComponentResult::no_source_files(component.clone()))
                .collect());
        }

        let parsed: Vec<ParsedFile> = files
            .par_iter()
            .filter_map(|path| {
                if cancel.is_cancelled() {
                    return None;
                }
                parse_one_file(path).map_err(|err| eprintln!("warning: {err}")).ok()
            })
            .collect();

        let results = relevant
            .into_iter()
            .map(|component| analyzer::analyze_component(component.clone(), &parsed))
            .collect();

        Ok(results)
    }
}

fn parse_one_file(path: &Path) -> Result<ParsedFile> {
    let source = std::fs::read_to_string(path)
        .map_err(|err| anyhow::anyhow!("failed to read {}: {err}", path.display()))?;
    let imports = imports::extract_imports(&source, path);
    let graph = callgraph::extract_call_graph(&source, path);
    Ok(ParsedFile { path: path.to_path_buf(), imports, graph })
}
