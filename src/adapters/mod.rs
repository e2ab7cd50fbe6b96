//! Adapter contract and dispatcher (§4.6).
//!
//! An adapter is modeled as a capability — `can_handle`/`analyze` plus the
//! read-only `language`/`file_extensions` — rather than a base class, per the
//! design note in §9. The dispatcher holds an ordered list of adapters and
//! merges their output; a component no adapter recognizes becomes
//! `status = unknown` with reason "no adapter".

pub mod clojure;
pub mod csharp;
pub mod dart;
pub mod javascript;
pub mod perl;
pub mod php;
pub mod regex_pack;
pub mod scala;
pub mod swift;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::model::{CallGraph, Component, ComponentResult, ImportRecord};

/// One file's extracted imports and call graph, kept only long enough to
/// feed the linker/analyzer — source text itself is dropped immediately
/// after extraction (§5 resource policy).
pub struct ParsedFile {
    pub path: PathBuf,
    pub imports: Vec<ImportRecord>,
    pub graph: CallGraph,
}

pub trait LanguageAdapter: Send + Sync {
    fn language(&self) -> &'static str;
    fn file_extensions(&self) -> &'static [&'static str];
    fn can_handle(&self, root: &Path) -> bool;
    fn analyze(
        &self,
        root: &Path,
        components: &[Component],
        config: &EngineConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<ComponentResult>>;
}

/// Runs every applicable adapter and merges their output into one report in
/// input order (§5 ordering guarantee, §8 invariant 1).
pub struct Dispatcher {
    adapters: Vec<Box<dyn LanguageAdapter>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            adapters: vec![
                Box::new(javascript::JavaScriptAdapter),
                Box::new(dart::adapter()),
                Box::new(csharp::adapter()),
                Box::new(php::adapter()),
                Box::new(swift::adapter()),
                Box::new(perl::adapter()),
                Box::new(scala::adapter()),
                Box::new(clojure::adapter()),
            ],
        }
    }

    pub fn run(
        &self,
        root: &Path,
        components: &[Component],
        config: &EngineConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<ComponentResult>> {
        let mut by_name: std::collections::HashMap<(String, String, String), ComponentResult> =
            std::collections::HashMap::new();

        for adapter in &self.adapters {
            if cancel.is_cancelled() {
                break;
            }
            if !adapter.can_handle(root) {
                continue;
            }
            let results = adapter.analyze(root, components, config, cancel)?;
            for result in results {
                let key = (
                    result.component.name.clone(),
                    result.component.version.clone(),
                    result.component.ecosystem.clone(),
                );
                by_name.insert(key, result);
            }
        }

        Ok(components
            .iter()
            .map(|component| {
                let key = (component.name.clone(), component.version.clone(), component.ecosystem.clone());
                by_name
                    .remove(&key)
                    .unwrap_or_else(|| ComponentResult::unhandled(component.clone()))
            })
            .collect())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
