use std::path::Path;

use serde::Deserialize;

/// Configuration loaded from `reachability.toml` at the project root.
#[derive(Debug, Deserialize, Default)]
pub struct EngineConfig {
    /// Additional path patterns to exclude from discovery, beyond
    /// `.gitignore` and each language's built-in ignore set.
    pub exclude: Option<Vec<String>>,
    /// Overrides the default bounded-pool size for parallel fan-out (§5).
    pub jobs: Option<usize>,
}

impl EngineConfig {
    /// Load configuration from `reachability.toml` in the given root
    /// directory. Returns a default (empty) configuration if the file does
    /// not exist or cannot be parsed — never fatal (§7: config errors are
    /// not among the fatal input-error cases, which are limited to the
    /// component list).
    pub fn load(root: &Path) -> Self {
        let config_path = root.join("reachability.toml");

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!(
                        "warning: failed to parse reachability.toml: {err}. Using defaults."
                    );
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!("warning: failed to read reachability.toml: {err}. Using defaults.");
                Self::default()
            }
        }
    }
}
