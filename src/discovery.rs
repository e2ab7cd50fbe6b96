use std::path::{Path, PathBuf};

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::language::{LanguageKind, default_ignore_globs};

/// Walk a project directory and collect source files for one language.
///
/// Respects `.gitignore` rules, the language's built-in ignore-glob set
/// (§4.1), and any additional `config.exclude` patterns. Discovery is
/// breadth-first via the `ignore` crate's walker and results are sorted by
/// path before returning, so downstream evidence ordering is deterministic
/// regardless of filesystem iteration order (§5 ordering guarantee).
///
/// Unreadable directory entries are dropped with a warning on stderr; they
/// never abort the walk (§4.1: "never fatal").
pub fn discover_files(
    root: &Path,
    lang: LanguageKind,
    config: &EngineConfig,
    verbose: bool,
    cancel: &CancellationToken,
) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let extensions = lang.file_extensions();
    let ignore_globs = default_ignore_globs(lang);

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(true)
        .require_git(false)
        .build();

    for result in walker {
        if cancel.is_cancelled() {
            break;
        }

        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                eprintln!("warning: {err}");
                continue;
            }
        };

        let path = entry.path();

        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        if matches_any_glob(path, ignore_globs) {
            continue;
        }

        if let Some(patterns) = &config.exclude
            && matches_any_glob_owned(path, patterns)
        {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !extensions.contains(&ext) {
            continue;
        }

        if verbose {
            eprintln!("{}", path.display());
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    files
}

fn matches_any_glob(path: &Path, patterns: &[&str]) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| {
        glob::Pattern::new(pattern)
            .map(|p| p.matches(&path_str))
            .unwrap_or(false)
    })
}

fn matches_any_glob_owned(path: &Path, patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| {
        glob::Pattern::new(pattern)
            .map(|p| p.matches(&path_str))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tmp() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn discovers_js_files_and_skips_node_modules() {
        let dir = tmp();
        fs::write(dir.path().join("a.js"), "").unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "").unwrap();

        let config = EngineConfig::default();
        let files = discover_files(
            dir.path(),
            LanguageKind::JavaScriptTypeScript,
            &config,
            false,
            &CancellationToken::new(),
        );
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.js"));
    }

    #[test]
    fn results_are_sorted() {
        let dir = tmp();
        fs::write(dir.path().join("z.js"), "").unwrap();
        fs::write(dir.path().join("a.js"), "").unwrap();
        let config = EngineConfig::default();
        let files = discover_files(
            dir.path(),
            LanguageKind::JavaScriptTypeScript,
            &config,
            false,
            &CancellationToken::new(),
        );
        assert!(files[0] < files[1]);
    }

    #[test]
    fn cancellation_stops_the_walk_early() {
        let dir = tmp();
        for i in 0..20 {
            fs::write(dir.path().join(format!("f{i}.js")), "").unwrap();
        }
        let cancel = CancellationToken::new();
        cancel.cancel();
        let config = EngineConfig::default();
        let files = discover_files(
            dir.path(),
            LanguageKind::JavaScriptTypeScript,
            &config,
            false,
            &cancel,
        );
        assert!(files.len() <= 20);
    }

    #[test]
    fn config_exclude_patterns_apply() {
        let dir = tmp();
        fs::create_dir_all(dir.path().join("fixtures")).unwrap();
        fs::write(dir.path().join("fixtures/skip.js"), "").unwrap();
        fs::write(dir.path().join("keep.js"), "").unwrap();
        let config = EngineConfig {
            exclude: Some(vec!["**/fixtures/**".to_string()]),
            jobs: None,
        };
        let files = discover_files(
            dir.path(),
            LanguageKind::JavaScriptTypeScript,
            &config,
            false,
            &CancellationToken::new(),
        );
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.js"));
    }
}
