/// Integration test suite — invokes the compiled `reachability-engine`
/// binary via subprocess against small synthetic project fixtures, one per
/// scenario. `CARGO_BIN_EXE_reachability-engine` is set automatically by
/// Cargo during `cargo test` to point at the compiled binary.
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_reachability-engine"))
}

fn write_components(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("components.json");
    fs::write(&path, json).unwrap();
    path
}

struct Run {
    status: i32,
    report: Option<Value>,
    stderr: String,
}

fn analyze(project: &Path, components: &Path) -> Run {
    let out = Command::new(binary())
        .args(["analyze", project.to_str().unwrap(), "--components", components.to_str().unwrap()])
        .output()
        .expect("failed to invoke reachability-engine binary");
    let stdout = String::from_utf8_lossy(&out.stdout).to_string();
    let stderr = String::from_utf8_lossy(&out.stderr).to_string();
    Run {
        status: out.status.code().unwrap_or(-1),
        report: serde_json::from_str(&stdout).ok(),
        stderr,
    }
}

fn result_for<'a>(report: &'a Value, name: &str) -> &'a Value {
    report["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["component"]["name"] == name)
        .unwrap_or_else(|| panic!("no result for component {name}"))
}

// ---------------------------------------------------------------------------
// Spec §8 scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_named_import_and_call_is_reachable_high() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.js"),
        "import { template } from 'lodash';\ntemplate('<%= x %>');\n",
    )
    .unwrap();
    let components = write_components(
        dir.path(),
        r#"[{"name": "lodash", "version": "4.17.21", "vulnerabilities": [{"id": "CVE-2021-1", "affectedFunctions": ["template"]}]}]"#,
    );

    let run = analyze(dir.path(), &components);
    let report = run.report.expect("expected a JSON report");
    let lodash = result_for(&report, "lodash");
    assert_eq!(lodash["status"], "reachable");
    assert_eq!(lodash["confidence"], "high");
    assert_eq!(run.status, 1, "a high-confidence reachable result must exit 1: {}", run.stderr);
}

#[test]
fn scenario_imported_but_not_called_is_imported_status() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.js"), "import { merge } from 'lodash';\n").unwrap();
    let components = write_components(
        dir.path(),
        r#"[{"name": "lodash", "version": "4.17.21", "vulnerabilities": [{"id": "CVE-2021-1", "affectedFunctions": ["template"]}]}]"#,
    );

    let run = analyze(dir.path(), &components);
    let report = run.report.unwrap();
    let lodash = result_for(&report, "lodash");
    assert_eq!(lodash["status"], "imported");
}

#[test]
fn scenario_no_import_is_not_reachable() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.js"), "console.log('no deps here');\n").unwrap();
    let components = write_components(dir.path(), r#"[{"name": "lodash", "version": "4.17.21"}]"#);

    let run = analyze(dir.path(), &components);
    let report = run.report.unwrap();
    let lodash = result_for(&report, "lodash");
    assert_eq!(lodash["status"], "not_reachable");
    assert_eq!(run.status, 0);
}

#[test]
fn scenario_namespace_import_downgrades_to_medium() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.js"),
        "import * as _ from 'lodash';\n_.template('x');\n",
    )
    .unwrap();
    let components = write_components(
        dir.path(),
        r#"[{"name": "lodash", "version": "4.17.21", "vulnerabilities": [{"id": "CVE-2021-1", "affectedFunctions": ["template"]}]}]"#,
    );

    let run = analyze(dir.path(), &components);
    let report = run.report.unwrap();
    let lodash = result_for(&report, "lodash");
    assert_eq!(lodash["status"], "reachable");
    assert_eq!(lodash["confidence"], "medium");
    assert!(
        lodash["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .any(|w| w["code"] == "namespace_import")
    );
}

#[test]
fn scenario_dynamic_import_forces_reachable_medium() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.js"),
        "const lodash = await import('lodash');\nlodash.merge({}, {});\n",
    )
    .unwrap();
    let components = write_components(dir.path(), r#"[{"name": "lodash", "version": "4.17.21"}]"#);

    let run = analyze(dir.path(), &components);
    let report = run.report.unwrap();
    let lodash = result_for(&report, "lodash");
    assert_eq!(lodash["status"], "reachable");
    assert_eq!(lodash["confidence"], "medium");
}

#[test]
fn scenario_type_only_import_is_not_reachable() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.ts"),
        "import type { Request } from 'express';\n",
    )
    .unwrap();
    let components = write_components(dir.path(), r#"[{"name": "express", "version": "4.18.0"}]"#);

    let run = analyze(dir.path(), &components);
    let report = run.report.unwrap();
    let express = result_for(&report, "express");
    assert_eq!(express["status"], "not_reachable");
    assert!(
        express["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .any(|w| w["code"] == "type_only_import")
    );
}

#[test]
fn scenario_require_destructure_partial_usage() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.js"),
        "const { merge, clone } = require('lodash');\nmerge({}, {});\n",
    )
    .unwrap();
    let components = write_components(
        dir.path(),
        r#"[{"name": "lodash", "version": "4.17.21", "vulnerabilities": [{"id": "CVE-2021-1", "affectedFunctions": ["template", "merge"]}]}]"#,
    );

    let run = analyze(dir.path(), &components);
    let report = run.report.unwrap();
    let lodash = result_for(&report, "lodash");
    assert_eq!(lodash["status"], "reachable");
    assert_eq!(lodash["confidence"], "high");
    assert!(
        lodash["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .any(|w| w["code"] == "unused_import")
    );
}

#[test]
fn scenario_eval_in_same_file_downgrades_confidence() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.js"),
        "const fs = require('fs');\neval(\"fs.readFileSync('x')\");\n",
    )
    .unwrap();
    let components = write_components(dir.path(), r#"[{"name": "fs", "version": "0.0.0"}]"#);

    let run = analyze(dir.path(), &components);
    let report = run.report.unwrap();
    let fs_result = result_for(&report, "fs");
    assert_eq!(fs_result["confidence"], "medium");
    assert!(
        fs_result["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .any(|w| w["code"] == "dynamic_code")
    );
}

#[test]
fn scenario_no_source_files_for_ecosystem_is_unknown() {
    let dir = TempDir::new().unwrap();
    // A package.json makes the JS adapter claim the project, but there are
    // no actual source files for it to discover.
    fs::write(dir.path().join("package.json"), "{}\n").unwrap();
    let components = write_components(dir.path(), r#"[{"name": "lodash", "version": "4.17.21"}]"#);

    let run = analyze(dir.path(), &components);
    let report = run.report.unwrap();
    let lodash = result_for(&report, "lodash");
    assert_eq!(lodash["status"], "unknown");
    assert!(
        lodash["reasons"]
            .as_array()
            .unwrap()
            .iter()
            .any(|r| r.as_str().unwrap_or("").contains("No source files"))
    );
}

// ---------------------------------------------------------------------------
// Invariants (§8)
// ---------------------------------------------------------------------------

#[test]
fn invariant_one_result_per_component_in_input_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.js"), "import 'lodash';\nimport 'express';\n").unwrap();
    let components = write_components(
        dir.path(),
        r#"[{"name": "express", "version": "4.18.0"}, {"name": "lodash", "version": "4.17.21"}]"#,
    );

    let run = analyze(dir.path(), &components);
    let report = run.report.unwrap();
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["component"]["name"], "express");
    assert_eq!(results[1]["component"]["name"], "lodash");
}

#[test]
fn invariant_unhandled_ecosystem_is_unknown_with_reason() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.js"), "import 'lodash';\n").unwrap();
    let components = write_components(
        dir.path(),
        r#"[{"name": "some-gem", "version": "1.0.0", "ecosystem": "rubygems"}]"#,
    );

    let run = analyze(dir.path(), &components);
    let report = run.report.unwrap();
    let result = result_for(&report, "some-gem");
    assert_eq!(result["status"], "unknown");
    assert!(result["reasons"].as_array().unwrap().contains(&Value::from("no adapter")));
}

#[test]
fn invariant_malformed_component_list_exits_with_usage_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.js"), "").unwrap();
    let components = write_components(dir.path(), r#"[{"version": "1.0.0"}]"#);

    let run = analyze(dir.path(), &components);
    assert_eq!(run.status, 2);
}

#[test]
fn invariant_non_json_component_file_exits_with_usage_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.js"), "").unwrap();
    let components = write_components(dir.path(), "not json at all");

    let run = analyze(dir.path(), &components);
    assert_eq!(run.status, 2);
}

#[test]
fn invariant_json_output_is_well_formed_even_when_clean() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.js"), "console.log('nothing imported');\n").unwrap();
    let components = write_components(dir.path(), r#"[{"name": "lodash", "version": "4.17.21"}]"#);

    let run = analyze(dir.path(), &components);
    let report = run.report.expect("stdout must always be valid JSON");
    assert_eq!(report["summary"]["total"], 1);
    assert_eq!(run.status, 0);
}

#[test]
fn cyclonedx_sbom_is_accepted_as_component_input() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.js"),
        "import { template } from 'lodash';\ntemplate('x');\n",
    )
    .unwrap();
    let components = write_components(
        dir.path(),
        r#"{
            "bomFormat": "CycloneDX",
            "specVersion": "1.5",
            "components": [{"type": "library", "name": "lodash", "version": "4.17.21", "purl": "pkg:npm/lodash@4.17.21"}]
        }"#,
    );

    let run = analyze(dir.path(), &components);
    let report = run.report.unwrap();
    let lodash = result_for(&report, "lodash");
    assert_eq!(lodash["status"], "imported");
}
