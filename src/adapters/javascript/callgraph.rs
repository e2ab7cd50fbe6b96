//! Call and reference extraction for JavaScript/TypeScript (§4.3).
//!
//! Like the import parser, this stays regex/string based rather than
//! building an AST: a call site is recognized as `<dotted-path>(`, optionally
//! preceded by `new`, scanned over the same comment/template-stripped text
//! the import parser produces. Both the full dotted path and its final
//! segment are recorded in `called_functions` (§9: permissive by design — a
//! namespace import's member call should register under either spelling).

use std::path::Path;

use regex::Regex;
use std::sync::OnceLock;

use crate::adapters::javascript::imports::{
    blank_declaration_lines, extract_quoted, is_ident_char, strip_comments_and_templates,
};
use crate::model::{CallGraph, CallSite, DynamicCodeKind, DynamicCodeWarning, Location};

fn call_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(new\s+)?([A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*|\s*\?\.\s*[A-Za-z_$][\w$]*)*)\s*\(")
            .expect("static call pattern is valid")
    })
}

fn bare_identifier_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z_$][\w$]*").expect("static identifier pattern is valid"))
}

/// The comma-operator indirect-eval trick: `(0, eval)(...)` (or any other
/// literal left operand) calls the global `eval` without going through a
/// property access, so it never matches `call_pattern`'s leading-identifier
/// requirement and needs its own pattern (§4.3).
fn indirect_eval_sequence_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\(\s*[^()]*?,\s*eval\s*\)\s*\(").expect("static indirect eval pattern is valid")
    })
}

/// Extract every call site, bare reference, and dynamic-code-execution
/// warning from one source file.
pub fn extract_call_graph(source: &str, file: &Path) -> CallGraph {
    let cleaned = strip_comments_and_templates(source);
    let lines: Vec<&str> = source.split('\n').collect();

    let mut graph = CallGraph::default();
    let mut called_spans: Vec<(usize, usize)> = Vec::new();

    for mat in call_pattern().captures_iter(&cleaned) {
        let whole = mat.get(0).unwrap();
        let is_constructor = mat.get(1).is_some();
        let callee_raw = mat.get(2).unwrap().as_str();
        let callee: String = callee_raw.chars().filter(|c| !c.is_whitespace()).collect();
        let callee = callee.replace("?.", ".");

        let line_no = line_number_at(&cleaned, whole.start());
        let snippet = lines.get(line_no - 1).copied().unwrap_or("");
        let location = Location::new(file.to_path_buf(), line_no, snippet);

        if let Some(kind) = dynamic_code_kind(&callee, &cleaned, whole.end()) {
            graph.dynamic_code_warnings.push(DynamicCodeWarning { kind, location: location.clone() });
        }

        graph.called_functions.insert(callee.clone());
        if let Some(last) = callee.rsplit('.').next() {
            graph.called_functions.insert(last.to_string());
        }

        called_spans.push((whole.start(), whole.end()));
        graph.calls.push(CallSite { callee, is_constructor, location });
    }

    for mat in indirect_eval_sequence_pattern().find_iter(&cleaned) {
        let line_no = line_number_at(&cleaned, mat.start());
        let snippet = lines.get(line_no - 1).copied().unwrap_or("");
        let location = Location::new(file.to_path_buf(), line_no, snippet);

        graph
            .dynamic_code_warnings
            .push(DynamicCodeWarning { kind: DynamicCodeKind::IndirectEval, location: location.clone() });
        graph.called_functions.insert("eval".to_string());
        called_spans.push((mat.start(), mat.end()));
        graph.calls.push(CallSite { callee: "eval".to_string(), is_constructor: false, location });
    }

    let reference_scan_text = blank_declaration_lines(&cleaned);

    for mat in bare_identifier_pattern().find_iter(&reference_scan_text) {
        if called_spans.iter().any(|(s, e)| mat.start() >= *s && mat.start() < *e) {
            continue;
        }
        let name = mat.as_str();
        if is_reserved_word(name) {
            continue;
        }
        if graph.called_functions.contains(name) {
            continue;
        }
        graph.references.insert(name.to_string());
    }

    graph
}

fn line_number_at(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].bytes().filter(|b| *b == b'\n').count() + 1
}

/// Classify a call as one of the closed dynamic-code-execution kinds,
/// distinguishing direct `eval(...)` from indirect forms like
/// `window.eval(...)` or `(0, eval)(...)`, and flagging `setTimeout`/
/// `setInterval` only when their first argument is a string literal rather
/// than a function.
fn dynamic_code_kind(callee: &str, cleaned: &str, args_start: usize) -> Option<DynamicCodeKind> {
    let last_segment = callee.rsplit('.').next().unwrap_or(callee);

    if callee == "eval" {
        return Some(DynamicCodeKind::Eval);
    }
    if last_segment == "eval" && callee.contains('.') {
        return Some(DynamicCodeKind::IndirectEval);
    }
    if callee == "Function" {
        return Some(DynamicCodeKind::Function);
    }
    if callee == "execScript" || last_segment == "execScript" {
        return Some(DynamicCodeKind::ExecScript);
    }
    if callee == "setTimeout" || last_segment == "setTimeout" {
        if first_arg_is_string(cleaned, args_start) {
            return Some(DynamicCodeKind::SetTimeoutString);
        }
        return None;
    }
    if callee == "setInterval" || last_segment == "setInterval" {
        if first_arg_is_string(cleaned, args_start) {
            return Some(DynamicCodeKind::SetIntervalString);
        }
        return None;
    }
    None
}

fn first_arg_is_string(cleaned: &str, args_start: usize) -> bool {
    let rest = &cleaned[args_start..];
    let trimmed = rest.trim_start();
    (trimmed.starts_with('\'') || trimmed.starts_with('"')) && extract_quoted(trimmed).is_some()
}

fn is_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "if" | "else"
            | "for"
            | "while"
            | "do"
            | "switch"
            | "case"
            | "break"
            | "continue"
            | "return"
            | "function"
            | "const"
            | "let"
            | "var"
            | "class"
            | "extends"
            | "new"
            | "typeof"
            | "instanceof"
            | "in"
            | "of"
            | "try"
            | "catch"
            | "finally"
            | "throw"
            | "this"
            | "super"
            | "import"
            | "export"
            | "default"
            | "from"
            | "as"
            | "async"
            | "await"
            | "yield"
            | "true"
            | "false"
            | "null"
            | "undefined"
            | "void"
    ) || !name.chars().next().map(is_ident_char).unwrap_or(false)
}
