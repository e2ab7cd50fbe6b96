//! Pattern-based import extraction for JavaScript/TypeScript.
//!
//! The parser is hand-written and line-oriented rather than grammar-based:
//! it needs only import shape and bound names, and it must stay resilient to
//! syntax it does not fully understand (JSX, decorators, experimental
//! operators). Statements are buffered across lines to balance `{…}`
//! clauses and closed against string-literal boundaries found by scanning
//! for matching quote characters — the `regex` crate has no backreferences
//! or lookaround, so quote matching and brace balancing are done by hand
//! rather than with a single capturing pattern. Forms the parser cannot
//! classify are dropped silently: no phantom imports.

use std::path::Path;

use crate::model::{Binding, ImportKind, ImportRecord, Location};

/// Extract every import statement recognized by §4.2's dialect table from
/// one source file's text.
pub fn extract_imports(source: &str, file: &Path) -> Vec<ImportRecord> {
    let cleaned = strip_comments_and_templates(source);
    let clean_lines: Vec<&str> = cleaned.split('\n').collect();
    let raw_lines: Vec<&str> = source.split('\n').collect();

    let mut records = Vec::new();
    let mut guard_depth: i32 = 0;
    let mut i = 0usize;

    while i < clean_lines.len() {
        let trimmed = clean_lines[i].trim();

        collect_dynamic_imports(clean_lines[i], raw_lines.get(i).copied().unwrap_or(""), i + 1, file, &mut records);

        if looks_like_import_start(trimmed) {
            if let Some((kind, module, is_type_only, end_idx)) = collect_and_classify(&clean_lines, i) {
                let snippet = raw_lines.get(i).copied().unwrap_or(trimmed);
                if let Some(record) = build_record(kind, module, is_type_only, guard_depth > 0, file, i + 1, snippet)
                {
                    records.push(record);
                }
                update_guard_depth(trimmed, &mut guard_depth);
                i = end_idx + 1;
                continue;
            }
        }

        if let Some(record) = try_classify_require_line(trimmed, file, i + 1, raw_lines.get(i).copied().unwrap_or(trimmed), guard_depth > 0)
        {
            records.push(record);
        }

        update_guard_depth(trimmed, &mut guard_depth);
        i += 1;
    }

    records
}

// ---------------------------------------------------------------------------
// Comment / template stripping
// ---------------------------------------------------------------------------

/// Blank out `//` and `/* */` comments and the contents of backtick template
/// literals (including any `${…}` interpolation) while preserving newlines,
/// so line numbers reported in [`Location`] stay accurate. String literal
/// content is otherwise left intact.
pub(super) fn strip_comments_and_templates(source: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Normal,
        Line,
        Block,
        Single,
        Double,
        Template,
    }

    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut state = State::Normal;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match state {
            State::Normal => match c {
                '/' if next == Some('/') => {
                    state = State::Line;
                    out.push_str("  ");
                    i += 2;
                }
                '/' if next == Some('*') => {
                    state = State::Block;
                    out.push_str("  ");
                    i += 2;
                }
                '\'' => {
                    state = State::Single;
                    out.push(c);
                    i += 1;
                }
                '"' => {
                    state = State::Double;
                    out.push(c);
                    i += 1;
                }
                '`' => {
                    state = State::Template;
                    out.push(c);
                    i += 1;
                }
                _ => {
                    out.push(c);
                    i += 1;
                }
            },
            State::Line => {
                out.push(if c == '\n' { '\n' } else { ' ' });
                if c == '\n' {
                    state = State::Normal;
                }
                i += 1;
            }
            State::Block => {
                if c == '*' && next == Some('/') {
                    state = State::Normal;
                    out.push_str("  ");
                    i += 2;
                } else {
                    out.push(if c == '\n' { '\n' } else { ' ' });
                    i += 1;
                }
            }
            State::Single | State::Double => {
                let quote = if state == State::Single { '\'' } else { '"' };
                if c == '\\' && next.is_some() {
                    out.push(c);
                    out.push(next.unwrap());
                    i += 2;
                } else {
                    out.push(c);
                    if c == quote {
                        state = State::Normal;
                    }
                    i += 1;
                }
            }
            State::Template => {
                if c == '\\' && next.is_some() {
                    out.push_str("  ");
                    i += 2;
                } else if c == '`' {
                    out.push('`');
                    state = State::Normal;
                    i += 1;
                } else {
                    out.push(if c == '\n' { '\n' } else { ' ' });
                    i += 1;
                }
            }
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Conditional-load guard tracking (§4.5 step 7, §9 ambiguity)
// ---------------------------------------------------------------------------

/// Any `require` found while `guard_depth > 0` is nested inside a try/catch
/// or an `if` gate — the general rule §9 asks implementations to make
/// explicit. Detection is line-heuristic: a guard opens on a line starting
/// with `try` or `if (` that ends with `{`, and closes on a bare `}` line.
fn update_guard_depth(trimmed: &str, depth: &mut i32) {
    let opens_guard = (trimmed.starts_with("try") || trimmed.starts_with("if (") || trimmed.starts_with("if("))
        && trimmed.ends_with('{');
    if opens_guard {
        *depth += 1;
        return;
    }
    if trimmed == "}" && *depth > 0 {
        *depth -= 1;
    }
}

// ---------------------------------------------------------------------------
// Dynamic import() — an expression, not a statement; scanned per line
// ---------------------------------------------------------------------------

fn collect_dynamic_imports(clean_line: &str, raw_line: &str, line_no: usize, file: &Path, out: &mut Vec<ImportRecord>) {
    let bytes: Vec<char> = clean_line.chars().collect();
    let mut search_from = 0usize;

    while let Some(rel) = clean_line[search_from..].find("import") {
        let start = search_from + rel;
        let prev_is_ident = start > 0 && is_ident_char(bytes[start - 1]);
        let after = start + "import".len();
        let rest = &clean_line[after..];
        let rest_trimmed = rest.trim_start();

        if !prev_is_ident && rest_trimmed.starts_with('(') {
            if let Some(module) = extract_quoted(&rest_trimmed[1..]) {
                out.push(ImportRecord {
                    kind: ImportKind::Dynamic,
                    source: module,
                    bindings: Vec::new(),
                    alias: None,
                    is_type_only: false,
                    is_conditional: false,
                    location: Location::new(file.to_path_buf(), line_no, raw_line),
                });
            }
        }

        search_from = after;
    }
}

pub(super) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

// ---------------------------------------------------------------------------
// Declaration-span blanking for reference scanning (§4.3)
// ---------------------------------------------------------------------------

/// Blank every line that is part of an `import`/`export … from` statement or
/// a `require(...)` declaration, leaving everything else untouched. §4.3
/// excludes declaration sites, property keys, and type positions from
/// `references` — a bound name appearing only where it is declared (e.g. the
/// `clone` in `const { merge, clone } = require('lodash')`) must not count
/// as a reference, or an unused import would never be flagged as such. Takes
/// and returns comment/template-stripped text so line numbers keep lining up
/// with [`strip_comments_and_templates`]'s output.
pub(super) fn blank_declaration_lines(cleaned: &str) -> String {
    let clean_lines: Vec<&str> = cleaned.split('\n').collect();
    let mut blanked: Vec<String> = clean_lines.iter().map(|s| s.to_string()).collect();
    let placeholder_file = Path::new("");

    let mut i = 0usize;
    while i < clean_lines.len() {
        let trimmed = clean_lines[i].trim();

        if looks_like_import_start(trimmed) {
            if let Some((_, _, _, end_idx)) = collect_and_classify(&clean_lines, i) {
                for line in blanked.iter_mut().take(end_idx + 1).skip(i) {
                    *line = blank_line(line);
                }
                i = end_idx + 1;
                continue;
            }
        }

        if try_classify_require_line(trimmed, placeholder_file, 0, trimmed, false).is_some() {
            blanked[i] = blank_line(&blanked[i]);
        }

        i += 1;
    }

    blanked.join("\n")
}

fn blank_line(line: &str) -> String {
    line.chars().map(|_| ' ').collect()
}

// ---------------------------------------------------------------------------
// require(...) — single-line assignment statements
// ---------------------------------------------------------------------------

fn try_classify_require_line(
    trimmed: &str,
    file: &Path,
    line_no: usize,
    raw_line: &str,
    is_conditional: bool,
) -> Option<ImportRecord> {
    let decl = strip_decl_keyword(trimmed)?;
    let (lhs, rhs) = decl.split_once('=')?;
    let lhs = lhs.trim();
    let rhs = rhs.trim();

    let rhs = rhs.strip_prefix("require")?;
    let rhs = rhs.trim_start();
    let rhs = rhs.strip_prefix('(')?;

    let module = extract_quoted(rhs)?;
    let close_rel = rhs.find(')')?;
    let after_close = rhs[close_rel + 1..].trim_start();
    let prop = after_close.strip_prefix('.').map(|rest| {
        rest.chars()
            .take_while(|c| is_ident_char(*c))
            .collect::<String>()
    });

    let location = Location::new(file.to_path_buf(), line_no, raw_line);

    if let Some(inner) = lhs.strip_prefix('{') {
        let inner = inner.trim_end_matches('}').trim_end_matches(';');
        let inner = inner.strip_suffix('}').unwrap_or(inner);
        let names = parse_named_list(inner, ":");
        if names.is_empty() {
            return None;
        }
        return Some(ImportRecord {
            kind: ImportKind::RequireDestructure,
            source: module,
            bindings: names.into_iter().map(|(i, l, _)| Binding { imported: i, local: l }).collect(),
            alias: None,
            is_type_only: false,
            is_conditional,
            location,
        });
    }

    let name = lhs.trim_end_matches(';').trim();
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return None;
    }

    if let Some(prop_name) = prop.filter(|p| !p.is_empty()) {
        return Some(ImportRecord {
            kind: ImportKind::RequireProperty,
            source: module,
            bindings: vec![Binding { imported: prop_name, local: name.to_string() }],
            alias: None,
            is_type_only: false,
            is_conditional,
            location,
        });
    }

    Some(ImportRecord {
        kind: ImportKind::Require,
        source: module,
        bindings: vec![Binding { imported: "*".to_string(), local: name.to_string() }],
        alias: None,
        is_type_only: false,
        is_conditional,
        location,
    })
}

fn strip_decl_keyword(trimmed: &str) -> Option<&str> {
    let trimmed = trimmed.strip_prefix("export").map(str::trim_start).unwrap_or(trimmed);
    for kw in ["const ", "let ", "var "] {
        if let Some(rest) = trimmed.strip_prefix(kw) {
            return Some(rest);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// import / export ... from ... — buffered across lines
// ---------------------------------------------------------------------------

fn looks_like_import_start(trimmed: &str) -> bool {
    if trimmed.starts_with("import") {
        let after = &trimmed["import".len()..];
        return after.is_empty() || !is_ident_char(after.chars().next().unwrap());
    }
    if let Some(rest) = trimmed.strip_prefix("export") {
        return rest.trim_start().starts_with('{');
    }
    false
}

enum ParsedKind {
    Named(Vec<(String, String, bool)>),
    Default(String),
    Namespace(String),
    SideEffect,
    Combined { default_name: String, named: Vec<(String, String, bool)> },
    ReExportNamed(Vec<(String, String, bool)>),
}

const MAX_STATEMENT_LINES: usize = 40;

fn collect_and_classify(clean_lines: &[&str], start: usize) -> Option<(ParsedKind, String, bool, usize)> {
    let mut buffer = String::new();
    let max = MAX_STATEMENT_LINES.min(clean_lines.len().saturating_sub(start));
    for offset in 0..max {
        let idx = start + offset;
        if offset > 0 {
            buffer.push(' ');
        }
        buffer.push_str(clean_lines[idx].trim());
        if let Some((kind, module, type_only)) = classify_import_statement(&buffer) {
            return Some((kind, module, type_only, idx));
        }
    }
    None
}

fn classify_import_statement(stmt: &str) -> Option<(ParsedKind, String, bool)> {
    let stmt = stmt.trim();

    if let Some(rest) = stmt.strip_prefix("export") {
        let rest = rest.trim_start();
        let inner_rest = rest.strip_prefix('{')?;
        let (inside, after_brace) = inner_rest.split_once('}')?;
        let after_from = after_brace.trim_start().strip_prefix("from")?.trim_start();
        let module = extract_quoted(after_from)?;
        let names = parse_named_list(inside, "as");
        if names.is_empty() {
            return None;
        }
        return Some((ParsedKind::ReExportNamed(names), module, false));
    }

    let rest = stmt.strip_prefix("import")?.trim_start();

    if let Some(after_type) = rest.strip_prefix("type ") {
        let (kind, module, _) = classify_import_clause(after_type.trim_start())?;
        return Some((kind, module, true));
    }

    if rest.starts_with('\'') || rest.starts_with('"') {
        let module = extract_quoted(rest)?;
        return Some((ParsedKind::SideEffect, module, false));
    }

    classify_import_clause(rest)
}

fn classify_import_clause(rest: &str) -> Option<(ParsedKind, String, bool)> {
    let rest = rest.trim_start();

    if let Some(after_star) = rest.strip_prefix('*') {
        let after_as = after_star.trim_start().strip_prefix("as")?.trim_start();
        let (alias, after_alias) = split_ident(after_as)?;
        let after_from = after_alias.trim_start().strip_prefix("from")?.trim_start();
        let module = extract_quoted(after_from)?;
        return Some((ParsedKind::Namespace(alias), module, false));
    }

    if let Some(after_brace) = rest.strip_prefix('{') {
        let (inside, after_brace2) = after_brace.split_once('}')?;
        let after_from = after_brace2.trim_start().strip_prefix("from")?.trim_start();
        let module = extract_quoted(after_from)?;
        let names = parse_named_list(inside, "as");
        if names.is_empty() {
            return None;
        }
        return Some((ParsedKind::Named(names), module, false));
    }

    let (default_name, after_default) = split_ident(rest)?;
    if default_name.is_empty() {
        return None;
    }
    let after_default = after_default.trim_start();

    if let Some(after_comma) = after_default.strip_prefix(',') {
        let after_comma = after_comma.trim_start();
        let after_brace = after_comma.strip_prefix('{')?;
        let (inside, after_brace2) = after_brace.split_once('}')?;
        let after_from = after_brace2.trim_start().strip_prefix("from")?.trim_start();
        let module = extract_quoted(after_from)?;
        let names = parse_named_list(inside, "as");
        return Some((ParsedKind::Combined { default_name, named: names }, module, false));
    }

    let after_from = after_default.strip_prefix("from")?.trim_start();
    let module = extract_quoted(after_from)?;
    Some((ParsedKind::Default(default_name), module, false))
}

fn build_record(
    kind: ParsedKind,
    module: String,
    forced_type_only: bool,
    is_conditional: bool,
    file: &Path,
    line: usize,
    snippet: &str,
) -> Option<ImportRecord> {
    let location = Location::new(file.to_path_buf(), line, snippet);

    let (import_kind, bindings, is_type_only) = match kind {
        ParsedKind::SideEffect => (ImportKind::SideEffect, Vec::new(), false),
        ParsedKind::Default(name) => (
            ImportKind::Default,
            vec![Binding { imported: "default".to_string(), local: name }],
            forced_type_only,
        ),
        ParsedKind::Namespace(alias) => (
            ImportKind::Namespace,
            vec![Binding { imported: "*".to_string(), local: alias }],
            forced_type_only,
        ),
        ParsedKind::Named(names) => {
            let (bindings, is_type) = finalize_named(names, forced_type_only);
            if bindings.is_empty() {
                return None;
            }
            (
                if is_type { ImportKind::TypeOnly } else { ImportKind::Named },
                bindings,
                is_type,
            )
        }
        ParsedKind::Combined { default_name, named } => {
            let (mut bindings, _) = finalize_named(named, false);
            bindings.insert(0, Binding { imported: "default".to_string(), local: default_name });
            (ImportKind::Named, bindings, forced_type_only)
        }
        ParsedKind::ReExportNamed(names) => {
            let (bindings, _) = finalize_named(names, false);
            if bindings.is_empty() {
                return None;
            }
            (ImportKind::ReExport, bindings, false)
        }
    };

    if !matches!(import_kind, ImportKind::SideEffect) && bindings.is_empty() {
        return None;
    }

    Some(ImportRecord {
        kind: import_kind,
        source: module,
        bindings,
        alias: None,
        is_type_only,
        is_conditional,
        location,
    })
}

fn finalize_named(names: Vec<(String, String, bool)>, forced_type: bool) -> (Vec<Binding>, bool) {
    if names.is_empty() {
        return (Vec::new(), forced_type);
    }
    if forced_type || names.iter().all(|(_, _, t)| *t) {
        return (
            names.into_iter().map(|(i, l, _)| Binding { imported: i, local: l }).collect(),
            true,
        );
    }
    let filtered = names
        .into_iter()
        .filter(|(_, _, t)| !t)
        .map(|(i, l, _)| Binding { imported: i, local: l })
        .collect();
    (filtered, false)
}

// ---------------------------------------------------------------------------
// Small string utilities — no lookaround / backreferences needed
// ---------------------------------------------------------------------------

/// Find the first quoted literal in `text` and return its contents. Used
/// instead of a regex backreference (unsupported by the `regex` crate) to
/// match the opening and closing quote characters.
pub(super) fn extract_quoted(text: &str) -> Option<String> {
    let bytes: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c == '\'' || c == '"' {
            let quote = c;
            let mut j = i + 1;
            while j < bytes.len() && bytes[j] != quote {
                j += 1;
            }
            if j < bytes.len() {
                return Some(bytes[i + 1..j].iter().collect());
            }
            return None;
        }
        i += 1;
    }
    None
}

fn split_ident(s: &str) -> Option<(String, &str)> {
    let s = s.trim_start();
    let end = s.find(|c: char| !is_ident_char(c)).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((s[..end].to_string(), &s[end..]))
}

/// Split a `{ … }` clause body on top-level commas and classify each part
/// as `(imported, local, is_type_only)`. `sep` is `"as"` for ESM rename
/// syntax or `":"` for CJS destructure rename syntax.
fn parse_named_list(inside: &str, sep: &str) -> Vec<(String, String, bool)> {
    inside
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|part| {
            let (part, is_type) = match part.strip_prefix("type ") {
                Some(rest) => (rest.trim(), true),
                None => (part, false),
            };
            if sep == "as" {
                if let Some((imported, local)) = part.split_once(" as ") {
                    Some((imported.trim().to_string(), local.trim().to_string(), is_type))
                } else if !part.is_empty() {
                    Some((part.to_string(), part.to_string(), is_type))
                } else {
                    None
                }
            } else if let Some((key, renamed)) = part.split_once(':') {
                Some((key.trim().to_string(), renamed.trim().to_string(), is_type))
            } else if !part.is_empty() {
                Some((part.to_string(), part.to_string(), is_type))
            } else {
                None
            }
        })
        .collect()
}
