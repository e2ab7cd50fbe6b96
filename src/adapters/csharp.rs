use regex::Regex;

use crate::adapters::regex_pack::PatternPack;
use crate::language::LanguageKind;

/// `using Newtonsoft.Json;` — NuGet package names rarely match the
/// namespace exactly, so this adapter falls back to title-casing the
/// package name and flags those matches low-confidence (§9).
pub fn adapter() -> PatternPack {
    PatternPack {
        kind: LanguageKind::CSharp,
        language_tag: "csharp",
        import_pattern: Regex::new(r"using\s+([A-Za-z0-9_.]+)\s*;").expect("static pattern is valid"),
        infers_namespace: true,
    }
}
