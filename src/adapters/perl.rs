use regex::Regex;

use crate::adapters::regex_pack::PatternPack;
use crate::language::LanguageKind;

/// `use LWP::UserAgent;` — CPAN distribution names already match the
/// module path closely enough that no namespace inference is needed.
pub fn adapter() -> PatternPack {
    PatternPack {
        kind: LanguageKind::Perl,
        language_tag: "perl",
        import_pattern: Regex::new(r"use\s+([A-Za-z0-9_:]+)\s*;").expect("static pattern is valid"),
        infers_namespace: false,
    }
}
