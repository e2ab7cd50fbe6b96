use regex::Regex;

use crate::adapters::regex_pack::PatternPack;
use crate::language::LanguageKind;

/// `use GuzzleHttp\Client;` — Composer package names (`vendor/name`) rarely
/// match the PHP namespace, so unmatched imports are also tried against a
/// title-cased form of the package name (§9).
pub fn adapter() -> PatternPack {
    PatternPack {
        kind: LanguageKind::Php,
        language_tag: "php",
        import_pattern: Regex::new(r"use\s+([A-Za-z0-9_\\]+)\s*;").expect("static pattern is valid"),
        infers_namespace: true,
    }
}
