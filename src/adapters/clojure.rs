use regex::Regex;

use crate::adapters::regex_pack::PatternPack;
use crate::language::LanguageKind;

/// `(:require [ring.adapter.jetty :as jetty])` — captures the namespace
/// symbol inside a `:require` vector.
pub fn adapter() -> PatternPack {
    PatternPack {
        kind: LanguageKind::Clojure,
        language_tag: "clojure",
        import_pattern: Regex::new(r":require\s*\[([A-Za-z0-9_.\-]+)").expect("static pattern is valid"),
        infers_namespace: false,
    }
}
