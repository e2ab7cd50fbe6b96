use regex::Regex;

use crate::adapters::regex_pack::PatternPack;
use crate::language::LanguageKind;

/// `import akka.actor.ActorSystem` — sbt/Maven coordinates usually share a
/// prefix with the import path closely enough to match directly.
pub fn adapter() -> PatternPack {
    PatternPack {
        kind: LanguageKind::Scala,
        language_tag: "scala",
        import_pattern: Regex::new(r"import\s+([A-Za-z0-9_.]+)").expect("static pattern is valid"),
        infers_namespace: false,
    }
}
