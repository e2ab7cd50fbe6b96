use regex::Regex;

use crate::adapters::regex_pack::PatternPack;
use crate::language::LanguageKind;

/// `import Alamofire` — Swift Package Manager repository names often differ
/// from the imported module name, so this adapter also tries a
/// title-cased form of the package name (§9).
pub fn adapter() -> PatternPack {
    PatternPack {
        kind: LanguageKind::Swift,
        language_tag: "swift",
        import_pattern: Regex::new(r"import\s+([A-Za-z_][A-Za-z0-9_]*)").expect("static pattern is valid"),
        infers_namespace: true,
    }
}
