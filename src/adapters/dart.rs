use regex::Regex;

use crate::adapters::regex_pack::PatternPack;
use crate::language::LanguageKind;

/// `import 'package:http/http.dart' as http;` — captures the package segment
/// right after `package:`.
pub fn adapter() -> PatternPack {
    PatternPack {
        kind: LanguageKind::Dart,
        language_tag: "dart",
        import_pattern: Regex::new(r#"import\s+['"]package:([A-Za-z0-9_]+)/"#).expect("static pattern is valid"),
        infers_namespace: false,
    }
}
