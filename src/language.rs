/// The set of ecosystems the dispatcher can hand components to (§4.6).
///
/// A plain enum, not trait objects, mirroring the teacher's choice for
/// `LanguageKind` — cheap to copy, pattern-matched at dispatch boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageKind {
    JavaScriptTypeScript,
    Dart,
    CSharp,
    Php,
    Swift,
    Perl,
    Scala,
    Clojure,
}

impl LanguageKind {
    /// The ecosystem tag this language's imports are matched against when
    /// filtering the component list (§4.6: "each recognized ecosystem tag").
    pub fn ecosystem_tags(&self) -> &'static [&'static str] {
        match self {
            LanguageKind::JavaScriptTypeScript => &["npm"],
            LanguageKind::Dart => &["pub"],
            LanguageKind::CSharp => &["nuget"],
            LanguageKind::Php => &["composer", "packagist"],
            LanguageKind::Swift => &["swift", "spm"],
            LanguageKind::Perl => &["cpan"],
            LanguageKind::Scala => &["maven", "sbt"],
            LanguageKind::Clojure => &["clojars", "maven"],
        }
    }

    pub fn file_extensions(&self) -> &'static [&'static str] {
        match self {
            LanguageKind::JavaScriptTypeScript => &["ts", "tsx", "js", "jsx", "mjs", "cjs"],
            LanguageKind::Dart => &["dart"],
            LanguageKind::CSharp => &["cs"],
            LanguageKind::Php => &["php"],
            LanguageKind::Swift => &["swift"],
            LanguageKind::Perl => &["pl", "pm"],
            LanguageKind::Scala => &["scala", "sc"],
            LanguageKind::Clojure => &["clj", "cljs", "cljc"],
        }
    }

    /// Manifest file names that, if present at the project root, signal this
    /// language is in play (§4.6 `canHandle`).
    pub fn manifest_files(&self) -> &'static [&'static str] {
        match self {
            LanguageKind::JavaScriptTypeScript => &["package.json", "tsconfig.json"],
            LanguageKind::Dart => &["pubspec.yaml"],
            LanguageKind::CSharp => &[],
            LanguageKind::Php => &["composer.json"],
            LanguageKind::Swift => &["Package.swift"],
            LanguageKind::Perl => &[],
            LanguageKind::Scala => &["build.sbt"],
            LanguageKind::Clojure => &["deps.edn", "project.clj"],
        }
    }
}

/// Per-language ignore-glob sets applied on top of `.gitignore` and any
/// user-configured `exclude` patterns (§4.1).
pub fn default_ignore_globs(lang: LanguageKind) -> &'static [&'static str] {
    match lang {
        LanguageKind::JavaScriptTypeScript => &[
            "**/node_modules/**",
            "**/dist/**",
            "**/build/**",
            "**/.next/**",
            "**/*.min.js",
        ],
        LanguageKind::Dart => &["**/.dart_tool/**", "**/build/**"],
        LanguageKind::CSharp => &["**/bin/**", "**/obj/**"],
        LanguageKind::Php => &["**/vendor/**"],
        LanguageKind::Swift => &["**/.build/**", "**/DerivedData/**"],
        LanguageKind::Perl => &["**/blib/**"],
        LanguageKind::Scala => &["**/target/**", "**/project/target/**"],
        LanguageKind::Clojure => &["**/target/**", "**/.cpcache/**"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_disjoint_enough_to_dispatch() {
        assert!(LanguageKind::JavaScriptTypeScript.file_extensions().contains(&"ts"));
        assert!(LanguageKind::Dart.file_extensions().contains(&"dart"));
        assert!(!LanguageKind::Dart.file_extensions().contains(&"ts"));
    }
}
