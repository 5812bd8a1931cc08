//! Language/extension resolver.
//!
//! Pure lookups over a fixed, closed mapping. Unknown input resolves to
//! plain text, never errors.

/// Canonical language id used when nothing else can be resolved.
pub const PLAIN_TEXT: &str = "text";

/// File extension for the plain-text fallback.
pub const PLAIN_TEXT_EXTENSION: &str = ".txt";

const EXTENSIONS: &[(&str, &str)] = &[
    ("python", ".py"),
    ("py", ".py"),
    ("javascript", ".js"),
    ("js", ".js"),
    ("typescript", ".ts"),
    ("ts", ".ts"),
    ("java", ".java"),
    ("c", ".c"),
    ("c++", ".cpp"),
    ("cpp", ".cpp"),
    ("c#", ".cs"),
    ("csharp", ".cs"),
    ("cs", ".cs"),
    ("go", ".go"),
    ("rust", ".rs"),
    ("php", ".php"),
    ("ruby", ".rb"),
    ("swift", ".swift"),
    ("kotlin", ".kt"),
    ("dart", ".dart"),
    ("html", ".html"),
    ("css", ".css"),
    ("json", ".json"),
    ("xml", ".xml"),
    ("yaml", ".yaml"),
    ("yml", ".yml"),
    ("sql", ".sql"),
    ("markdown", ".md"),
    ("md", ".md"),
    ("text", ".txt"),
    ("txt", ".txt"),
];

/// Resolve a language name or hint token to a file extension.
/// Unknown languages get the plain-text extension.
pub fn extension_for(language: &str) -> &'static str {
    let lower = language.to_lowercase();
    EXTENSIONS
        .iter()
        .find(|(lang, _)| *lang == lower)
        .map(|(_, ext)| *ext)
        .unwrap_or(PLAIN_TEXT_EXTENSION)
}

/// Whether a hint token names a known language.
pub fn is_known_language(hint: &str) -> bool {
    let lower = hint.to_lowercase();
    EXTENSIONS.iter().any(|(lang, _)| *lang == lower)
}

/// Resolve a raw file extension (without the dot) back to a canonical
/// language id. Used when a file is opened by name rather than created by
/// voice command.
pub fn language_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "py" => "python",
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "java" => "java",
        "c" => "c",
        "cpp" | "cc" | "cxx" => "c++",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "php" => "php",
        "rb" => "ruby",
        "swift" => "swift",
        "kt" => "kotlin",
        "dart" => "dart",
        "html" | "htm" => "html",
        "css" => "css",
        "json" => "json",
        "xml" => "xml",
        "yaml" | "yml" => "yaml",
        "sql" => "sql",
        "md" => "markdown",
        _ => PLAIN_TEXT,
    }
}

/// Resolve the canonical language for a full file name from its extension.
pub fn language_from_file_name(file_name: &str) -> &'static str {
    file_name
        .rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty() && *ext != file_name)
        .map(language_for_extension)
        .unwrap_or(PLAIN_TEXT)
}

/// Detect a language hint from the surrounding command text
/// ("create a stylesheet called main" -> css).
pub fn detect_language_hint(command: &str) -> Option<&'static str> {
    const KEYWORDS: &[(&str, &[&str])] = &[
        ("css", &["css", "style", "stylesheet"]),
        ("html", &["html", "webpage", "page"]),
        ("javascript", &["javascript", "js", "script"]),
        ("python", &["python", "py"]),
        ("java", &["java"]),
        ("typescript", &["typescript", "ts"]),
        ("json", &["json", "config"]),
        ("markdown", &["markdown", "md", "readme"]),
    ];

    let lower = command.to_lowercase();
    for (lang, keywords) in KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return Some(lang);
        }
    }
    None
}
