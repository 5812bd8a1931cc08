//! Argument extraction - ordered pattern cascades per intent
//!
//! Each intent has an ordered list of candidate patterns tried in
//! sequence; the first structural match wins and later patterns are never
//! consulted. Highly specific templates ("make a file of LANG with name
//! of NAME") are listed before generic fallbacks ("create file NAME").
//!
//! Two-group file patterns bind (language hint, bare name); one-group
//! patterns bind the bare name only.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language;

/// Sentinel used when no function name can be extracted, so remove/replace
/// operations stay callable without throwing.
pub const UNKNOWN_FUNCTION: &str = "unknownFunction";

lazy_static! {
    // File creation, most specific first. Two capture groups = (lang, name).
    static ref FILE_PATTERNS: Vec<(Regex, bool)> = vec![
        // "make a file of css with name of style" -> style.css
        (Regex::new(r"(?i)make\s+(?:a\s+)?file\s+of\s+(\w+)\s+with\s+name\s+(?:of\s+)?(.+)").unwrap(), true),
        // "create a python file named calculator" -> calculator.py
        (Regex::new(r"(?i)(?:create|make)\s+(?:a\s+)?(\w+)\s+file\s+(?:named|called)\s+([A-Za-z_][\w.]*)").unwrap(), true),
        // "make css file with name style" -> style.css
        (Regex::new(r"(?i)make\s+(\w+)\s+file\s+with\s+name\s+([A-Za-z_][\w.]*)").unwrap(), true),
        // "create file style.css" (name may carry its own extension)
        (Regex::new(r"(?i)(?:create|make|new)\s+file\s+(\S+)").unwrap(), false),
        // "create style.css file"
        (Regex::new(r"(?i)(?:create|make|new)\s+(.+)\s+file").unwrap(), false),
    ];

    static ref FOLDER_PATTERNS: Vec<Regex> = vec![
        // "create folder 'my folder'"
        Regex::new(r#"(?i)(?:create|make|new)\s+folder\s+['"](.*?)['"]"#).unwrap(),
        // "create folder components"
        Regex::new(r"(?i)(?:create|make|new)\s+folder\s+(.+)").unwrap(),
        // "create components folder"
        Regex::new(r"(?i)(?:create|make|new)\s+(.+)\s+folder").unwrap(),
    ];

    static ref DELETE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:delete|remove)\s+(?:the\s+)?file\s+(.+)").unwrap(),
        Regex::new(r"(?i)(?:delete|remove)\s+(?:the\s+)?folder\s+(.+)").unwrap(),
        Regex::new(r"(?i)(?:delete|remove)\s+(?:the\s+)?(.+?)\s+(?:file|folder)").unwrap(),
        Regex::new(r"(?i)(?:delete|remove)\s+(?:the\s+)?(.+)").unwrap(),
    ];

    // Patterns over-capture filler words; strip them after matching.
    static ref DELETE_STOPWORDS: Regex = Regex::new(r"(?i)\b(file|folder|the|a|an)\b").unwrap();

    static ref FUNCTION_NAME: Regex = Regex::new(r"(?i)function\s+(\w+)|(\w+)\s+function").unwrap();
    static ref MODIFY_FUNCTION_NAME: Regex =
        Regex::new(r#"(?i)(?:change|modify|update)\s+(?:the\s+)?function\s+["']?([^"'\s]+)"#).unwrap();

    static ref LINE_NUMBER: Regex = Regex::new(r"(?i)line\s+(\d+)").unwrap();
    static ref LINE_CONTENT_QUOTED: Regex = Regex::new(r#"(?i)(?:to|with)\s+"([^"]+)""#).unwrap();
    static ref LINE_CONTENT_BARE: Regex = Regex::new(r"(?i)(?:to|with)\s+(.+)").unwrap();

    static ref RENAME: Regex =
        Regex::new(r#"(?i)rename\s+(?:file\s+|folder\s+)?["']?([^"'\s]+)["']?\s+to\s+["']?([^"'\s]+)["']?"#).unwrap();
    static ref CHANGE_NAME: Regex =
        Regex::new(r#"(?i)change\s+(?:the\s+)?name\s+of\s+["']?([^"'\s]+)["']?\s+to\s+["']?([^"'\s]+)["']?"#).unwrap();
}

/// File-name extraction result: final name (extension policy applied) plus
/// the canonical language resolved from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNameExtraction {
    pub file_name: String,
    pub language: String,
}

fn timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Extract the file name for a create-file command. Never fails: when no
/// pattern matches, a `new_file_<timestamp>` name is synthesized.
pub fn extract_file_name(command: &str) -> FileNameExtraction {
    let mut name = String::new();
    let mut hint: Option<String> = None;

    for (pattern, has_language_group) in FILE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(command) {
            if *has_language_group {
                hint = caps.get(1).map(|m| m.as_str().to_lowercase());
                name = caps.get(2).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
            } else {
                name = caps.get(1).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
            }
            break;
        }
    }

    if name.is_empty() {
        let fallback = format!("new_file_{}", timestamp_millis());
        return FileNameExtraction {
            language: language::PLAIN_TEXT.to_string(),
            file_name: fallback,
        };
    }

    // User-supplied extension wins over any language hint.
    if name.contains('.') {
        let language = language::language_from_file_name(&name).to_string();
        return FileNameExtraction { file_name: name, language };
    }

    let resolved = hint
        .filter(|h| language::is_known_language(h))
        .or_else(|| language::detect_language_hint(command).map(str::to_string))
        .unwrap_or_else(|| language::PLAIN_TEXT.to_string());
    let file_name = format!("{}{}", name, language::extension_for(&resolved));
    let language = language::language_from_file_name(&file_name).to_string();
    FileNameExtraction { file_name, language }
}

/// Extract the folder name for a create-folder command; synthesizes a
/// `new_folder_<timestamp>` default.
pub fn extract_folder_name(command: &str) -> String {
    for pattern in FOLDER_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(command) {
            if let Some(m) = caps.get(1) {
                let name = m.as_str().trim();
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }
    }
    format!("new_folder_{}", timestamp_millis())
}

/// Extract the target of an explicit delete command. Stray filler words
/// are stripped from the capture; returns None when nothing usable is left.
pub fn extract_deletion_target(command: &str) -> Option<String> {
    for pattern in DELETE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(command) {
            if let Some(m) = caps.get(1) {
                let cleaned = DELETE_STOPWORDS.replace_all(m.as_str(), "");
                let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
                if !cleaned.is_empty() {
                    return Some(cleaned);
                }
            }
        }
    }
    None
}

/// Extract a function name via "function NAME" / "NAME function"; falls
/// back to the sentinel so callers are always callable.
pub fn extract_function_name(command: &str) -> String {
    if let Some(caps) = FUNCTION_NAME.captures(command) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            return m.as_str().to_string();
        }
    }
    UNKNOWN_FUNCTION.to_string()
}

/// Function name for a modify-function command; this one reports failure
/// instead of guessing.
pub fn extract_modify_function_name(command: &str) -> Option<String> {
    MODIFY_FUNCTION_NAME
        .captures(command)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Line-edit arguments: 1-based line number (default 1) and the new
/// content (quoted capture preferred).
pub fn extract_line_edit(command: &str) -> (usize, String) {
    let line = LINE_NUMBER
        .captures(command)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .unwrap_or(1);

    let content = LINE_CONTENT_QUOTED
        .captures(command)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .or_else(|| {
            LINE_CONTENT_BARE
                .captures(command)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .unwrap_or_default();

    (line, content)
}

/// Rename arguments (old name, new name). Both captures are required;
/// None means the command could not be understood and should be reported,
/// not guessed.
pub fn extract_rename(command: &str) -> Option<(String, String)> {
    let caps = RENAME.captures(command).or_else(|| CHANGE_NAME.captures(command))?;
    let old_name = caps.get(1)?.as_str().to_string();
    let new_name = caps.get(2)?.as_str().to_string();
    Some((old_name, new_name))
}

// =============================================================================
// FILE-CREATION PROBE (generation endpoint)
// =============================================================================

/// What the generation endpoint learned about a prompt that looks like a
/// file-creation command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCreationProbe {
    pub is_file_creation: bool,
    pub file_name: Option<String>,
    pub language: Option<String>,
    pub extension: Option<String>,
}

impl FileCreationProbe {
    fn negative() -> Self {
        Self {
            is_file_creation: false,
            file_name: None,
            language: None,
            extension: None,
        }
    }
}

lazy_static! {
    static ref CREATION_PROBES: Vec<Regex> = vec![
        Regex::new(r"(?i)create.*file.*with.*name").unwrap(),
        Regex::new(r"(?i)make.*file.*with.*name").unwrap(),
        Regex::new(r"(?i)make.*file.*named").unwrap(),
        Regex::new(r"(?i)create.*file.*called").unwrap(),
        Regex::new(r"(?i)generate.*file.*with.*name").unwrap(),
        Regex::new(r"(?i)new.*file.*named").unwrap(),
        Regex::new(r"(?i)build.*file.*called").unwrap(),
    ];

    static ref PROBE_NAME_PATTERNS: Vec<(Regex, bool)> = vec![
        // "make a java file with the name of app" -> (java, app)
        (Regex::new(r"(?i)(?:make|create)\s+(?:a\s+)?(\w+)\s+file\s+with\s+(?:the\s+)?name\s+of\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(), true),
        // "create a python file named calculator" -> (python, calculator)
        (Regex::new(r"(?i)(?:create|make)\s+(?:a\s+)?(\w+)\s+file\s+(?:named|called)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(), true),
        // "make css file with name style" -> (css, style)
        (Regex::new(r"(?i)make\s+(\w+)\s+file\s+with\s+name\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap(), true),
        // General fallbacks, name only
        (Regex::new(r"(?i)(?:name|named|called)\s+(?:of\s+)?([A-Za-z_][A-Za-z0-9_]*)").unwrap(), false),
        (Regex::new(r"(?i)with\s+name\s+(?:of\s+)?([A-Za-z_][A-Za-z0-9_]*)").unwrap(), false),
    ];

    // Language names probed by substring, longest/most specific first so
    // "javascript" is not shadowed by "java".
    static ref PROBE_LANGUAGES: Vec<&'static str> = vec![
        "javascript", "typescript", "python", "markdown", "kotlin", "swift",
        "ruby", "rust", "java", "html", "yaml", "json", "dart", "css", "sql",
        "php", "xml", "c++", "go",
    ];
}

/// Inspect a generation prompt for a file-creation command, extracting the
/// target name, language, and extension when present.
pub fn detect_file_creation(prompt: &str) -> FileCreationProbe {
    if !CREATION_PROBES.iter().any(|p| p.is_match(prompt)) {
        return FileCreationProbe::negative();
    }

    let lower = prompt.to_lowercase();
    let mut detected = PROBE_LANGUAGES
        .iter()
        .copied()
        .find(|lang| lower.contains(lang))
        .map(str::to_string);

    let mut file_name: Option<String> = None;
    for (pattern, has_language_group) in PROBE_NAME_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(prompt) {
            if *has_language_group {
                if let Some(name) = caps.get(2) {
                    file_name = Some(name.as_str().to_string());
                    if detected.is_none() {
                        let hint = caps.get(1).map(|m| m.as_str().to_lowercase());
                        detected = hint.filter(|h| language::is_known_language(h));
                    }
                    break;
                }
            } else if let Some(name) = caps.get(1) {
                file_name = Some(name.as_str().to_string());
                break;
            }
        }
    }

    let extension = detected.as_deref().map(language::extension_for);
    if let (Some(name), Some(ext)) = (file_name.as_mut(), extension) {
        if !name.contains('.') {
            name.push_str(ext);
        }
    }

    FileCreationProbe {
        is_file_creation: true,
        file_name,
        language: detected,
        extension: extension.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_with_language_hint() {
        // "make a file of css with name of style" -> style.css
        let result = extract_file_name("make a file of css with name of style");
        assert_eq!(result.file_name, "style.css");
        assert_eq!(result.language, "css");
    }

    #[test]
    fn test_file_name_named_pattern() {
        let result = extract_file_name("create a python file named calculator");
        assert_eq!(result.file_name, "calculator.py");
        assert_eq!(result.language, "python");
    }

    #[test]
    fn test_file_name_called_pattern() {
        let result = extract_file_name("make a javascript file called app");
        assert_eq!(result.file_name, "app.js");
        assert_eq!(result.language, "javascript");
    }

    #[test]
    fn test_file_name_embedded_extension_wins() {
        let result = extract_file_name("create file style.css");
        assert_eq!(result.file_name, "style.css");
        assert_eq!(result.language, "css");
    }

    #[test]
    fn test_file_name_unknown_language_gets_txt() {
        let result = extract_file_name("make a file of blorp with name of notes");
        assert_eq!(result.file_name, "notes.txt");
        assert_eq!(result.language, "text");
    }

    #[test]
    fn test_file_name_default_is_synthesized() {
        let result = extract_file_name("please do something");
        assert!(result.file_name.starts_with("new_file_"));
    }

    #[test]
    fn test_folder_name() {
        assert_eq!(extract_folder_name("create folder components"), "components");
        assert_eq!(extract_folder_name("create folder 'my stuff'"), "my stuff");
        assert_eq!(extract_folder_name("make a components folder"), "a components");
    }

    #[test]
    fn test_deletion_target() {
        assert_eq!(
            extract_deletion_target("delete file style.css").as_deref(),
            Some("style.css")
        );
        assert_eq!(
            extract_deletion_target("remove the folder components").as_deref(),
            Some("components")
        );
        // stopwords stripped from an over-capturing match
        assert_eq!(
            extract_deletion_target("remove the style.css file").as_deref(),
            Some("style.css")
        );
        assert_eq!(extract_deletion_target("delete the file").is_some(), false);
    }

    #[test]
    fn test_function_name() {
        assert_eq!(extract_function_name("remove function addNumbers"), "addNumbers");
        assert_eq!(extract_function_name("delete the greet function"), "greet");
        assert_eq!(extract_function_name("remove something else"), UNKNOWN_FUNCTION);
    }

    #[test]
    fn test_modify_function_name() {
        assert_eq!(
            extract_modify_function_name("update the function greet").as_deref(),
            Some("greet")
        );
        assert!(extract_modify_function_name("update everything").is_none());
    }

    #[test]
    fn test_line_edit() {
        let (line, content) = extract_line_edit("change line 5 to \"console.log('hi')\"");
        assert_eq!(line, 5);
        assert_eq!(content, "console.log('hi')");

        let (line, content) = extract_line_edit("edit line 2 with return x");
        assert_eq!(line, 2);
        assert_eq!(content, "return x");

        let (line, _) = extract_line_edit("change the line");
        assert_eq!(line, 1);
    }

    #[test]
    fn test_rename() {
        assert_eq!(
            extract_rename("rename app.py to main.py"),
            Some(("app.py".to_string(), "main.py".to_string()))
        );
        assert_eq!(
            extract_rename("change the name of style.css to theme.css"),
            Some(("style.css".to_string(), "theme.css".to_string()))
        );
        assert!(extract_rename("rename something").is_none());
    }

    #[test]
    fn test_file_creation_probe() {
        let probe = detect_file_creation("make a java file with the name of app");
        assert!(probe.is_file_creation);
        assert_eq!(probe.file_name.as_deref(), Some("app.java"));
        assert_eq!(probe.language.as_deref(), Some("java"));
        assert_eq!(probe.extension.as_deref(), Some(".java"));
    }

    #[test]
    fn test_file_creation_probe_negative() {
        let probe = detect_file_creation("create a function that adds two numbers");
        assert!(!probe.is_file_creation);
        assert!(probe.file_name.is_none());
    }
}
