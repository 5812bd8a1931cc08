//! Intent classifier - ordered keyword cascade over the command text
//!
//! An explicit ordered list of (predicate, intent) pairs, evaluated first
//! match wins. Ordering is load-bearing: destructive and more specific
//! intents must be checked before the broad "contains function" and
//! "contains change" branches. All matching is case-insensitive substring
//! matching on the whole command; classification never fails - the final
//! entry is the generate fallback.

use serde::{Deserialize, Serialize};

/// Action family for a voice command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// "delete that" / "remove it" - resolve target from action history.
    DeleteLast,
    /// "delete file style.css" - explicit target.
    DeleteNamed,
    Rename,
    ModifyFunction,
    CreateFolder,
    CreateFile,
    /// Regenerate the open file's code from a description.
    ModifyCode,
    RemoveFunction,
    ReplaceFunction,
    EditLine,
    Debug,
    /// Fallback: generate code into the pending slot.
    Generate,
}

/// Per-command facts the predicates need beyond the text itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyContext {
    /// Whether a file is currently open in the editor.
    pub file_open: bool,
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn is_delete(text: &str) -> bool {
    contains_any(text, &["delete", "remove"])
}

fn names_node(text: &str) -> bool {
    contains_any(text, &["file", "folder"])
}

fn is_deictic(text: &str) -> bool {
    contains_any(text, &["that", "it", "this", "last", "recent"])
}

fn is_change(text: &str) -> bool {
    contains_any(text, &["change", "modify", "update"])
}

fn is_create(text: &str) -> bool {
    contains_any(text, &["create", "make", "new"])
}

type Predicate = fn(&str, &ClassifyContext) -> bool;

/// The cascade, highest priority first. Kept as data so the ordering is
/// auditable and each predicate unit-testable.
const RULES: &[(Predicate, Intent)] = &[
    // Deictic deletes need no file/folder token: "delete that" suffices.
    (|t, _| is_delete(t) && is_deictic(t), Intent::DeleteLast),
    (|t, _| is_delete(t) && names_node(t), Intent::DeleteNamed),
    (
        |t, _| t.contains("rename") || (t.contains("change") && t.contains("name")),
        Intent::Rename,
    ),
    (
        |t, _| is_change(t) && t.contains("function"),
        Intent::ModifyFunction,
    ),
    (
        |t, _| t.contains("folder") && is_create(t),
        Intent::CreateFolder,
    ),
    (|t, _| t.contains("file") && is_create(t), Intent::CreateFile),
    (
        |t, ctx| is_change(t) && !t.contains("line") && ctx.file_open,
        Intent::ModifyCode,
    ),
    (
        |t, _| is_delete(t) && t.contains("function"),
        Intent::RemoveFunction,
    ),
    (
        |t, _| contains_any(t, &["replace", "change", "update"]) && t.contains("function"),
        Intent::ReplaceFunction,
    ),
    (
        |t, _| contains_any(t, &["change line", "edit line", "modify line"]),
        Intent::EditLine,
    ),
    (
        |t, _| contains_any(t, &["debug", "run code", "execute"]),
        Intent::Debug,
    ),
];

/// Classify a command. Lower-cases the input; first matching rule wins;
/// falls through to `Generate`.
pub fn classify(command: &str, ctx: &ClassifyContext) -> Intent {
    let lower = command.to_lowercase();
    for (predicate, intent) in RULES {
        if predicate(&lower, ctx) {
            return *intent;
        }
    }
    Intent::Generate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_closed(command: &str) -> Intent {
        classify(command, &ClassifyContext { file_open: false })
    }

    fn classify_open(command: &str) -> Intent {
        classify(command, &ClassifyContext { file_open: true })
    }

    #[test]
    fn test_delete_with_deictic_reference() {
        assert_eq!(classify_closed("delete that"), Intent::DeleteLast);
        assert_eq!(classify_closed("delete that file"), Intent::DeleteLast);
        assert_eq!(classify_closed("remove the last folder"), Intent::DeleteLast);
    }

    #[test]
    fn test_delete_with_explicit_name() {
        assert_eq!(classify_closed("delete file style.css"), Intent::DeleteNamed);
        assert_eq!(classify_closed("remove folder components"), Intent::DeleteNamed);
    }

    #[test]
    fn test_rename() {
        assert_eq!(classify_closed("rename app.py to main.py"), Intent::Rename);
        assert_eq!(
            classify_closed("change the name of app.py to main.py"),
            Intent::Rename
        );
    }

    #[test]
    fn test_modify_function_beats_generic_change() {
        assert_eq!(
            classify_open("update the function greet"),
            Intent::ModifyFunction
        );
    }

    #[test]
    fn test_create_folder_and_file() {
        assert_eq!(classify_closed("create folder components"), Intent::CreateFolder);
        assert_eq!(
            classify_closed("create a python file named calculator"),
            Intent::CreateFile
        );
    }

    #[test]
    fn test_modify_code_requires_open_file() {
        assert_eq!(classify_open("change the code to use tabs"), Intent::ModifyCode);
        // With nothing open the same command falls through to generation
        assert_eq!(classify_closed("change the code to use tabs"), Intent::Generate);
    }

    #[test]
    fn test_change_mentioning_functions_goes_to_function_modify() {
        // "functions" carries the function token, so the function branch
        // wins over generic code modification even with a file open
        assert_eq!(
            classify_open("change the code to use arrow functions"),
            Intent::ModifyFunction
        );
    }

    #[test]
    fn test_remove_function_not_generic_delete() {
        // No file/folder token, so the delete branches do not fire
        assert_eq!(classify_closed("remove function addNumbers"), Intent::RemoveFunction);
    }

    #[test]
    fn test_replace_function() {
        assert_eq!(
            classify_closed("replace function calculateTotal"),
            Intent::ReplaceFunction
        );
    }

    #[test]
    fn test_edit_line() {
        assert_eq!(
            classify_closed("change line 5 to console.log('hello')"),
            Intent::EditLine
        );
    }

    #[test]
    fn test_debug() {
        assert_eq!(classify_closed("debug"), Intent::Debug);
        assert_eq!(classify_closed("run code"), Intent::Debug);
    }

    #[test]
    fn test_fallback_never_errors() {
        assert_eq!(classify_closed("a login form please"), Intent::Generate);
        assert_eq!(classify_closed(""), Intent::Generate);
    }
}
