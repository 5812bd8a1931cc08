//! Function-region editing over the text buffer
//!
//! Two-phase: locate the region as a [start, end) line span via the
//! brace/indentation scan, then splice by slicing and concatenating line
//! sequences. No in-place index mutation.
//!
//! Region rules:
//! - a start line is one whose trimmed text contains `function NAME`,
//!   `def NAME`, `NAME(`, `public NAME`, or `private NAME`
//! - indentation-significant languages (python) end the region at the
//!   first non-blank line indented at or above the start line; that
//!   boundary line is kept
//! - brace-counted languages track a running `{`/`}` balance, excluding
//!   the start line itself, and end the region on the line where the
//!   balance reaches zero or below and the trimmed text ends with `}`;
//!   that closing line is consumed
//!
//! Exactly one occurrence is edited per call: first match only. A missing
//! function is reported, not silently ignored.

use crate::error::VoiceDevError;

/// Line span of a located function definition. `start..end` are the lines
/// removed on a remove/replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionRegion {
    pub start: usize,
    /// Exclusive end of the lines belonging to the function.
    pub end: usize,
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn is_function_start(trimmed: &str, name: &str) -> bool {
    trimmed.contains(&format!("function {name}"))
        || trimmed.contains(&format!("def {name}"))
        || trimmed.contains(&format!("{name}("))
        || trimmed.contains(&format!("public {name}"))
        || trimmed.contains(&format!("private {name}"))
}

/// Locate the first definition of `name` in `lines`. Returns None when no
/// start line matches.
pub fn locate_function(lines: &[&str], name: &str, language: &str) -> Option<FunctionRegion> {
    let start = lines.iter().position(|line| is_function_start(line.trim(), name))?;
    let start_indent = indent_width(lines[start]);
    let python = language.eq_ignore_ascii_case("python");

    let mut brace_balance: i32 = 0;
    for (offset, line) in lines[start + 1..].iter().enumerate() {
        let i = start + 1 + offset;
        let trimmed = line.trim();

        if python {
            // Boundary line is kept, not consumed.
            if !trimmed.is_empty() && indent_width(line) <= start_indent {
                return Some(FunctionRegion { start, end: i });
            }
            continue;
        }

        brace_balance += line.matches('{').count() as i32;
        brace_balance -= line.matches('}').count() as i32;
        if brace_balance <= 0 && trimmed.ends_with('}') {
            // Closing line is consumed.
            return Some(FunctionRegion { start, end: i + 1 });
        }
    }

    // Ran off the end of the buffer while inside the function.
    Some(FunctionRegion { start, end: lines.len() })
}

fn splice(lines: &[&str], region: FunctionRegion, replacement: Option<&str>) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend_from_slice(&lines[..region.start]);
    if let Some(text) = replacement {
        out.push(text);
    }
    out.extend_from_slice(&lines[region.end..]);
    out.join("\n")
}

/// Remove the first definition of `name` from `source`.
pub fn remove_function(source: &str, name: &str, language: &str) -> Result<String, VoiceDevError> {
    let lines: Vec<&str> = source.lines().collect();
    let region = locate_function(&lines, name, language)
        .ok_or_else(|| VoiceDevError::FunctionNotFound(name.to_string()))?;
    Ok(splice(&lines, region, None))
}

/// Replace the first definition of `name` in `source` with `new_code`,
/// spliced in exactly once at the position of the original start line.
pub fn replace_function(source: &str, name: &str, new_code: &str, language: &str) -> Result<String, VoiceDevError> {
    let lines: Vec<&str> = source.lines().collect();
    let region = locate_function(&lines, name, language)
        .ok_or_else(|| VoiceDevError::FunctionNotFound(name.to_string()))?;
    Ok(splice(&lines, region, Some(new_code)))
}

/// Replace a single line (1-based). Out-of-range is reported.
pub fn replace_line(source: &str, line_number: usize, new_content: &str) -> Result<String, VoiceDevError> {
    let lines: Vec<&str> = source.lines().collect();
    if line_number == 0 || line_number > lines.len() {
        return Err(VoiceDevError::LineOutOfRange {
            requested: line_number,
            available: lines.len(),
        });
    }
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    out.extend_from_slice(&lines[..line_number - 1]);
    out.push(new_content);
    out.extend_from_slice(&lines[line_number..]);
    Ok(out.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JS_SOURCE: &str = "const x = 1;\nfunction add(a, b) {\n    return a + b;\n}\nconst y = 2;";

    const PY_SOURCE: &str = "x = 1\ndef add(a, b):\n    return a + b\ny = 2";

    #[test]
    fn test_remove_brace_function() {
        let result = remove_function(JS_SOURCE, "add", "javascript").unwrap();
        assert_eq!(result, "const x = 1;\nconst y = 2;");
    }

    #[test]
    fn test_remove_python_function_keeps_boundary() {
        let result = remove_function(PY_SOURCE, "add", "python").unwrap();
        assert_eq!(result, "x = 1\ny = 2");
    }

    #[test]
    fn test_replace_function_splices_once() {
        let result = replace_function(JS_SOURCE, "add", "function add(a, b) { return b + a; }", "javascript").unwrap();
        assert_eq!(
            result,
            "const x = 1;\nfunction add(a, b) { return b + a; }\nconst y = 2;"
        );
    }

    #[test]
    fn test_missing_function_is_reported_brace_language() {
        let err = remove_function(JS_SOURCE, "subtract", "javascript").unwrap_err();
        assert!(matches!(err, VoiceDevError::FunctionNotFound(_)));
    }

    #[test]
    fn test_missing_function_is_reported_python() {
        let err = remove_function(PY_SOURCE, "subtract", "python").unwrap_err();
        assert!(matches!(err, VoiceDevError::FunctionNotFound(_)));
    }

    #[test]
    fn test_first_match_only() {
        let source = "function add() {\n  return 1;\n}\nfunction add() {\n  return 2;\n}";
        let result = remove_function(source, "add", "javascript").unwrap();
        assert_eq!(result, "function add() {\n  return 2;\n}");
    }

    #[test]
    fn test_python_region_runs_to_end_of_buffer() {
        let source = "def tail():\n    a = 1\n    return a";
        let result = remove_function(source, "tail", "python").unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn test_multiline_body_removed() {
        let source = "function total(items) {\n  let sum = 0;\n  items.forEach(add);\n  return sum;\n}\nlet z = 1;";
        let result = remove_function(source, "total", "javascript").unwrap();
        assert_eq!(result, "let z = 1;");
    }

    #[test]
    fn test_method_marker_variants() {
        let source = "class A {\n  public greet() {\n    return 1;\n  }\n}";
        let lines: Vec<&str> = source.lines().collect();
        let region = locate_function(&lines, "greet", "java").unwrap();
        assert_eq!(region.start, 1);
        assert_eq!(region.end, 4);
    }

    #[test]
    fn test_replace_line() {
        let result = replace_line("a\nb\nc", 2, "B").unwrap();
        assert_eq!(result, "a\nB\nc");
    }

    #[test]
    fn test_replace_line_out_of_range() {
        assert!(matches!(
            replace_line("a\nb", 5, "x"),
            Err(VoiceDevError::LineOutOfRange { requested: 5, available: 2 })
        ));
        assert!(replace_line("a\nb", 0, "x").is_err());
    }
}
