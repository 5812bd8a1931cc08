//! Canned code templates and prompt shaping
//!
//! Two jobs for the generator:
//! - rewrite a raw voice prompt into an instruction sentence keyed on the
//!   detected construct, for the remote model
//! - serve the local fallback snippet table keyed on (language, construct
//!   keyword), with a generic language-stamped fallback

use serde::{Deserialize, Serialize};

/// Code shape detected in a generation prompt; selects both the remote
/// instruction template and the local snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Construct {
    Function,
    Variable,
    Loop,
    Conditional,
    Class,
    Import,
    FileOp,
    Deploy,
    Debug,
    Generic,
}

/// Detect the construct by ordered substring probes; first hit wins.
pub fn detect_construct(prompt: &str) -> Construct {
    let lower = prompt.to_lowercase();
    if lower.contains("function") || lower.contains("method") {
        Construct::Function
    } else if lower.contains("variable") || lower.contains("declare") {
        Construct::Variable
    } else if lower.contains("loop") || lower.contains("for") || lower.contains("while") {
        Construct::Loop
    } else if lower.contains("if") || lower.contains("condition") {
        Construct::Conditional
    } else if lower.contains("class") || lower.contains("object") {
        Construct::Class
    } else if lower.contains("import") || lower.contains("include") || lower.contains("require") {
        Construct::Import
    } else if lower.contains("file") && (lower.contains("create") || lower.contains("make")) {
        Construct::FileOp
    } else if lower.contains("deploy") || lower.contains("workflow") || lower.contains("setup") {
        Construct::Deploy
    } else if lower.contains("debug") || lower.contains("fix") || lower.contains("error") {
        Construct::Debug
    } else {
        Construct::Generic
    }
}

/// Rewrite a raw prompt into the instruction sentence sent to the remote
/// model.
pub fn build_instruction(prompt: &str, language: &str) -> String {
    match detect_construct(prompt) {
        Construct::Function => format!(
            "Create a {language} function based on: \"{prompt}\". Include proper parameters, return value, and documentation."
        ),
        Construct::Variable => format!(
            "Create a {language} variable declaration based on: \"{prompt}\". Use appropriate data type and initialization."
        ),
        Construct::Loop => format!(
            "Create a {language} loop based on: \"{prompt}\". Include proper iteration logic and body."
        ),
        Construct::Conditional => format!(
            "Create a {language} conditional statement based on: \"{prompt}\". Include proper condition and logic."
        ),
        Construct::Class => format!(
            "Create a {language} class based on: \"{prompt}\". Include constructor, properties, and methods as appropriate."
        ),
        Construct::Import => format!(
            "Create {language} import/include statements based on: \"{prompt}\". Use proper syntax for the language."
        ),
        Construct::FileOp => format!(
            "Generate {language} code to create and handle files based on: \"{prompt}\". Include proper file operations."
        ),
        Construct::Deploy => format!(
            "Generate {language} deployment or setup code based on: \"{prompt}\". Include configuration and necessary steps."
        ),
        Construct::Debug => format!(
            "Generate {language} debugging or error handling code based on: \"{prompt}\". Include proper error handling and logging."
        ),
        Construct::Generic => format!(
            "Generate {language} code for: \"{prompt}\". Create clean, well-structured code with appropriate comments."
        ),
    }
}

/// Local fallback snippet for a prompt. Keyed on (language, construct
/// keyword found in the prompt); unknown combinations get a
/// language-stamped boilerplate comment echoing the prompt.
pub fn local_snippet(prompt: &str, language: &str) -> String {
    let lower = prompt.to_lowercase();
    match language.to_lowercase().as_str() {
        "python" => python_snippet(&lower),
        "javascript" => javascript_snippet(&lower),
        "java" => java_snippet(&lower),
        _ => generic_snippet(&lower, language),
    }
}

fn python_snippet(prompt: &str) -> String {
    if prompt.contains("function") && prompt.contains("add") {
        return r#"def add_numbers(a, b):
    """Add two numbers and return the result"""
    return a + b"#
            .to_string();
    }
    if prompt.contains("variable") {
        return r#"# Variable declaration
my_variable = "Hello, World!"
number_var = 42
is_active = True"#
            .to_string();
    }
    if prompt.contains("loop") || prompt.contains("for") {
        return r#"# For loop example
for i in range(10):
    print(f"Iteration: {i}")"#
            .to_string();
    }
    if prompt.contains("class") {
        return r#"class MyClass:
    """A simple class example"""

    def __init__(self, name):
        self.name = name

    def greet(self):
        return f"Hello, {self.name}!""#
            .to_string();
    }
    if prompt.contains("if") || prompt.contains("condition") {
        return r#"# Conditional statement
if condition:
    print("Condition is true")
elif another_condition:
    print("Another condition is true")
else:
    print("No conditions are true")"#
            .to_string();
    }
    if prompt.contains("deploy") || prompt.contains("workflow") {
        return r#"# Deployment and workflow setup
from flask import Flask
app = Flask(__name__)

@app.route('/')
def hello():
    return "Hello, World!"

if __name__ == '__main__':
    app.run(debug=True, host='0.0.0.0', port=5000)"#
            .to_string();
    }
    format!(
        r#"# Python code generated from voice command
# Command: {prompt}

def main():
    """Main function"""
    pass

if __name__ == "__main__":
    main()"#
    )
}

fn javascript_snippet(prompt: &str) -> String {
    if prompt.contains("function") && prompt.contains("add") {
        return r#"function addNumbers(a, b) {
    // Add two numbers and return the result
    return a + b;
}"#
        .to_string();
    }
    if prompt.contains("variable") {
        return r#"// Variable declarations
const myVariable = "Hello, World!";
let numberVar = 42;
let isActive = true;"#
            .to_string();
    }
    if prompt.contains("loop") || prompt.contains("for") {
        return r#"// For loop example
for (let i = 0; i < 10; i++) {
    console.log(`Iteration: ${i}`);
}"#
        .to_string();
    }
    if prompt.contains("class") {
        return r#"class MyClass {
    constructor(name) {
        this.name = name;
    }

    greet() {
        return `Hello, ${this.name}!`;
    }
}"#
        .to_string();
    }
    format!(
        r#"// JavaScript code generated from voice command
// Command: {prompt}

function main() {{
    // Main function
}}

main();"#
    )
}

fn java_snippet(prompt: &str) -> String {
    if prompt.contains("function") || prompt.contains("method") {
        return r#"public static int addNumbers(int a, int b) {
    // Add two numbers and return the result
    return a + b;
}"#
        .to_string();
    }
    if prompt.contains("class") {
        return r#"public class MyClass {
    private String name;

    public MyClass(String name) {
        this.name = name;
    }

    public String greet() {
        return "Hello, " + this.name + "!";
    }
}"#
        .to_string();
    }
    format!(
        r#"// Java code generated from voice command
// Command: {prompt}

public class Main {{
    public static void main(String[] args) {{
        // Main method
    }}
}}"#
    )
}

fn generic_snippet(prompt: &str, language: &str) -> String {
    format!("// Generated code for: {prompt}\n// Language: {language}\n\n// Code implementation would go here")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_construct_ordering() {
        assert_eq!(detect_construct("create a function that adds"), Construct::Function);
        assert_eq!(detect_construct("declare a counter"), Construct::Variable);
        assert_eq!(detect_construct("make a loop over items"), Construct::Loop);
        assert_eq!(detect_construct("add a condition"), Construct::Conditional);
        assert_eq!(detect_construct("generate a user class"), Construct::Class);
        assert_eq!(detect_construct("write a poem"), Construct::Generic);
    }

    #[test]
    fn test_build_instruction_mentions_language_and_prompt() {
        let instruction = build_instruction("create a login function", "python");
        assert!(instruction.contains("python"));
        assert!(instruction.contains("create a login function"));
    }

    #[test]
    fn test_python_loop_snippet() {
        let code = local_snippet("make a loop", "python");
        assert!(code.contains("for i in range(10):"));
    }

    #[test]
    fn test_javascript_add_function_snippet() {
        let code = local_snippet("create a function that adds two numbers", "javascript");
        assert!(code.contains("function addNumbers"));
    }

    #[test]
    fn test_generic_fallback_echoes_prompt() {
        let code = local_snippet("do a flip", "rust");
        assert!(code.contains("do a flip"));
        assert!(code.contains("rust"));
    }
}
