// voicedev_core/tests/pipeline_tests.rs
// End-to-end command pipeline tests against the public API

use voicedev_core::assistant::AgentMessageKind;
use voicedev_core::config::AppConfig;
use voicedev_core::generate::ConfidenceTier;
use voicedev_core::intent::Intent;
use voicedev_core::{CodeGenerator, VoiceAssistant};

fn assistant() -> VoiceAssistant {
    VoiceAssistant::new(AppConfig {
        groq_api_key: None,
        ..AppConfig::default()
    })
}

#[tokio::test]
async fn create_python_file_named_calculator() {
    // "create a python file named calculator" -> calculator.py, current, empty buffer
    let a = assistant();
    let outcome = a.handle_command("create a python file named calculator").await;
    assert_eq!(outcome.intent, Intent::CreateFile);

    let ws = a.workspace();
    let ws = ws.lock().await;
    let node = ws.find_by_name("calculator.py").expect("node created");
    assert_eq!(node.language.as_deref(), Some("python"));
    assert_eq!(ws.current().unwrap().name, "calculator.py");
    assert_eq!(ws.buffer(), "");
}

#[tokio::test]
async fn css_language_hint_resolves_extension() {
    // "make a file of css with name of style" -> style.css
    let a = assistant();
    a.handle_command("make a file of css with name of style").await;

    let ws = a.workspace();
    let ws = ws.lock().await;
    let node = ws.find_by_name("style.css").expect("node created");
    assert_eq!(node.language.as_deref(), Some("css"));
}

#[tokio::test]
async fn delete_that_resolves_last_created() {
    let a = assistant();
    a.handle_command("create a python file named calculator").await;
    let outcome = a.handle_command("delete that file").await;
    assert_eq!(outcome.intent, Intent::DeleteLast);
    assert!(outcome
        .messages
        .iter()
        .any(|m| m.kind == AgentMessageKind::Completion && m.message.contains("calculator.py")));

    let ws = a.workspace();
    let ws = ws.lock().await;
    assert!(ws.find_by_name("calculator.py").is_none());
    assert!(ws.current().is_none());
    assert!(ws.history().is_empty());
}

#[tokio::test]
async fn delete_that_with_no_history_does_not_guess() {
    let a = assistant();
    // Starter folders exist, but nothing was created by command
    let outcome = a.handle_command("delete that file").await;
    assert!(outcome.messages.iter().any(|m| m.kind == AgentMessageKind::Question));

    let ws = a.workspace();
    let ws = ws.lock().await;
    assert_eq!(ws.nodes().len(), 2); // src and components untouched
}

#[tokio::test]
async fn remove_function_drops_exact_span() {
    let a = assistant();
    a.handle_command("create a javascript file named math").await;
    {
        let ws = a.workspace();
        let mut ws = ws.lock().await;
        ws.set_buffer("const before = 1;\nfunction add(a, b) {\n    return a + b;\n}\nconst after = 2;")
            .unwrap();
    }

    a.handle_command("remove function add").await;

    let ws = a.workspace();
    let ws = ws.lock().await;
    assert_eq!(ws.buffer(), "const before = 1;\nconst after = 2;");
    // Tree copy stayed in sync with the buffer
    assert_eq!(
        ws.find_by_name("math.js").unwrap().content.as_deref(),
        Some("const before = 1;\nconst after = 2;")
    );
}

#[tokio::test]
async fn python_loop_prompt_without_credential_uses_lowest_tier() {
    let generator = CodeGenerator::new(AppConfig {
        groq_api_key: None,
        ..AppConfig::default()
    });
    let result = generator.generate("make a loop", "python", "loop.py").await;
    assert_eq!(result.tier, ConfidenceTier::NoCredentialLocalOnly);
    assert!(result.code.contains("for i in range(10):"));
    assert!(result.confidence < ConfidenceTier::RemoteFailedLocalFallback.confidence());
}

#[tokio::test]
async fn rename_to_own_name_changes_nothing() {
    let a = assistant();
    a.handle_command("create a python file named app").await;

    let before = {
        let ws = a.workspace();
        let ws = ws.lock().await;
        (ws.nodes().len(), ws.current().unwrap().id.clone())
    };

    a.handle_command("rename app.py to app.py").await;

    let ws = a.workspace();
    let ws = ws.lock().await;
    assert_eq!(ws.nodes().len(), before.0);
    let current = ws.current().unwrap();
    assert_eq!(current.id, before.1);
    assert_eq!(current.name, "app.py");
    assert_eq!(current.path, "app.py");
}

#[tokio::test]
async fn generation_flow_requires_approval_before_mutation() {
    let a = assistant();
    let outcome = a.handle_command("a todo list widget").await;
    assert_eq!(outcome.intent, Intent::Generate);
    assert!(outcome.pending.is_some());

    // Nothing applied yet
    {
        let ws = a.workspace();
        let ws = ws.lock().await;
        assert!(ws.current().is_none());
    }

    a.approve_pending().await;
    let ws = a.workspace();
    let ws = ws.lock().await;
    assert!(ws.current().is_some());
    assert!(!ws.buffer().is_empty());
}

#[tokio::test]
async fn approved_generation_appends_to_open_file() {
    let a = assistant();
    a.handle_command("create a javascript file named app").await;
    {
        let ws = a.workspace();
        let mut ws = ws.lock().await;
        ws.set_buffer("const existing = true;").unwrap();
    }

    a.handle_command("a helper for dates").await;
    a.approve_pending().await;

    let ws = a.workspace();
    let ws = ws.lock().await;
    let buffer = ws.buffer();
    // Appended after a blank line, not replaced
    assert!(buffer.starts_with("const existing = true;\n\n"));
    assert!(buffer.len() > "const existing = true;\n\n".len());
}

#[tokio::test]
async fn multilingual_phrase_reaches_classifier() {
    let a = assistant();
    // "نئی فائل بناؤ" translates to "create new file"
    let outcome = a.handle_command("نئی فائل بناؤ").await;
    assert_eq!(outcome.intent, Intent::CreateFile);

    let ws = a.workspace();
    let ws = ws.lock().await;
    assert!(ws.current().is_some());
}

#[tokio::test]
async fn unknown_command_falls_back_to_generation() {
    let a = assistant();
    let outcome = a.handle_command("sing me a song about compilers").await;
    assert_eq!(outcome.intent, Intent::Generate);
    assert!(outcome.pending.is_some());
}
