//! Voice assistant - command orchestration
//!
//! transcript -> translate -> classify -> extract -> {mutate | edit |
//! generate} -> history/record updates -> agent messages.
//!
//! One command is processed to completion before the next: all shared
//! state lives behind a single workspace mutex. Every branch ends in
//! either a successful mutation or a clarification message - nothing in
//! here is allowed to panic the flow.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::config::AppConfig;
use crate::editing;
use crate::error::VoiceDevError;
use crate::extract;
use crate::generate::{CodeGenerator, GeneratedCode};
use crate::history::ActionKind;
use crate::intent::{classify, ClassifyContext, Intent};
use crate::project::{PendingAction, PendingOperation, ProjectWorkspace};
use crate::store::{NewVoiceCommand, RecordStore};
use crate::structured_log::{log_event, LogLevel};
use crate::transcript::{translate_phrase, Transcription};

// =============================================================================
// AGENT MESSAGES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMessageKind {
    Greeting,
    Confirmation,
    Question,
    Completion,
}

/// User-facing feedback, also handed to the speech collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    pub kind: AgentMessageKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Speech playback collaborator. Fire-and-forget; the core consumes no
/// return value.
pub trait SpeechSynth: Send + Sync {
    fn speak(&self, message: &str);
}

/// Default playback: none.
pub struct NullSpeech;

impl SpeechSynth for NullSpeech {
    fn speak(&self, _message: &str) {}
}

/// Result of one handled command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub intent: Intent,
    pub messages: Vec<AgentMessage>,
    /// Set when a generation is waiting for approval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_output: Option<String>,
}

impl CommandOutcome {
    fn new(intent: Intent) -> Self {
        Self {
            intent,
            messages: Vec::new(),
            pending: None,
            debug_output: None,
        }
    }
}

// =============================================================================
// ASSISTANT
// =============================================================================

pub struct VoiceAssistant {
    workspace: Arc<Mutex<ProjectWorkspace>>,
    generator: CodeGenerator,
    store: Option<Arc<RecordStore>>,
    speech: Box<dyn SpeechSynth>,
}

impl VoiceAssistant {
    pub fn new(config: AppConfig) -> Self {
        Self {
            workspace: Arc::new(Mutex::new(ProjectWorkspace::with_starter_folders())),
            generator: CodeGenerator::new(config),
            store: None,
            speech: Box::new(NullSpeech),
        }
    }

    /// Attach the persisted record collaborator (best-effort writes).
    pub fn with_store(mut self, store: Arc<RecordStore>) -> Self {
        self.generator = self.generator.with_store(store.clone());
        self.store = Some(store);
        self
    }

    pub fn with_speech(mut self, speech: Box<dyn SpeechSynth>) -> Self {
        self.speech = speech;
        self
    }

    /// Shared workspace handle, for the HTTP surface.
    pub fn workspace(&self) -> Arc<Mutex<ProjectWorkspace>> {
        self.workspace.clone()
    }

    pub fn greeting(&self) -> AgentMessage {
        self.message(
            AgentMessageKind::Greeting,
            "Hello Sir! I'm your AI coding assistant. What would you like me to help you with today?",
        )
    }

    fn message(&self, kind: AgentMessageKind, text: &str) -> AgentMessage {
        self.speech.speak(text);
        AgentMessage {
            kind,
            message: text.to_string(),
            timestamp: Utc::now(),
        }
    }

    fn say(&self, outcome: &mut CommandOutcome, kind: AgentMessageKind, text: &str) {
        let msg = self.message(kind, text);
        outcome.messages.push(msg);
    }

    /// Handle a finalized speech result: validates the boundary type,
    /// records the command, then runs the pipeline.
    pub async fn handle_transcription(&self, transcription: &Transcription) -> CommandOutcome {
        if !transcription.is_final || transcription.text.trim().is_empty() {
            let mut outcome = CommandOutcome::new(Intent::Generate);
            self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "I didn't catch that, Sir. Could you repeat the command?",
            );
            return outcome;
        }
        self.handle_command(&transcription.text).await
    }

    /// Core pipeline on raw command text.
    pub async fn handle_command(&self, text: &str) -> CommandOutcome {
        let translated = translate_phrase(text);
        self.record_voice_command(&translated.original_text, &translated.translated_text, &translated.detected_language, translated.confidence);
        let command = translated.translated_text;

        let file_open = self.workspace.lock().await.current().is_some();
        let intent = classify(&command, &ClassifyContext { file_open });
        log_event(
            LogLevel::Info,
            "ASSISTANT",
            "intent_classified",
            json!({ "command": command, "intent": intent, "file_open": file_open }),
        );

        match intent {
            Intent::DeleteLast => self.handle_delete_last().await,
            Intent::DeleteNamed => self.handle_delete_named(&command).await,
            Intent::Rename => self.handle_rename(&command).await,
            Intent::ModifyFunction => self.handle_modify_function(&command).await,
            Intent::CreateFolder => self.handle_create_folder(&command).await,
            Intent::CreateFile => self.handle_create_file(&command).await,
            Intent::ModifyCode => self.handle_modify_code(&command).await,
            Intent::RemoveFunction => self.handle_remove_function(&command).await,
            Intent::ReplaceFunction => self.handle_replace_function(&command).await,
            Intent::EditLine => self.handle_edit_line(&command).await,
            Intent::Debug => self.handle_debug().await,
            Intent::Generate => self.handle_generate(&command).await,
        }
    }

    // =========================================================================
    // INTENT HANDLERS
    // =========================================================================

    async fn handle_delete_last(&self) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::DeleteLast);
        let result = self.workspace.lock().await.delete_last_created();
        match result {
            Ok(name) => self.say(
                &mut outcome,
                AgentMessageKind::Completion,
                &format!("\"{name}\" deleted as requested, Sir! What's next?"),
            ),
            Err(_) => self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "I couldn't identify which file to delete, Sir. Could you specify the exact filename?",
            ),
        }
        outcome
    }

    async fn handle_delete_named(&self, command: &str) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::DeleteNamed);
        let Some(target) = extract::extract_deletion_target(command) else {
            self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "I couldn't identify which file to delete, Sir. Could you specify the exact filename?",
            );
            return outcome;
        };
        let result = self.workspace.lock().await.delete_named(&target);
        match result {
            Ok(name) => self.say(
                &mut outcome,
                AgentMessageKind::Completion,
                &format!("\"{name}\" deleted successfully, Sir! What would you like me to do next?"),
            ),
            Err(_) => self.say(
                &mut outcome,
                AgentMessageKind::Question,
                &format!("I couldn't find \"{target}\" to delete, Sir."),
            ),
        }
        outcome
    }

    async fn handle_rename(&self, command: &str) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::Rename);
        let Some((old_name, new_name)) = extract::extract_rename(command) else {
            self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "I couldn't understand the rename command, Sir. Please specify old and new names clearly.",
            );
            return outcome;
        };
        let result = self.workspace.lock().await.rename(&old_name, &new_name);
        match result {
            Ok(()) => self.say(
                &mut outcome,
                AgentMessageKind::Completion,
                &format!("Successfully renamed \"{old_name}\" to \"{new_name}\", Sir!"),
            ),
            Err(_) => self.say(
                &mut outcome,
                AgentMessageKind::Question,
                &format!("I couldn't find \"{old_name}\" to rename, Sir."),
            ),
        }
        outcome
    }

    async fn handle_modify_function(&self, command: &str) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::ModifyFunction);
        let mut ws = self.workspace.lock().await;

        let modified = (|| -> Result<String, VoiceDevError> {
            if ws.current().is_none() {
                return Err(VoiceDevError::NoFileOpen);
            }
            let name = extract::extract_modify_function_name(command)
                .ok_or(VoiceDevError::ExtractionFailed("function name"))?;
            let content = ws.buffer().to_string();
            if !content.contains(&name) {
                return Err(VoiceDevError::FunctionNotFound(name));
            }
            let head = Regex::new(&format!(r"function\s+{}", regex::escape(&name)))
                .map_err(|_| VoiceDevError::FunctionNotFound(name.clone()))?;
            let updated = head
                .replace_all(&content, format!("function modified_{name}"))
                .to_string();
            ws.set_buffer(&updated)?;
            ws.record_action(ActionKind::FunctionAdded, &name, json!({ "action": "modified" }));
            Ok(name)
        })();
        drop(ws);

        match modified {
            Ok(_) => self.say(
                &mut outcome,
                AgentMessageKind::Completion,
                "Function modified successfully, Sir! The changes have been applied.",
            ),
            Err(_) => self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "I need more details about which function to modify, Sir. Could you be more specific?",
            ),
        }
        outcome
    }

    async fn handle_create_folder(&self, command: &str) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::CreateFolder);
        let name = extract::extract_folder_name(command);
        self.workspace.lock().await.create_folder(&name);
        self.say(
            &mut outcome,
            AgentMessageKind::Completion,
            &format!("Folder \"{name}\" created successfully, Sir! What would you like me to do next?"),
        );
        outcome
    }

    async fn handle_create_file(&self, command: &str) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::CreateFile);
        let extraction = extract::extract_file_name(command);
        self.workspace
            .lock()
            .await
            .create_file(&extraction.file_name, &extraction.language, "");
        self.say(
            &mut outcome,
            AgentMessageKind::Completion,
            &format!(
                "File \"{}\" created successfully, Sir! Ready for your next command.",
                extraction.file_name
            ),
        );
        outcome
    }

    async fn handle_modify_code(&self, command: &str) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::ModifyCode);
        let current_info = {
            let ws = self.workspace.lock().await;
            ws.current().map(|node| {
                (
                    node.language.clone().unwrap_or_else(|| ws.selected_language().to_string()),
                    node.name.clone(),
                )
            })
        };
        let Some((language, file_name)) = current_info else {
            self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "There's no file open to modify, Sir.",
            );
            return outcome;
        };

        self.say(
            &mut outcome,
            AgentMessageKind::Confirmation,
            "I'll help you modify the code, Sir. Generating changes now...",
        );
        let result = self.generator.generate(command, &language, &file_name).await;

        let applied = {
            let mut ws = self.workspace.lock().await;
            ws.set_buffer(&result.code).map(|()| {
                ws.record_action(
                    ActionKind::CodeModified,
                    &file_name,
                    json!({ "action": "code_replaced" }),
                );
            })
        };
        match applied {
            Ok(()) => self.say(
                &mut outcome,
                AgentMessageKind::Completion,
                "Code changes applied successfully, Sir! What's next?",
            ),
            Err(_) => self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "I couldn't apply the changes, Sir. Could you be more specific?",
            ),
        }
        outcome
    }

    async fn handle_remove_function(&self, command: &str) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::RemoveFunction);
        let name = extract::extract_function_name(command);

        let mut ws = self.workspace.lock().await;
        let result = (|| -> Result<(), VoiceDevError> {
            let node = ws.current().ok_or(VoiceDevError::NoFileOpen)?;
            let language = node.language.clone().unwrap_or_default();
            let updated = editing::remove_function(ws.buffer(), &name, &language)?;
            ws.set_buffer(&updated)?;
            ws.record_action(
                ActionKind::CodeModified,
                &name,
                json!({ "action": "function_removed" }),
            );
            Ok(())
        })();
        drop(ws);

        match result {
            Ok(()) => self.say(
                &mut outcome,
                AgentMessageKind::Completion,
                &format!("Function \"{name}\" removed, Sir! Anything else you need?"),
            ),
            Err(VoiceDevError::FunctionNotFound(_)) => self.say(
                &mut outcome,
                AgentMessageKind::Question,
                &format!("I couldn't find function \"{name}\" in the current file, Sir."),
            ),
            Err(_) => self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "There's no file open to modify, Sir.",
            ),
        }
        outcome
    }

    async fn handle_replace_function(&self, command: &str) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::ReplaceFunction);
        let name = extract::extract_function_name(command);

        let current_info = {
            let ws = self.workspace.lock().await;
            ws.current()
                .map(|node| (node.language.clone().unwrap_or_default(), node.name.clone()))
        };
        let Some((language, file_name)) = current_info else {
            self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "There's no file open to modify, Sir.",
            );
            return outcome;
        };

        self.say(
            &mut outcome,
            AgentMessageKind::Confirmation,
            &format!("I'll replace function \"{name}\", Sir. Generating new version..."),
        );
        let generated = self.generator.generate(command, &language, &file_name).await;

        let result = {
            let mut ws = self.workspace.lock().await;
            editing::replace_function(ws.buffer(), &name, &generated.code, &language).and_then(|updated| {
                ws.set_buffer(&updated)?;
                ws.record_action(
                    ActionKind::CodeModified,
                    &name,
                    json!({ "action": "function_replaced" }),
                );
                Ok(())
            })
        };
        match result {
            Ok(()) => self.say(
                &mut outcome,
                AgentMessageKind::Completion,
                &format!("Function \"{name}\" replaced successfully, Sir! What's next?"),
            ),
            Err(_) => self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "Couldn't replace the function, Sir. Could you try rephrasing?",
            ),
        }
        outcome
    }

    async fn handle_edit_line(&self, command: &str) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::EditLine);
        let (line, content) = extract::extract_line_edit(command);

        let mut ws = self.workspace.lock().await;
        let result = (|| -> Result<(), VoiceDevError> {
            let node = ws.current().ok_or(VoiceDevError::NoFileOpen)?;
            let target = node.name.clone();
            let updated = editing::replace_line(ws.buffer(), line, &content)?;
            ws.set_buffer(&updated)?;
            ws.record_action(
                ActionKind::CodeModified,
                &target,
                json!({ "action": "line_edited", "line": line }),
            );
            Ok(())
        })();
        drop(ws);

        match result {
            Ok(()) => self.say(
                &mut outcome,
                AgentMessageKind::Completion,
                &format!("Line {line} updated, Sir! What's next?"),
            ),
            Err(VoiceDevError::LineOutOfRange { available, .. }) => self.say(
                &mut outcome,
                AgentMessageKind::Question,
                &format!("Line {line} is out of range, Sir - the file only has {available} lines."),
            ),
            Err(_) => self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "There's no file open to modify, Sir.",
            ),
        }
        outcome
    }

    async fn handle_debug(&self) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::Debug);
        let buffer = {
            let ws = self.workspace.lock().await;
            if ws.current().is_none() || ws.buffer().trim().is_empty() {
                drop(ws);
                self.say(
                    &mut outcome,
                    AgentMessageKind::Question,
                    "Sir, there's no code to debug. Would you like to create a file first?",
                );
                return outcome;
            }
            ws.buffer().to_string()
        };

        self.say(
            &mut outcome,
            AgentMessageKind::Confirmation,
            "Analyzing and debugging your code, Sir. Please wait...",
        );
        outcome.debug_output = Some(analyze_buffer(&buffer));
        self.say(
            &mut outcome,
            AgentMessageKind::Completion,
            "Code debugging completed, Sir! Check the debug output. Any issues you'd like me to fix?",
        );
        outcome
    }

    async fn handle_generate(&self, command: &str) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::Generate);
        self.say(
            &mut outcome,
            AgentMessageKind::Confirmation,
            "Processing your request, Sir. Let me generate the code for you.",
        );

        let (language, file_name, operation) = {
            let ws = self.workspace.lock().await;
            match ws.current() {
                Some(node) => (
                    node.language.clone().unwrap_or_else(|| ws.selected_language().to_string()),
                    node.name.clone(),
                    PendingOperation::Modify,
                ),
                None => (
                    ws.selected_language().to_string(),
                    "untitled".to_string(),
                    PendingOperation::Create,
                ),
            }
        };

        let generated = self.generator.generate(command, &language, &file_name).await;
        let pending = pending_from(&generated, operation);
        self.workspace.lock().await.set_pending(pending.clone());
        outcome.pending = Some(pending);
        outcome
    }

    // =========================================================================
    // PENDING APPROVAL
    // =========================================================================

    /// Approve the outstanding pending action.
    pub async fn approve_pending(&self) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::Generate);
        let result = self.workspace.lock().await.apply_pending();
        match result {
            Ok(_) => self.say(
                &mut outcome,
                AgentMessageKind::Completion,
                "Perfect! Code has been applied successfully, Sir. What's our next move?",
            ),
            Err(_) => self.say(
                &mut outcome,
                AgentMessageKind::Question,
                "There's no pending code to approve, Sir.",
            ),
        }
        outcome
    }

    /// Reject and discard the outstanding pending action.
    pub async fn reject_pending(&self) -> CommandOutcome {
        let mut outcome = CommandOutcome::new(Intent::Generate);
        self.workspace.lock().await.reject_pending();
        self.say(
            &mut outcome,
            AgentMessageKind::Question,
            "No problem, Sir! The code has been rejected. What would you like me to do instead?",
        );
        outcome
    }

    fn record_voice_command(&self, original: &str, translated: &str, language: &str, confidence: f32) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let record = NewVoiceCommand {
            original_text: original.to_string(),
            translated_text: translated.to_string(),
            detected_language: language.to_string(),
            confidence,
        };
        tokio::spawn(async move {
            if let Err(e) = store.create_voice_command(record).await {
                log_event(
                    LogLevel::Warn,
                    "ASSISTANT",
                    "persist_failed",
                    json!({ "error": e.to_string() }),
                );
            }
        });
    }
}

fn pending_from(generated: &GeneratedCode, operation: PendingOperation) -> PendingAction {
    PendingAction {
        code: generated.code.clone(),
        language: generated.language.clone(),
        file_name: generated.file_name.clone(),
        confidence: generated.confidence,
        operation: Some(operation),
    }
}

/// Static analysis report over the current buffer: echoed output lines
/// plus simple structure counts.
fn analyze_buffer(buffer: &str) -> String {
    lazy_static! {
        static ref QUOTED: Regex = Regex::new(r#"["'`](.*?)["'`]"#).unwrap();
        static ref FUNCTIONS: Regex = Regex::new(r"function|def|public.*\{").unwrap();
        static ref VARIABLES: Regex = Regex::new(r"let|var|const|int|string").unwrap();
    }

    let lines: Vec<&str> = buffer.lines().collect();
    let mut output = String::new();
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.contains("console.log") || trimmed.contains("print") {
            if let Some(caps) = QUOTED.captures(trimmed) {
                if let Some(m) = caps.get(1) {
                    output.push_str(&format!("Line {}: {}\n", i + 1, m.as_str()));
                }
            }
        }
    }

    let mut report = String::from("Debug Analysis:\n");
    report.push_str(&format!("- Total lines: {}\n", lines.len()));
    report.push_str(&format!("- Functions found: {}\n", FUNCTIONS.find_iter(buffer).count()));
    report.push_str(&format!("- Variables declared: {}\n", VARIABLES.find_iter(buffer).count()));
    if buffer.contains("function") && !buffer.contains("return") {
        report.push_str("- Warning: Function may be missing return statement\n");
    }

    format!("Execution Output:\n{output}\n{report}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant() -> VoiceAssistant {
        VoiceAssistant::new(AppConfig::default())
    }

    fn has_kind(outcome: &CommandOutcome, kind: AgentMessageKind) -> bool {
        outcome.messages.iter().any(|m| m.kind == kind)
    }

    #[tokio::test]
    async fn test_create_python_file_by_voice() {
        let a = assistant();
        let outcome = a.handle_command("create a python file named calculator").await;
        assert_eq!(outcome.intent, Intent::CreateFile);
        assert!(has_kind(&outcome, AgentMessageKind::Completion));

        let ws = a.workspace();
        let ws = ws.lock().await;
        let current = ws.current().unwrap();
        assert_eq!(current.name, "calculator.py");
        assert_eq!(current.language.as_deref(), Some("python"));
        assert_eq!(ws.buffer(), "");
    }

    #[tokio::test]
    async fn test_delete_that_consumes_history() {
        let a = assistant();
        a.handle_command("create a python file named calculator").await;
        let outcome = a.handle_command("delete that file").await;
        assert_eq!(outcome.intent, Intent::DeleteLast);
        assert!(has_kind(&outcome, AgentMessageKind::Completion));

        let ws = a.workspace();
        let ws = ws.lock().await;
        assert!(ws.find_by_name("calculator.py").is_none());
        assert!(ws.current().is_none());
        assert!(ws.history().is_empty());
    }

    #[tokio::test]
    async fn test_delete_that_with_empty_history_is_question() {
        let a = assistant();
        let outcome = a.handle_command("delete that file").await;
        assert!(has_kind(&outcome, AgentMessageKind::Question));
    }

    #[tokio::test]
    async fn test_remove_function_by_voice() {
        let a = assistant();
        a.handle_command("create a javascript file named math").await;
        {
            let ws = a.workspace();
            let mut ws = ws.lock().await;
            ws.set_buffer("const x = 1;\nfunction add(a, b) {\n    return a + b;\n}\nconst y = 2;")
                .unwrap();
        }
        let outcome = a.handle_command("remove function add").await;
        assert_eq!(outcome.intent, Intent::RemoveFunction);
        assert!(has_kind(&outcome, AgentMessageKind::Completion));

        let ws = a.workspace();
        let ws = ws.lock().await;
        assert_eq!(ws.buffer(), "const x = 1;\nconst y = 2;");
    }

    #[tokio::test]
    async fn test_remove_missing_function_is_question() {
        let a = assistant();
        a.handle_command("create a javascript file named math").await;
        {
            let ws = a.workspace();
            let mut ws = ws.lock().await;
            ws.set_buffer("const x = 1;").unwrap();
        }
        let outcome = a.handle_command("remove function subtract").await;
        assert!(has_kind(&outcome, AgentMessageKind::Question));
    }

    #[tokio::test]
    async fn test_generate_fallback_sets_pending() {
        let a = assistant();
        let outcome = a.handle_command("a login form please").await;
        assert_eq!(outcome.intent, Intent::Generate);
        let pending = outcome.pending.unwrap();
        assert_eq!(pending.language, "javascript");
        assert_eq!(pending.file_name, "untitled");
        assert!(matches!(pending.operation, Some(PendingOperation::Create)));
    }

    #[tokio::test]
    async fn test_approve_pending_creates_file() {
        let a = assistant();
        a.handle_command("a login form please").await;
        let outcome = a.approve_pending().await;
        assert!(has_kind(&outcome, AgentMessageKind::Completion));

        let ws = a.workspace();
        let ws = ws.lock().await;
        assert!(ws.current().is_some());
        assert!(!ws.buffer().is_empty());
    }

    #[tokio::test]
    async fn test_reject_pending_discards() {
        let a = assistant();
        a.handle_command("a login form please").await;
        a.reject_pending().await;
        let ws = a.workspace();
        let ws = ws.lock().await;
        assert!(ws.pending().is_none());
        assert!(ws.current().is_none());
    }

    #[tokio::test]
    async fn test_rename_by_voice() {
        let a = assistant();
        a.handle_command("create a python file named app").await;
        let outcome = a.handle_command("rename app.py to main.py").await;
        assert!(has_kind(&outcome, AgentMessageKind::Completion));

        let ws = a.workspace();
        let ws = ws.lock().await;
        assert_eq!(ws.current().unwrap().name, "main.py");
    }

    #[tokio::test]
    async fn test_edit_line_by_voice() {
        let a = assistant();
        a.handle_command("create a javascript file named app").await;
        {
            let ws = a.workspace();
            let mut ws = ws.lock().await;
            ws.set_buffer("let a = 1;\nlet b = 2;").unwrap();
        }
        let outcome = a.handle_command("change line 2 to \"let b = 3;\"").await;
        assert!(has_kind(&outcome, AgentMessageKind::Completion));

        let ws = a.workspace();
        let ws = ws.lock().await;
        assert_eq!(ws.buffer(), "let a = 1;\nlet b = 3;");
    }

    #[tokio::test]
    async fn test_debug_without_file_is_question() {
        let a = assistant();
        let outcome = a.handle_command("debug").await;
        assert!(has_kind(&outcome, AgentMessageKind::Question));
        assert!(outcome.debug_output.is_none());
    }

    #[tokio::test]
    async fn test_debug_reports_analysis() {
        let a = assistant();
        a.handle_command("create a javascript file named app").await;
        {
            let ws = a.workspace();
            let mut ws = ws.lock().await;
            ws.set_buffer("function greet() {\n  console.log(\"hello\");\n  return 1;\n}")
                .unwrap();
        }
        let outcome = a.handle_command("run code").await;
        let output = outcome.debug_output.unwrap();
        assert!(output.contains("Line 2: hello"));
        assert!(output.contains("Total lines: 4"));
    }

    #[tokio::test]
    async fn test_invalid_transcription_is_question() {
        let a = assistant();
        let t = Transcription {
            text: String::new(),
            confidence: 0.9,
            is_final: true,
        };
        let outcome = a.handle_transcription(&t).await;
        assert!(has_kind(&outcome, AgentMessageKind::Question));
    }
}
