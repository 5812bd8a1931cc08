//! voicedev_core - engine for the VoiceDev voice-driven coding assistant
//!
//! A spoken command is transcribed by an external collaborator, then flows
//! through this crate: intent classification, argument extraction, and
//! either an in-memory project-tree mutation, a function/line edit, or a
//! remote-or-local code generation held in a pending slot until approved.
//!
//! Modules:
//! - transcript: validated speech results, language detection, phrase translation
//! - language: language/extension resolver
//! - intent: ordered intent classifier
//! - extract: per-intent argument extraction
//! - templates: construct detection, prompt shaping, canned snippets
//! - generate: remote completion API with local fallback
//! - project: file-tree mutation engine and pending-action slot
//! - editing: function-region and line editing
//! - history: action history with deictic resolution
//! - assistant: command orchestration and agent messages
//! - store: best-effort persisted records
//! - server: thin HTTP surface
//! - config: environment + file configuration
//! - structured_log: JSON event logging

pub mod assistant;
pub mod config;
pub mod editing;
pub mod error;
pub mod extract;
pub mod generate;
pub mod history;
pub mod intent;
pub mod language;
pub mod project;
pub mod server;
pub mod store;
pub mod structured_log;
pub mod templates;
pub mod transcript;

// Re-export key types for convenience
pub use assistant::{AgentMessage, AgentMessageKind, CommandOutcome, NullSpeech, SpeechSynth, VoiceAssistant};

pub use config::AppConfig;

pub use error::VoiceDevError;

pub use generate::{CodeGenerator, ConfidenceTier, GeneratedCode};

pub use history::{ActionEntry, ActionHistory, ActionKind};

pub use intent::{classify, ClassifyContext, Intent};

pub use project::{AppliedPending, FileNode, NodeKind, PendingAction, PendingOperation, ProjectWorkspace};

pub use store::{CodeGenerationRecord, ProjectFileRecord, RecordStore, VoiceCommandRecord};

pub use transcript::{detect_spoken_language, translate_phrase, TranslatedCommand, Transcription};
