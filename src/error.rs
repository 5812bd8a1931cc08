//! Error taxonomy for the command pipeline.
//!
//! Nothing here is fatal: the assistant turns every variant into a
//! user-facing clarification message. See `assistant.rs`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceDevError {
    /// Required arguments could not be extracted from the command text.
    #[error("could not extract {0} from command")]
    ExtractionFailed(&'static str),

    /// Delete/rename target does not exist in the project tree.
    #[error("\"{0}\" not found in project")]
    TargetNotFound(String),

    /// Function-region edit found no matching definition.
    #[error("function \"{0}\" not found in current file")]
    FunctionNotFound(String),

    /// Line edit addressed a line outside the buffer.
    #[error("line {requested} out of range (file has {available} lines)")]
    LineOutOfRange { requested: usize, available: usize },

    /// Operation needs an open file and none is current.
    #[error("no file is currently open")]
    NoFileOpen,

    /// Transcript rejected at the boundary (non-final, empty, bad confidence).
    #[error("invalid transcript: {0}")]
    InvalidTranscript(&'static str),

    /// Record store failure. Callers on the voice path log and swallow this.
    #[error("record store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VoiceDevError>;
