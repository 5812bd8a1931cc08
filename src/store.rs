//! Record store - persisted history of commands, generations, and files
//!
//! JSON store at ~/.voicedev/records.json. Append-mostly, best-effort:
//! callers on the voice path log failures and keep going; only the HTTP
//! surface reports store errors to its client.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

fn default_store_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".voicedev").join("records.json")
}

// =============================================================================
// RECORD TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceCommandRecord {
    pub id: String,
    pub original_text: String,
    pub translated_text: String,
    pub detected_language: String,
    pub confidence: f32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVoiceCommand {
    pub original_text: String,
    pub translated_text: String,
    pub detected_language: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeGenerationRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
    pub generated_code: String,
    pub language: String,
    pub file_name: String,
    pub file_path: String,
    pub approved: bool,
    pub applied: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCodeGeneration {
    #[serde(default)]
    pub command_id: Option<String>,
    pub generated_code: String,
    pub language: String,
    pub file_name: String,
    pub file_path: String,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub applied: bool,
}

/// PATCH payload; only present fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeGenerationUpdate {
    pub generated_code: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub approved: Option<bool>,
    pub applied: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFileRecord {
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    pub content: String,
    pub language: String,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProjectFile {
    pub file_name: String,
    pub file_path: String,
    pub content: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFileUpdate {
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Records {
    voice_commands: Vec<VoiceCommandRecord>,
    code_generations: Vec<CodeGenerationRecord>,
    project_files: Vec<ProjectFileRecord>,
}

// =============================================================================
// STORE
// =============================================================================

/// Store manager with thread-safe access.
pub struct RecordStore {
    store_path: PathBuf,
    // Serializes read-modify-write cycles in async context
    _lock: Mutex<()>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            store_path: default_store_path(),
            _lock: Mutex::new(()),
        }
    }

    /// Store with a custom path (useful for testing).
    pub fn new_with_path(path: PathBuf) -> Self {
        Self {
            store_path: path,
            _lock: Mutex::new(()),
        }
    }

    async fn ensure_store(&self) -> Result<()> {
        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create record store directory")?;
        }
        if !self.store_path.exists() {
            let json = serde_json::to_string_pretty(&Records::default())?;
            fs::write(&self.store_path, json)
                .await
                .context("Failed to initialize record store")?;
        }
        Ok(())
    }

    async fn load(&self) -> Result<Records> {
        self.ensure_store().await?;
        let content = fs::read_to_string(&self.store_path)
            .await
            .context("Failed to read record store")?;
        serde_json::from_str(&content).context("Failed to parse record store")
    }

    async fn save(&self, records: &Records) -> Result<()> {
        self.ensure_store().await?;
        let json = serde_json::to_string_pretty(records).context("Failed to serialize record store")?;
        fs::write(&self.store_path, json)
            .await
            .context("Failed to write record store")
    }

    // =========================================================================
    // VOICE COMMANDS
    // =========================================================================

    pub async fn create_voice_command(&self, new: NewVoiceCommand) -> Result<VoiceCommandRecord> {
        let _guard = self._lock.lock().await;
        let mut records = self.load().await?;
        let record = VoiceCommandRecord {
            id: Uuid::new_v4().to_string(),
            original_text: new.original_text,
            translated_text: new.translated_text,
            detected_language: new.detected_language,
            confidence: new.confidence,
            created_at: Utc::now(),
        };
        // Newest first
        records.voice_commands.insert(0, record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    pub async fn get_voice_commands(&self) -> Result<Vec<VoiceCommandRecord>> {
        let _guard = self._lock.lock().await;
        Ok(self.load().await?.voice_commands)
    }

    // =========================================================================
    // CODE GENERATIONS
    // =========================================================================

    pub async fn create_code_generation(&self, new: NewCodeGeneration) -> Result<CodeGenerationRecord> {
        let _guard = self._lock.lock().await;
        let mut records = self.load().await?;
        let record = CodeGenerationRecord {
            id: Uuid::new_v4().to_string(),
            command_id: new.command_id,
            generated_code: new.generated_code,
            language: new.language,
            file_name: new.file_name,
            file_path: new.file_path,
            approved: new.approved,
            applied: new.applied,
            created_at: Utc::now(),
        };
        records.code_generations.insert(0, record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    pub async fn get_code_generations(&self) -> Result<Vec<CodeGenerationRecord>> {
        let _guard = self._lock.lock().await;
        Ok(self.load().await?.code_generations)
    }

    /// Update a generation record by id; None when the id is unknown.
    pub async fn update_code_generation(
        &self,
        id: &str,
        updates: CodeGenerationUpdate,
    ) -> Result<Option<CodeGenerationRecord>> {
        let _guard = self._lock.lock().await;
        let mut records = self.load().await?;
        let Some(record) = records.code_generations.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(code) = updates.generated_code {
            record.generated_code = code;
        }
        if let Some(name) = updates.file_name {
            record.file_name = name;
        }
        if let Some(path) = updates.file_path {
            record.file_path = path;
        }
        if let Some(approved) = updates.approved {
            record.approved = approved;
        }
        if let Some(applied) = updates.applied {
            record.applied = applied;
        }
        let updated = record.clone();
        self.save(&records).await?;
        Ok(Some(updated))
    }

    // =========================================================================
    // PROJECT FILES
    // =========================================================================

    pub async fn create_project_file(&self, new: NewProjectFile) -> Result<ProjectFileRecord> {
        let _guard = self._lock.lock().await;
        let mut records = self.load().await?;
        let record = ProjectFileRecord {
            id: Uuid::new_v4().to_string(),
            file_name: new.file_name,
            file_path: new.file_path,
            content: new.content,
            language: new.language,
            last_modified: Utc::now(),
        };
        records.project_files.insert(0, record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    pub async fn get_project_files(&self) -> Result<Vec<ProjectFileRecord>> {
        let _guard = self._lock.lock().await;
        Ok(self.load().await?.project_files)
    }

    pub async fn update_project_file(
        &self,
        id: &str,
        updates: ProjectFileUpdate,
    ) -> Result<Option<ProjectFileRecord>> {
        let _guard = self._lock.lock().await;
        let mut records = self.load().await?;
        let Some(record) = records.project_files.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(name) = updates.file_name {
            record.file_name = name;
        }
        if let Some(path) = updates.file_path {
            record.file_path = path;
        }
        if let Some(content) = updates.content {
            record.content = content;
        }
        if let Some(language) = updates.language {
            record.language = language;
        }
        record.last_modified = Utc::now();
        let updated = record.clone();
        self.save(&records).await?;
        Ok(Some(updated))
    }

    pub fn store_path(&self) -> String {
        self.store_path.display().to_string()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
