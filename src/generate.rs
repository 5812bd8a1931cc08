//! Code generator - remote completion API with local template fallback
//!
//! Two interchangeable strategies behind one call: delegate the rewritten
//! instruction to an OpenAI-compatible completions endpoint, or fall back
//! to the canned snippet table. The caller never sees a generation error;
//! the confidence tier is the only trace of which path ran.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::store::{NewCodeGeneration, RecordStore};
use crate::structured_log::{log_event, LogLevel};
use crate::templates;

const COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are a voice-driven code generation assistant. Generate clean, well-commented code based on natural voice commands.\n\nGuidelines:\n- Generate only the requested code construct (function, variable, loop, etc.)\n- Use proper indentation and formatting\n- Add minimal but helpful comments\n- Respond with code only, no explanations or markdown\n- Handle various constructs: functions, variables, loops, conditionals, classes, imports, etc.\n- If user asks for file operations, generate appropriate file handling code\n- For deployment or workflow commands, generate setup/configuration code";

/// Which strategy produced a result. The values are fixed and decreasing;
/// users only ever see the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    RemoteSuccess,
    RemoteFailedLocalFallback,
    NoCredentialLocalOnly,
}

impl ConfidenceTier {
    pub fn confidence(self) -> f32 {
        match self {
            ConfidenceTier::RemoteSuccess => 0.94,
            ConfidenceTier::RemoteFailedLocalFallback => 0.85,
            ConfidenceTier::NoCredentialLocalOnly => 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub code: String,
    pub language: String,
    pub file_name: String,
    pub confidence: f32,
    pub tier: ConfidenceTier,
}

#[derive(Debug)]
struct RemoteError {
    message: String,
    error_type: String,
}

pub struct CodeGenerator {
    config: AppConfig,
    client: reqwest::Client,
    store: Option<Arc<RecordStore>>,
}

impl CodeGenerator {
    pub fn new(config: AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config,
            client,
            store: None,
        }
    }

    /// Attach the persisted history collaborator. Generation results are
    /// appended fire-and-forget; append failure never fails a generation.
    pub fn with_store(mut self, store: Arc<RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Generate code for a prompt. Infallible by contract: remote errors
    /// select the local strategy transparently.
    pub async fn generate(&self, prompt: &str, language: &str, file_name: &str) -> GeneratedCode {
        let instruction = templates::build_instruction(prompt, language);

        let (code, tier) = match self.config.groq_api_key.as_deref().filter(|k| !k.is_empty()) {
            None => (
                templates::local_snippet(prompt, language),
                ConfidenceTier::NoCredentialLocalOnly,
            ),
            Some(key) => match self.request_completion(&instruction, key).await {
                Ok(text) if !text.trim().is_empty() => (text, ConfidenceTier::RemoteSuccess),
                Ok(_) => (
                    templates::local_snippet(prompt, language),
                    ConfidenceTier::RemoteFailedLocalFallback,
                ),
                Err(e) => {
                    log_event(
                        LogLevel::Warn,
                        "GENERATOR",
                        "remote_failed",
                        json!({ "error": e.message, "error_type": e.error_type }),
                    );
                    (
                        templates::local_snippet(prompt, language),
                        ConfidenceTier::RemoteFailedLocalFallback,
                    )
                }
            },
        };

        let generated = GeneratedCode {
            code,
            language: language.to_string(),
            file_name: file_name.to_string(),
            confidence: tier.confidence(),
            tier,
        };

        log_event(
            LogLevel::Info,
            "GENERATOR",
            "generated",
            json!({ "tier": tier, "language": language, "file_name": file_name }),
        );

        self.persist(&generated);
        generated
    }

    async fn request_completion(&self, instruction: &str, api_key: &str) -> Result<String, RemoteError> {
        let request_body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": instruction },
            ],
        });

        let response = self
            .client
            .post(COMPLETIONS_URL)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| RemoteError {
                message: format!("Request failed: {e}"),
                error_type: "network_error".to_string(),
            })?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| RemoteError {
            message: format!("Failed to parse response: {e}"),
            error_type: "parse_error".to_string(),
        })?;

        if !status.is_success() {
            return Err(RemoteError {
                message: body["error"]["message"]
                    .as_str()
                    .unwrap_or("Unknown error")
                    .to_string(),
                error_type: body["error"]["type"]
                    .as_str()
                    .unwrap_or("api_error")
                    .to_string(),
            });
        }

        let content = body["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["message"]["content"].as_str())
            .unwrap_or("")
            .to_string();

        Ok(content)
    }

    fn persist(&self, generated: &GeneratedCode) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let record = NewCodeGeneration {
            command_id: None,
            generated_code: generated.code.clone(),
            language: generated.language.clone(),
            file_name: generated.file_name.clone(),
            file_path: generated.file_name.clone(),
            approved: false,
            applied: false,
        };
        tokio::spawn(async move {
            if let Err(e) = store.create_code_generation(record).await {
                log_event(
                    LogLevel::Warn,
                    "GENERATOR",
                    "persist_failed",
                    json!({ "error": e.to_string() }),
                );
            }
        });
    }
}
