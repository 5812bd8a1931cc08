//! HTTP surface - thin JSON API over a raw TCP listener
//!
//! Endpoints:
//!   POST  /api/command              - run a voice command through the assistant
//!   POST  /api/command/approve      - approve the pending generation
//!   POST  /api/command/reject       - reject the pending generation
//!   POST  /api/generate-code        - direct generation (remote-or-local)
//!   POST  /api/translate            - phrase translation + language detection
//!   POST  /api/voice-commands       - store a voice command record
//!   GET   /api/voice-commands
//!   POST  /api/code-generations     - store a generation record
//!   GET   /api/code-generations
//!   PATCH /api/code-generations/:id
//!   POST  /api/project-files        - store a project file record
//!   GET   /api/project-files
//!   PATCH /api/project-files/:id
//!   GET   /api/ping                 - health check
//!
//! Invalid payloads get a generic "Invalid ... data" 400; unknown record
//! ids on PATCH get a generic "not found" 404.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::assistant::VoiceAssistant;
use crate::extract;
use crate::generate::CodeGenerator;
use crate::store::{CodeGenerationUpdate, NewCodeGeneration, NewProjectFile, NewVoiceCommand, ProjectFileUpdate, RecordStore};
use crate::structured_log::{log_event, LogLevel};
use crate::transcript::translate_phrase;

pub struct AppState {
    pub assistant: VoiceAssistant,
    pub generator: CodeGenerator,
    pub store: Arc<RecordStore>,
}

#[derive(Debug, Deserialize)]
struct CommandRequest {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    prompt: String,
    #[serde(default = "default_generate_language")]
    language: String,
    #[serde(default = "default_generate_file", rename = "fileName")]
    file_name: String,
}

fn default_generate_language() -> String {
    "javascript".to_string()
}

fn default_generate_file() -> String {
    "untitled".to_string()
}

#[derive(Debug, Deserialize)]
struct TranslateRequest {
    text: String,
}

/// Start the server. Runs until the process exits.
pub async fn start_server(port: u16, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    log_event(
        LogLevel::Info,
        "SERVER",
        "listening",
        json!({ "addr": format!("http://{addr}") }),
    );

    loop {
        match listener.accept().await {
            Ok((mut socket, _)) => {
                let state = state.clone();
                tokio::spawn(async move {
                    let mut buffer = vec![0u8; 65536];
                    if let Ok(n) = socket.read(&mut buffer).await {
                        if n > 0 {
                            let request = String::from_utf8_lossy(&buffer[..n]).to_string();
                            let response = handle_request(&request, &state).await;
                            let _ = socket.write_all(response.as_bytes()).await;
                        }
                    }
                });
            }
            Err(e) => {
                log_event(LogLevel::Warn, "SERVER", "accept_error", json!({ "error": e.to_string() }));
            }
        }
    }
}

async fn handle_request(request: &str, state: &Arc<AppState>) -> String {
    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        return http_json(400, r#"{"error":"Bad request"}"#);
    }
    let method = parts[0];
    let path = parts[1];
    let body = request.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("");

    match (method, path) {
        ("GET", "/api/ping") => http_json(200, r#"{"status":"ok","server":"voicedev"}"#),

        ("POST", "/api/command") => match serde_json::from_str::<CommandRequest>(body) {
            Ok(req) => {
                let outcome = state.assistant.handle_command(&req.text).await;
                match serde_json::to_string(&outcome) {
                    Ok(json) => http_json(200, &json),
                    Err(_) => http_json(500, r#"{"error":"Internal error"}"#),
                }
            }
            Err(_) => http_json(400, r#"{"error":"Invalid voice command data"}"#),
        },

        ("POST", "/api/command/approve") => {
            let outcome = state.assistant.approve_pending().await;
            json_or_500(&outcome)
        }

        ("POST", "/api/command/reject") => {
            let outcome = state.assistant.reject_pending().await;
            json_or_500(&outcome)
        }

        ("POST", "/api/generate-code") => match serde_json::from_str::<GenerateRequest>(body) {
            Ok(req) => {
                // File-creation commands carry their own target identity.
                let probe = extract::detect_file_creation(&req.prompt);
                let language = probe.language.clone().unwrap_or(req.language);
                let file_name = probe.file_name.clone().unwrap_or(req.file_name);
                let generated = state.generator.generate(&req.prompt, &language, &file_name).await;
                let response = json!({
                    "code": generated.code,
                    "language": generated.language,
                    "fileName": generated.file_name,
                    "confidence": generated.confidence,
                    "fileExtension": probe.extension,
                    "isFileCreation": probe.is_file_creation,
                });
                http_json(200, &response.to_string())
            }
            Err(_) => http_json(400, r#"{"error":"Invalid code generation data"}"#),
        },

        ("POST", "/api/translate") => match serde_json::from_str::<TranslateRequest>(body) {
            Ok(req) => {
                let result = translate_phrase(&req.text);
                let response = json!({
                    "originalText": result.original_text,
                    "translatedText": result.translated_text,
                    "detectedLanguage": result.detected_language,
                    "confidence": result.confidence,
                });
                http_json(200, &response.to_string())
            }
            Err(_) => http_json(400, r#"{"error":"Translation failed"}"#),
        },

        ("POST", "/api/voice-commands") => match serde_json::from_str::<NewVoiceCommand>(body) {
            Ok(new) => match state.store.create_voice_command(new).await {
                Ok(record) => json_or_500(&record),
                Err(_) => http_json(500, r#"{"error":"Internal error"}"#),
            },
            Err(_) => http_json(400, r#"{"error":"Invalid voice command data"}"#),
        },

        ("GET", "/api/voice-commands") => match state.store.get_voice_commands().await {
            Ok(records) => json_or_500(&records),
            Err(_) => http_json(500, r#"{"error":"Internal error"}"#),
        },

        ("POST", "/api/code-generations") => match serde_json::from_str::<NewCodeGeneration>(body) {
            Ok(new) => match state.store.create_code_generation(new).await {
                Ok(record) => json_or_500(&record),
                Err(_) => http_json(500, r#"{"error":"Internal error"}"#),
            },
            Err(_) => http_json(400, r#"{"error":"Invalid code generation data"}"#),
        },

        ("GET", "/api/code-generations") => match state.store.get_code_generations().await {
            Ok(records) => json_or_500(&records),
            Err(_) => http_json(500, r#"{"error":"Internal error"}"#),
        },

        ("POST", "/api/project-files") => match serde_json::from_str::<NewProjectFile>(body) {
            Ok(new) => match state.store.create_project_file(new).await {
                Ok(record) => json_or_500(&record),
                Err(_) => http_json(500, r#"{"error":"Internal error"}"#),
            },
            Err(_) => http_json(400, r#"{"error":"Invalid project file data"}"#),
        },

        ("GET", "/api/project-files") => match state.store.get_project_files().await {
            Ok(records) => json_or_500(&records),
            Err(_) => http_json(500, r#"{"error":"Internal error"}"#),
        },

        ("PATCH", _) if path.starts_with("/api/code-generations/") => {
            let id = path.trim_start_matches("/api/code-generations/");
            match serde_json::from_str::<CodeGenerationUpdate>(body) {
                Ok(updates) => match state.store.update_code_generation(id, updates).await {
                    Ok(Some(record)) => json_or_500(&record),
                    Ok(None) => http_json(404, r#"{"error":"Code generation not found"}"#),
                    Err(_) => http_json(500, r#"{"error":"Internal error"}"#),
                },
                Err(_) => http_json(400, r#"{"error":"Invalid code generation data"}"#),
            }
        }

        ("PATCH", _) if path.starts_with("/api/project-files/") => {
            let id = path.trim_start_matches("/api/project-files/");
            match serde_json::from_str::<ProjectFileUpdate>(body) {
                Ok(updates) => match state.store.update_project_file(id, updates).await {
                    Ok(Some(record)) => json_or_500(&record),
                    Ok(None) => http_json(404, r#"{"error":"Project file not found"}"#),
                    Err(_) => http_json(500, r#"{"error":"Internal error"}"#),
                },
                Err(_) => http_json(400, r#"{"error":"Invalid project file data"}"#),
            }
        }

        _ => http_json(404, r#"{"error":"Not found"}"#),
    }
}

fn json_or_500<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => http_json(200, &json),
        Err(_) => http_json(500, r#"{"error":"Internal error"}"#),
    }
}

fn http_json(status: u16, body: &str) -> String {
    let status_text = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nAccess-Control-Allow-Origin: *\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn test_state() -> (tempfile::TempDir, Arc<AppState>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordStore::new_with_path(dir.path().join("records.json")));
        let config = AppConfig::default();
        let state = Arc::new(AppState {
            assistant: VoiceAssistant::new(config.clone()).with_store(store.clone()),
            generator: CodeGenerator::new(config).with_store(store.clone()),
            store,
        });
        (dir, state)
    }

    fn body_of(response: &str) -> &str {
        response.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("")
    }

    #[tokio::test]
    async fn test_ping() {
        let (_dir, state) = test_state();
        let response = handle_request("GET /api/ping HTTP/1.1\r\n\r\n", &state).await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(body_of(&response).contains("\"ok\""));
    }

    #[tokio::test]
    async fn test_command_endpoint_runs_pipeline() {
        let (_dir, state) = test_state();
        let request = "POST /api/command HTTP/1.1\r\nContent-Type: application/json\r\n\r\n{\"text\":\"create a python file named calculator\"}";
        let response = handle_request(request, &state).await;
        assert!(response.starts_with("HTTP/1.1 200"));
        let body = body_of(&response);
        assert!(body.contains("create_file"));
        assert!(body.contains("calculator.py"));
    }

    #[tokio::test]
    async fn test_invalid_command_body_is_400() {
        let (_dir, state) = test_state();
        let request = "POST /api/command HTTP/1.1\r\n\r\n{\"nope\":true}";
        let response = handle_request(request, &state).await;
        assert!(response.starts_with("HTTP/1.1 400"));
        assert!(body_of(&response).contains("Invalid voice command data"));
    }

    #[tokio::test]
    async fn test_generate_code_local_fallback() {
        let (_dir, state) = test_state();
        let request = "POST /api/generate-code HTTP/1.1\r\n\r\n{\"prompt\":\"make a loop\",\"language\":\"python\",\"fileName\":\"loop.py\"}";
        let response = handle_request(request, &state).await;
        assert!(response.starts_with("HTTP/1.1 200"));
        let body = body_of(&response);
        assert!(body.contains("for i in range(10):"));
        assert!(body.contains("\"isFileCreation\":false"));
    }

    #[tokio::test]
    async fn test_patch_unknown_generation_is_404() {
        let (_dir, state) = test_state();
        let request = "PATCH /api/code-generations/nope HTTP/1.1\r\n\r\n{\"approved\":true}";
        let response = handle_request(request, &state).await;
        assert!(response.starts_with("HTTP/1.1 404"));
        assert!(body_of(&response).contains("Code generation not found"));
    }

    #[tokio::test]
    async fn test_voice_command_record_round_trip() {
        let (_dir, state) = test_state();
        let post = "POST /api/voice-commands HTTP/1.1\r\n\r\n{\"original_text\":\"hi\",\"translated_text\":\"hi\",\"detected_language\":\"en\",\"confidence\":0.7}";
        let response = handle_request(post, &state).await;
        assert!(response.starts_with("HTTP/1.1 200"));

        let get = handle_request("GET /api/voice-commands HTTP/1.1\r\n\r\n", &state).await;
        assert!(body_of(&get).contains("\"original_text\":\"hi\""));
    }

    #[tokio::test]
    async fn test_translate_endpoint() {
        let (_dir, state) = test_state();
        let request = "POST /api/translate HTTP/1.1\r\n\r\n{\"text\":\"crear un bucle\"}";
        let response = handle_request(request, &state).await;
        let body = body_of(&response);
        assert!(body.contains("create a loop"));
    }
}
