//! Project workspace - file-tree mutation engine
//!
//! Owns the flat collection of file/folder nodes, the "currently open"
//! pointer, the editor buffer, the single pending-action slot, and the
//! action history side-log. All mutation goes through the methods here;
//! callers wrap the workspace in one mutex (see `assistant.rs`) so there
//! is a single writer.
//!
//! Invariants:
//! - at most one node is current at a time
//! - the tree entry's `content` and the editor buffer are updated together
//!   on every edit; the current pointer is an id, so renames can never
//!   leave a stale reference behind

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::VoiceDevError;
use crate::history::{ActionHistory, ActionKind};
use crate::language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// A file or folder in the project tree. The namespace is flat: `path`
/// mirrors `name`, and folder `children` exist in the shape but are not
/// populated by the mutation logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
}

impl FileNode {
    fn file(name: &str, language: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            kind: NodeKind::File,
            path: name.to_string(),
            content: Some(content.to_string()),
            language: Some(language.to_string()),
            children: Vec::new(),
        }
    }

    fn folder(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            kind: NodeKind::Folder,
            path: name.to_string(),
            content: None,
            language: None,
            children: Vec::new(),
        }
    }
}

/// A generated-but-unapproved code change. Single slot on the workspace,
/// last write wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAction {
    pub code: String,
    pub language: String,
    pub file_name: String,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<PendingOperation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingOperation {
    Create,
    Modify,
    Replace,
}

/// What happened when a pending action was approved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedPending {
    pub file_name: String,
    /// True when a new file node was created; false when the code was
    /// appended to the open file.
    pub created: bool,
}

#[derive(Debug)]
pub struct ProjectWorkspace {
    nodes: Vec<FileNode>,
    current_id: Option<String>,
    buffer: String,
    pending: Option<PendingAction>,
    history: ActionHistory,
    /// Generation language used when no file is open.
    selected_language: String,
}

impl Default for ProjectWorkspace {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            current_id: None,
            buffer: String::new(),
            pending: None,
            history: ActionHistory::new(),
            selected_language: "javascript".to_string(),
        }
    }
}

impl ProjectWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Workspace seeded with the starter folders the editor shows on a
    /// fresh project.
    pub fn with_starter_folders() -> Self {
        let mut ws = Self::new();
        ws.nodes.push(FileNode::folder("src"));
        ws.nodes.push(FileNode::folder("components"));
        ws
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn nodes(&self) -> &[FileNode] {
        &self.nodes
    }

    pub fn current(&self) -> Option<&FileNode> {
        let id = self.current_id.as_deref()?;
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &ActionHistory {
        &self.history
    }

    pub fn find_by_name(&self, name: &str) -> Option<&FileNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Language used for generation when no file is open.
    pub fn selected_language(&self) -> &str {
        &self.selected_language
    }

    pub fn set_selected_language(&mut self, language: &str) {
        self.selected_language = language.to_string();
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Create a file node, make it current, and reset the buffer to the
    /// given content (empty for plain voice creation).
    pub fn create_file(&mut self, name: &str, lang: &str, content: &str) -> &FileNode {
        let node = FileNode::file(name, lang, content);
        let id = node.id.clone();
        self.nodes.push(node);
        self.current_id = Some(id.clone());
        self.buffer = content.to_string();
        self.selected_language = lang.to_string();
        self.history.record(
            ActionKind::FileCreated,
            name,
            json!({ "language": lang, "id": id }),
        );
        self.nodes.last().unwrap()
    }

    pub fn create_folder(&mut self, name: &str) -> &FileNode {
        let node = FileNode::folder(name);
        let id = node.id.clone();
        self.nodes.push(node);
        self.history.record(ActionKind::FolderCreated, name, json!({ "id": id }));
        self.nodes.last().unwrap()
    }

    /// Resolve a delete target: exact name match first, then
    /// case-insensitive containment in either direction. First match by
    /// that priority wins; no match is reported, never silently ignored.
    fn resolve_delete_target(&self, name: &str) -> Option<usize> {
        if let Some(idx) = self.nodes.iter().position(|n| n.name == name) {
            return Some(idx);
        }
        let lower = name.to_lowercase();
        self.nodes.iter().position(|n| {
            let node_lower = n.name.to_lowercase();
            node_lower.contains(&lower) || lower.contains(&node_lower)
        })
    }

    /// Delete a node by (fuzzily matched) name. Returns the name of the
    /// node actually removed. Deleting the current node clears the pointer
    /// and empties the buffer.
    pub fn delete_named(&mut self, name: &str) -> Result<String, VoiceDevError> {
        let idx = self
            .resolve_delete_target(name)
            .ok_or_else(|| VoiceDevError::TargetNotFound(name.to_string()))?;
        let removed = self.nodes.remove(idx);
        if self.current_id.as_deref() == Some(removed.id.as_str()) {
            self.current_id = None;
            self.buffer.clear();
        }
        self.history.remove(&removed.name);
        Ok(removed.name)
    }

    /// Delete whatever the last create-type history entry targeted
    /// ("delete that"). Empty or non-create history is a not-found, never
    /// an arbitrary deletion.
    pub fn delete_last_created(&mut self) -> Result<String, VoiceDevError> {
        let (entry_id, target) = match self.history.last_created() {
            Some(entry) => (entry.id.clone(), entry.target.clone()),
            None => return Err(VoiceDevError::TargetNotFound("last created item".to_string())),
        };
        let name = self.delete_named(&target)?;
        self.history.remove(&entry_id);
        Ok(name)
    }

    /// Rename a node. Exact-name match only - no fuzzy fallback. `path`
    /// mirrors the new name. The current pointer is id-based, so an open
    /// file stays current across its rename.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), VoiceDevError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.name == old_name)
            .ok_or_else(|| VoiceDevError::TargetNotFound(old_name.to_string()))?;
        node.name = new_name.to_string();
        node.path = new_name.to_string();
        Ok(())
    }

    /// Open a file by exact name: becomes current, buffer loads its
    /// content, language resolves from the extension if the node has none.
    pub fn open(&mut self, name: &str) -> Result<&FileNode, VoiceDevError> {
        let idx = self
            .nodes
            .iter()
            .position(|n| n.name == name && n.kind == NodeKind::File)
            .ok_or_else(|| VoiceDevError::TargetNotFound(name.to_string()))?;
        if self.nodes[idx].language.is_none() {
            self.nodes[idx].language = Some(language::language_from_file_name(name).to_string());
        }
        self.current_id = Some(self.nodes[idx].id.clone());
        self.buffer = self.nodes[idx].content.clone().unwrap_or_default();
        if let Some(lang) = self.nodes[idx].language.clone() {
            self.selected_language = lang;
        }
        Ok(&self.nodes[idx])
    }

    /// Write the buffer. Keeps the tree entry's content and the editor
    /// buffer in sync; no-op error when nothing is open.
    pub fn set_buffer(&mut self, text: &str) -> Result<(), VoiceDevError> {
        let id = self.current_id.clone().ok_or(VoiceDevError::NoFileOpen)?;
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(VoiceDevError::NoFileOpen)?;
        node.content = Some(text.to_string());
        self.buffer = text.to_string();
        Ok(())
    }

    pub fn record_action(&mut self, kind: ActionKind, target: &str, details: serde_json::Value) {
        self.history.record(kind, target, details);
    }

    // =========================================================================
    // PENDING SLOT
    // =========================================================================

    /// Stage a generated change. Single slot: staging while one is
    /// outstanding overwrites it (last write wins).
    pub fn set_pending(&mut self, action: PendingAction) {
        self.pending = Some(action);
    }

    /// Approve the outstanding pending action. With no current file the
    /// code becomes a new file node; with a current file it is appended to
    /// the buffer after a blank line - append, not replace, by design.
    pub fn apply_pending(&mut self) -> Result<AppliedPending, VoiceDevError> {
        let pending = self
            .pending
            .take()
            .ok_or(VoiceDevError::ExtractionFailed("pending action"))?;

        if self.current_id.is_none() {
            self.create_file(&pending.file_name, &pending.language, &pending.code);
            return Ok(AppliedPending {
                file_name: pending.file_name,
                created: true,
            });
        }

        let combined = format!("{}\n\n{}", self.buffer, pending.code);
        self.set_buffer(&combined)?;
        let target = self.current().map(|n| n.name.clone()).unwrap_or_default();
        self.history.record(
            ActionKind::CodeModified,
            &target,
            json!({ "action": "code_added", "newCode": pending.code }),
        );
        Ok(AppliedPending {
            file_name: target,
            created: false,
        })
    }

    /// Discard the outstanding pending action.
    pub fn reject_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }
}
