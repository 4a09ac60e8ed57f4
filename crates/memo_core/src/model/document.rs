//! Opaque block document model.
//!
//! # Responsibility
//! - Hold the ordered block list produced by the embedded editor.
//! - Provide the default content used for new or empty memos.
//!
//! # Invariants
//! - Blocks are stored as-is; their structure belongs to the editor.
//! - Serialized form is a bare JSON array, so values round-trip exactly.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Ordered block content of one memo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoDocument {
    blocks: Vec<Value>,
}

impl MemoDocument {
    /// Wraps editor-provided blocks without inspecting them.
    pub fn from_blocks(blocks: Vec<Value>) -> Self {
        Self { blocks }
    }

    /// Single empty paragraph, shown for new memos and empty documents.
    pub fn default_content() -> Self {
        Self {
            blocks: vec![default_block()],
        }
    }

    /// Empty block lists are never shown to the editor.
    pub fn or_default_if_empty(self) -> Self {
        if self.blocks.is_empty() {
            Self::default_content()
        } else {
            self
        }
    }

    pub fn blocks(&self) -> &[Value] {
        &self.blocks
    }

    pub fn push_block(&mut self, block: Value) {
        self.blocks.push(block);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether this equals the single-empty-paragraph default.
    pub fn is_default_content(&self) -> bool {
        self.blocks.len() == 1 && self.blocks[0] == default_block()
    }
}

impl Default for MemoDocument {
    fn default() -> Self {
        Self::default_content()
    }
}

/// Builds a paragraph block holding one plain text run.
pub fn paragraph_block(text: &str) -> Value {
    json!({
        "type": "paragraph",
        "content": [{ "type": "text", "text": text, "styles": {} }],
    })
}

fn default_block() -> Value {
    json!({ "type": "paragraph", "content": [] })
}
