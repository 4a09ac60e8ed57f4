//! Editing-surface contracts.
//!
//! # Responsibility
//! - Describe the embedded editor as a narrow collaborator: built from an
//!   initial document, read back as a snapshot.
//! - Provide `BlockEditor`, a minimal surface for hosts without their own.
//!
//! # Invariants
//! - Core never interprets block content handed out by a surface.

mod binding;

pub use binding::EditorBinding;

use crate::model::document::MemoDocument;
use serde_json::Value;

/// A live editing surface holding one memo's document.
pub trait EditorSurface {
    /// Current document snapshot, read on demand by save.
    fn document(&self) -> MemoDocument;
}

/// Builds a fresh surface for each loaded document.
pub trait EditorFactory {
    type Surface: EditorSurface;

    fn create(&self, initial: &MemoDocument) -> Self::Surface;
}

/// Plain block-list editor.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEditor {
    document: MemoDocument,
}

impl BlockEditor {
    pub fn new(initial: MemoDocument) -> Self {
        Self { document: initial }
    }

    pub fn append_block(&mut self, block: Value) {
        self.document.push_block(block);
    }

    /// Replaces the whole document, as a host editor reporting its state does.
    pub fn replace_document(&mut self, document: MemoDocument) {
        self.document = document;
    }

    pub fn blocks(&self) -> &[Value] {
        self.document.blocks()
    }
}

impl EditorSurface for BlockEditor {
    fn document(&self) -> MemoDocument {
        self.document.clone()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BlockEditorFactory;

impl EditorFactory for BlockEditorFactory {
    type Surface = BlockEditor;

    fn create(&self, initial: &MemoDocument) -> BlockEditor {
        BlockEditor::new(initial.clone())
    }
}
