//! Active session state.
//!
//! # Responsibility
//! - Track which memo is selected, its loaded document and picker visibility.
//! - Tag in-flight loads so superseded results can be recognized.
//!
//! # Invariants
//! - At most one memo is selected at a time.
//! - `generation` increases on every selection change and reset; a ticket is
//!   live only while both its id and generation match.

use crate::model::document::MemoDocument;
use crate::model::memo::MemoId;

/// Coarse session phase: `NoMemo -> Loading -> Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NoMemo,
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
enum SessionContent {
    Loading,
    Loaded(MemoDocument),
}

/// Handle for one in-flight document load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    id: MemoId,
    generation: u64,
}

impl LoadTicket {
    /// Memo this load was issued for.
    pub fn id(&self) -> &MemoId {
        &self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    selected: Option<MemoId>,
    content: SessionContent,
    picker_open: bool,
    generation: u64,
}

impl SessionState {
    /// Fresh session: nothing selected, default content, picker shown.
    pub fn new() -> Self {
        Self {
            selected: None,
            content: SessionContent::Loaded(MemoDocument::default_content()),
            picker_open: true,
            generation: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.selected, &self.content) {
            (None, _) => SessionPhase::NoMemo,
            (Some(_), SessionContent::Loading) => SessionPhase::Loading,
            (Some(_), SessionContent::Loaded(_)) => SessionPhase::Ready,
        }
    }

    /// Selected memo, including one whose load is still in flight.
    pub fn selected(&self) -> Option<&MemoId> {
        self.selected.as_ref()
    }

    /// Memo whose content is loaded and editable.
    pub fn current(&self) -> Option<&MemoId> {
        match self.phase() {
            SessionPhase::Ready => self.selected.as_ref(),
            SessionPhase::NoMemo | SessionPhase::Loading => None,
        }
    }

    /// Loaded document, `None` while a load is in flight.
    pub fn document(&self) -> Option<&MemoDocument> {
        match &self.content {
            SessionContent::Loading => None,
            SessionContent::Loaded(document) => Some(document),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == SessionPhase::Loading
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    pub(crate) fn set_picker_open(&mut self, open: bool) {
        self.picker_open = open;
    }

    pub(crate) fn begin_load(&mut self, id: MemoId) -> LoadTicket {
        self.generation += 1;
        self.selected = Some(id.clone());
        self.content = SessionContent::Loading;
        LoadTicket {
            id,
            generation: self.generation,
        }
    }

    pub(crate) fn is_live(&self, ticket: &LoadTicket) -> bool {
        self.generation == ticket.generation && self.selected.as_ref() == Some(&ticket.id)
    }

    /// Applies a load result. Caller must have checked `is_live`.
    pub(crate) fn finish_load(&mut self, document: MemoDocument) {
        self.content = SessionContent::Loaded(document);
    }

    /// Marks `id` ready with known content, skipping the loading step.
    pub(crate) fn set_ready(&mut self, id: MemoId, document: MemoDocument) {
        self.generation += 1;
        self.selected = Some(id);
        self.content = SessionContent::Loaded(document);
    }

    /// Replaces the cached document of the ready memo after a save.
    pub(crate) fn replace_document(&mut self, document: MemoDocument) {
        if self.phase() == SessionPhase::Ready {
            self.content = SessionContent::Loaded(document);
        }
    }

    /// Back to "no memo selected, default content".
    pub(crate) fn reset(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.content = SessionContent::Loaded(MemoDocument::default_content());
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionPhase, SessionState};
    use crate::model::document::MemoDocument;
    use crate::model::memo::MemoId;

    #[test]
    fn new_session_has_no_memo_and_open_picker() {
        let session = SessionState::new();
        assert_eq!(session.phase(), SessionPhase::NoMemo);
        assert!(session.is_picker_open());
        assert_eq!(session.document(), Some(&MemoDocument::default_content()));
    }

    #[test]
    fn newer_selection_invalidates_older_ticket() {
        let mut session = SessionState::new();
        let first = session.begin_load(MemoId::from_title("a").unwrap());
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert!(session.current().is_none());

        let second = session.begin_load(MemoId::from_title("b").unwrap());
        assert!(!session.is_live(&first));
        assert!(session.is_live(&second));
    }

    #[test]
    fn reselecting_same_id_after_reset_yields_new_generation() {
        let mut session = SessionState::new();
        let id = MemoId::from_title("a").unwrap();
        let first = session.begin_load(id.clone());
        session.reset();
        let second = session.begin_load(id);
        assert!(!session.is_live(&first));
        assert!(session.is_live(&second));
    }
}
