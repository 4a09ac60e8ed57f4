//! Memo lifecycle service.
//!
//! # Responsibility
//! - Orchestrate create/select/save/delete across storage, registry, session
//!   state and the editor binding.
//! - Reject stale document loads that were superseded by a newer selection.
//!
//! # Invariants
//! - A registered memo always has a persisted document.
//! - Only the selected memo's load result may reach the session.
//! - Every edit notification produces exactly one storage write.
//! - Failed storage calls leave registry and session unchanged.

use crate::editor::{EditorBinding, EditorFactory};
use crate::model::document::MemoDocument;
use crate::model::memo::{MemoId, MemoValidationError};
use crate::model::session::{LoadTicket, SessionState};
use crate::repo::kv_store::{KeyValueStore, StoreError};
use crate::repo::memo_store::MemoStorage;
use crate::service::registry::MemoRegistry;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type MemoResult<T> = Result<T, MemoError>;

/// Service error for memo lifecycle use-cases.
#[derive(Debug)]
pub enum MemoError {
    /// Title is blank.
    Validation(MemoValidationError),
    /// A memo with the derived identifier already exists.
    Duplicate(MemoId),
    /// Persistence-layer failure.
    Storage(StoreError),
}

impl Display for MemoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate(id) => write!(f, "a memo titled `{}` already exists", id.title()),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MemoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Duplicate(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<MemoValidationError> for MemoError {
    fn from(value: MemoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for MemoError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

/// Result of a selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Identifier is not registered; nothing changed.
    Unknown,
    /// Identifier is already selected; no reload was started.
    AlreadySelected,
    /// Load started; resolve it with `complete_load`.
    Loading(LoadTicket),
}

/// Result of resolving a load ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Document was loaded and a fresh editor surface mounted.
    Applied,
    /// A newer selection superseded this load; result discarded.
    Stale,
}

/// Lifecycle controller over one store and one editor binding.
pub struct MemoService<S: KeyValueStore, F: EditorFactory> {
    storage: MemoStorage<S>,
    registry: MemoRegistry,
    session: SessionState,
    editor: EditorBinding<F>,
}

impl<S: KeyValueStore, F: EditorFactory> MemoService<S, F> {
    /// Creates a service and reconciles the registry with stored memos.
    pub fn open(store: S, factory: F) -> MemoResult<Self> {
        let storage = MemoStorage::new(store);
        let registry = MemoRegistry::from_storage(&storage)?;
        info!(
            "event=memo_service_open module=service status=ok memos={}",
            registry.len()
        );
        Ok(Self {
            storage,
            registry,
            session: SessionState::new(),
            editor: EditorBinding::new(factory),
        })
    }

    pub fn memo_ids(&self) -> &[MemoId] {
        self.registry.list()
    }

    pub fn registry(&self) -> &MemoRegistry {
        &self.registry
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn storage(&self) -> &MemoStorage<S> {
        &self.storage
    }

    pub fn editor(&self) -> &EditorBinding<F> {
        &self.editor
    }

    /// Creates a memo from `title` and makes it current with default content.
    ///
    /// # Errors
    /// - `Validation` when the title is blank.
    /// - `Duplicate` when the derived id is registered; its content is kept.
    /// - `Storage` when the default document cannot be persisted.
    pub fn create_memo(&mut self, title: &str) -> MemoResult<MemoId> {
        let id = match MemoId::from_title(title) {
            Ok(id) => id,
            Err(err) => {
                warn!("event=memo_create module=service status=rejected reason=empty_title");
                return Err(err.into());
            }
        };
        if self.registry.contains(&id) {
            warn!(
                "event=memo_create module=service status=rejected reason=duplicate title_len={}",
                id.title().chars().count()
            );
            return Err(MemoError::Duplicate(id));
        }

        let document = MemoDocument::default_content();
        self.storage.save(&id, &document)?;
        self.registry.add(id.clone());
        self.editor.mount(&document);
        self.session.set_ready(id.clone(), document);
        self.session.set_picker_open(false);

        info!(
            "event=memo_create module=service status=ok title_len={} memos={}",
            id.title().chars().count(),
            self.registry.len()
        );
        Ok(id)
    }

    /// Starts selecting `id`.
    ///
    /// Unknown ids are ignored. Selecting the already selected id closes the
    /// picker without reloading.
    pub fn select_memo(&mut self, id: &MemoId) -> SelectOutcome {
        if !self.registry.contains(id) {
            debug!("event=memo_select module=service status=ignored reason=unknown_id");
            return SelectOutcome::Unknown;
        }
        self.session.set_picker_open(false);
        if self.session.selected() == Some(id) {
            return SelectOutcome::AlreadySelected;
        }

        self.editor.unmount();
        let ticket = self.session.begin_load(id.clone());
        debug!(
            "event=memo_select module=service status=loading generation={}",
            ticket.generation()
        );
        SelectOutcome::Loading(ticket)
    }

    /// Resolves a load started by `select_memo`.
    ///
    /// A missing or empty stored document becomes default content. On a
    /// storage failure the session falls back to "no memo selected" and the
    /// picker reopens.
    pub fn complete_load(&mut self, ticket: LoadTicket) -> MemoResult<LoadOutcome> {
        if !self.session.is_live(&ticket) {
            debug!(
                "event=memo_load module=service status=stale generation={}",
                ticket.generation()
            );
            return Ok(LoadOutcome::Stale);
        }

        let document = match self.storage.load(ticket.id()) {
            Ok(found) => found.unwrap_or_default().or_default_if_empty(),
            Err(err) => {
                error!(
                    "event=memo_load module=service status=error title_len={} error={err}",
                    ticket.id().title().chars().count()
                );
                self.session.reset();
                self.session.set_picker_open(true);
                return Err(err.into());
            }
        };

        self.editor.mount(&document);
        info!(
            "event=memo_load module=service status=ok blocks={}",
            document.len()
        );
        self.session.finish_load(document);
        Ok(LoadOutcome::Applied)
    }

    /// Selects `id` and resolves its load immediately.
    ///
    /// Returns whether a load was applied.
    pub fn select_and_load(&mut self, id: &MemoId) -> MemoResult<bool> {
        match self.select_memo(id) {
            SelectOutcome::Loading(ticket) => {
                Ok(self.complete_load(ticket)? == LoadOutcome::Applied)
            }
            SelectOutcome::Unknown | SelectOutcome::AlreadySelected => Ok(false),
        }
    }

    /// Persists the editor snapshot of the current memo.
    ///
    /// Returns `false` without writing when no memo is ready.
    pub fn save(&mut self) -> MemoResult<bool> {
        let Some(id) = self.session.current().cloned() else {
            return Ok(false);
        };
        let Some(snapshot) = self.editor.snapshot() else {
            return Ok(false);
        };

        self.storage.save(&id, &snapshot)?;
        self.session.replace_document(snapshot);
        Ok(true)
    }

    /// Applies one user edit to the live surface and saves it.
    ///
    /// Returns `None` when no surface is mounted.
    pub fn apply_edit<R>(&mut self, edit: impl FnOnce(&mut F::Surface) -> R) -> MemoResult<Option<R>> {
        if self.session.current().is_none() {
            return Ok(None);
        }
        let Some(surface) = self.editor.surface_mut() else {
            return Ok(None);
        };

        let result = edit(surface);
        self.save()?;
        Ok(Some(result))
    }

    /// Deletes `id` from storage and registry.
    ///
    /// Resets the session when `id` is selected, including mid-load.
    pub fn delete_memo(&mut self, id: &MemoId) -> MemoResult<()> {
        self.storage.delete(id)?;
        let removed = self.registry.remove(id);

        let was_selected = self.session.selected() == Some(id);
        if was_selected {
            self.editor.unmount();
            self.session.reset();
        }

        info!(
            "event=memo_delete module=service status=ok registered={} was_selected={} memos={}",
            removed,
            was_selected,
            self.registry.len()
        );
        Ok(())
    }

    /// Resyncs the registry with storage. Returns the memo count.
    pub fn reconcile(&mut self) -> MemoResult<usize> {
        Ok(self.registry.reconcile(&self.storage)?)
    }

    pub fn open_picker(&mut self) {
        self.session.set_picker_open(true);
    }

    pub fn close_picker(&mut self) {
        self.session.set_picker_open(false);
    }
}
