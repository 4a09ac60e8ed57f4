//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the memo lifecycle to the UI host through FRB sync calls.
//! - Own the single process-wide memo session the UI drives.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are returned as `ok = false` envelopes with a message; the UI
//!   decides how to present them.
//! - Calls are serialized through one lock; loads are resolved inside the
//!   same call that selects, so no stale result can surface.

use log::warn;
use memo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BlockEditorFactory, MemoDocument, MemoError, MemoId, MemoService, SessionPhase,
    SqliteKeyValueStore,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

const MEMO_DB_FILE_NAME: &str = "memo_store.sqlite3";
const MEMO_DB_PATH_ENV: &str = "MEMO_DB_PATH";

type HostMemoService = MemoService<SqliteKeyValueStore, BlockEditorFactory>;

struct HostState {
    db_path: Option<PathBuf>,
    service: Option<HostMemoService>,
}

static HOST_STATE: Mutex<HostState> = Mutex::new(HostState {
    db_path: None,
    service: None,
});

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message otherwise.
/// Safe to repeat with the same `level + log_dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Points the memo session at a database file.
///
/// Closes any session opened on a different path; the next memo call reopens
/// and reconciles the registry. Returns an empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_configure(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }

    let path = PathBuf::from(trimmed);
    let mut state = lock_state();
    if state.db_path.as_ref() != Some(&path) {
        state.service = None;
        state.db_path = Some(path);
    }
    String::new()
}

/// One row of the memo picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoListItem {
    /// Namespaced identifier (`memo-<title>`).
    pub memo_id: String,
    /// Display title without namespace prefix.
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoListResponse {
    pub ok: bool,
    pub items: Vec<MemoListItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected memo ID, when there is one.
    pub memo_id: Option<String>,
    /// Machine-readable failure kind (`validation|duplicate|storage|...`).
    pub error_kind: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl MemoActionResponse {
    fn success(message: impl Into<String>, memo_id: Option<String>) -> Self {
        Self {
            ok: true,
            memo_id,
            error_kind: None,
            message: message.into(),
        }
    }

    fn failure(kind: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            memo_id: None,
            error_kind: Some(kind.to_string()),
            message: message.into(),
        }
    }
}

/// Active session snapshot for the editor view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoSessionResponse {
    pub ok: bool,
    /// `no_memo|loading|ready`.
    pub phase: String,
    pub memo_id: Option<String>,
    /// JSON block array of the loaded document; `None` while loading.
    pub document_json: Option<String>,
    pub picker_open: bool,
    pub message: String,
}

/// Lists known memos in registry order.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_list() -> MemoListResponse {
    match with_service(|service| {
        Ok(service
            .memo_ids()
            .iter()
            .map(|id| MemoListItem {
                memo_id: id.as_key().to_string(),
                title: id.title().to_string(),
            })
            .collect::<Vec<_>>())
    }) {
        Ok(items) => MemoListResponse {
            ok: true,
            message: format!("{} memo(s).", items.len()),
            items,
        },
        Err(err) => MemoListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("memo_list failed: {err}"),
        },
    }
}

/// Creates a memo and makes it current with default content.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_create(title: String) -> MemoActionResponse {
    match with_service(|service| service.create_memo(title.as_str())) {
        Ok(id) => MemoActionResponse::success("Memo created.", Some(id.as_key().to_string())),
        Err(err) => action_failure("memo_create", &err),
    }
}

/// Selects a memo and loads its document.
///
/// Unknown ids leave the session untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_select(memo_id: String) -> MemoSessionResponse {
    match with_service(|service| {
        let Some(id) = MemoId::from_key(&memo_id) else {
            return Ok(session_rejected(
                service,
                format!("memo_select failed: `{memo_id}` is not a memo id"),
            ));
        };
        Ok(match service.select_and_load(&id) {
            Ok(_) => session_snapshot(service, "Memo selected."),
            Err(err) => session_rejected(service, format!("memo_select failed: {err}")),
        })
    }) {
        Ok(response) => response,
        Err(err) => session_unavailable(format!("memo_select failed: {err}")),
    }
}

/// Deletes a memo and its stored document.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_delete(memo_id: String) -> MemoActionResponse {
    let Some(id) = MemoId::from_key(&memo_id) else {
        return MemoActionResponse::failure(
            "invalid_id",
            format!("memo_delete failed: `{memo_id}` is not a memo id"),
        );
    };
    match with_service(|service| service.delete_memo(&id)) {
        Ok(()) => MemoActionResponse::success("Memo deleted.", Some(id.as_key().to_string())),
        Err(err) => action_failure("memo_delete", &err),
    }
}

/// Returns the active session snapshot.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_current() -> MemoSessionResponse {
    match with_service(|service| Ok(session_snapshot(service, "OK"))) {
        Ok(response) => response,
        Err(err) => session_unavailable(format!("memo_current failed: {err}")),
    }
}

/// Editor change notification: replaces the live document and saves it.
///
/// `document_json` must be a JSON block array as produced by the editor.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_update_document(document_json: String) -> MemoActionResponse {
    let document = match serde_json::from_str::<MemoDocument>(&document_json) {
        Ok(document) => document,
        Err(err) => {
            return MemoActionResponse::failure(
                "invalid_document",
                format!("memo_update_document failed: {err}"),
            );
        }
    };

    match with_service(|service| {
        let applied = service.apply_edit(|editor| editor.replace_document(document))?;
        Ok(applied.map(|()| service.session().current().cloned()))
    }) {
        Ok(Some(current)) => {
            MemoActionResponse::success("Memo saved.", current.map(|id| id.as_key().to_string()))
        }
        Ok(None) => MemoActionResponse::failure(
            "no_memo",
            "memo_update_document failed: no memo is open",
        ),
        Err(err) => action_failure("memo_update_document", &err),
    }
}

/// Shows the memo picker.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_open_picker() -> MemoSessionResponse {
    match with_service(|service| {
        service.open_picker();
        Ok(session_snapshot(service, "Picker opened."))
    }) {
        Ok(response) => response,
        Err(err) => session_unavailable(format!("memo_open_picker failed: {err}")),
    }
}

/// Hides the memo picker.
#[flutter_rust_bridge::frb(sync)]
pub fn memo_close_picker() -> MemoSessionResponse {
    match with_service(|service| {
        service.close_picker();
        Ok(session_snapshot(service, "Picker closed."))
    }) {
        Ok(response) => response,
        Err(err) => session_unavailable(format!("memo_close_picker failed: {err}")),
    }
}

fn lock_state() -> MutexGuard<'static, HostState> {
    HOST_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn resolve_db_path(configured: Option<&PathBuf>) -> PathBuf {
    if let Some(path) = configured {
        return path.clone();
    }
    if let Ok(raw) = std::env::var(MEMO_DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(MEMO_DB_FILE_NAME)
}

fn with_service<T>(
    f: impl FnOnce(&mut HostMemoService) -> Result<T, MemoError>,
) -> Result<T, MemoError> {
    let mut state = lock_state();
    let service = match state.service.take() {
        Some(service) => service,
        None => {
            let path = resolve_db_path(state.db_path.as_ref());
            let store = SqliteKeyValueStore::open(&path)?;
            MemoService::open(store, BlockEditorFactory)?
        }
    };
    f(state.service.insert(service))
}

fn session_snapshot(service: &HostMemoService, message: &str) -> MemoSessionResponse {
    let session = service.session();
    let document_json = session
        .document()
        .and_then(|document| serde_json::to_string(document).ok());
    MemoSessionResponse {
        ok: true,
        phase: phase_label(session.phase()).to_string(),
        memo_id: session.selected().map(|id| id.as_key().to_string()),
        document_json,
        picker_open: session.is_picker_open(),
        message: message.to_string(),
    }
}

/// Failure envelope carrying the session as it stands after the failed call.
fn session_rejected(service: &HostMemoService, message: String) -> MemoSessionResponse {
    MemoSessionResponse {
        ok: false,
        ..session_snapshot(service, &message)
    }
}

/// Failure envelope for calls that never reached an open service; mirrors
/// the state a fresh session starts in.
fn session_unavailable(message: String) -> MemoSessionResponse {
    MemoSessionResponse {
        ok: false,
        phase: phase_label(SessionPhase::NoMemo).to_string(),
        memo_id: None,
        document_json: None,
        picker_open: true,
        message,
    }
}

fn action_failure(operation: &str, err: &MemoError) -> MemoActionResponse {
    let kind = match err {
        MemoError::Validation(_) => "validation",
        MemoError::Duplicate(_) => "duplicate",
        MemoError::Storage(_) => "storage",
    };
    if kind == "storage" {
        warn!("event=ffi_call module=ffi status=error op={operation} error={err}");
    }
    MemoActionResponse::failure(kind, format!("{operation} failed: {err}"))
}

fn phase_label(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::NoMemo => "no_memo",
        SessionPhase::Loading => "loading",
        SessionPhase::Ready => "ready",
    }
}
