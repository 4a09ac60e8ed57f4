use memo_core::{
    paragraph_block, BlockEditorFactory, KeyValueStore, LoadOutcome, MemoDocument, MemoError,
    MemoId, MemoService, MemoStorage, MemoValidationError, MemoryKeyValueStore, SelectOutcome,
    SessionPhase, SqliteKeyValueStore, StoreError, StoreResult,
};
use std::cell::Cell;
use std::rc::Rc;

type Service<S> = MemoService<S, BlockEditorFactory>;

fn memory_service() -> Service<MemoryKeyValueStore> {
    MemoService::open(MemoryKeyValueStore::new(), BlockEditorFactory).unwrap()
}

fn id(title: &str) -> MemoId {
    MemoId::from_title(title).unwrap()
}

fn seeded_store(entries: &[(&str, MemoDocument)]) -> MemoryKeyValueStore {
    let mut storage = MemoStorage::new(MemoryKeyValueStore::new());
    for (title, document) in entries {
        storage.save(&id(title), document).unwrap();
    }
    storage.into_store()
}

/// Memory store whose writes can be switched to fail mid-test.
struct FlakyStore {
    inner: MemoryKeyValueStore,
    refuse_writes: Rc<Cell<bool>>,
}

impl FlakyStore {
    fn new() -> (Self, Rc<Cell<bool>>) {
        let switch = Rc::new(Cell::new(false));
        let store = Self {
            inner: MemoryKeyValueStore::new(),
            refuse_writes: Rc::clone(&switch),
        };
        (store, switch)
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.refuse_writes.get() {
            return Err(StoreError::Sqlite(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_READONLY),
                None,
            )));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.check_writable()?;
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.check_writable()?;
        self.inner.remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        self.inner.keys()
    }
}

#[test]
fn create_then_select_yields_default_document() {
    let mut service = memory_service();
    for title in ["alpha", "beta gamma", "メモ"] {
        let created = service.create_memo(title).unwrap();
        service.create_memo(&format!("{title}-other")).unwrap();

        assert!(service.select_and_load(&created).unwrap());
        assert_eq!(service.session().current(), Some(&created));
        assert_eq!(
            service.session().document(),
            Some(&MemoDocument::default_content())
        );
    }
}

#[test]
fn blank_titles_fail_validation_and_leave_registry_unchanged() {
    let mut service = memory_service();
    service.create_memo("existing").unwrap();

    for title in ["", "   ", "\t\n"] {
        let err = service.create_memo(title).unwrap_err();
        assert!(matches!(
            err,
            MemoError::Validation(MemoValidationError::EmptyTitle)
        ));
    }
    assert_eq!(service.memo_ids(), &[id("existing")]);
}

#[test]
fn titles_differing_in_surrounding_whitespace_are_distinct_memos() {
    let mut service = memory_service();
    let plain = service.create_memo("a").unwrap();
    let padded = service.create_memo(" a").unwrap();

    assert_ne!(plain, padded);
    assert_eq!(padded.as_key(), "memo- a");
    assert_eq!(service.memo_ids(), &[plain, padded.clone()]);
    assert!(service.storage().load(&padded).unwrap().is_some());
}

#[test]
fn duplicate_title_fails_and_keeps_existing_content() {
    let mut service = memory_service();
    let created = service.create_memo("notes").unwrap();
    service
        .apply_edit(|editor| editor.append_block(paragraph_block("keep me")))
        .unwrap()
        .unwrap();

    let err = service.create_memo("notes").unwrap_err();
    assert!(matches!(err, MemoError::Duplicate(ref dup) if *dup == created));

    let stored = service.storage().load(&created).unwrap().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(service.memo_ids().len(), 1);
}

#[test]
fn select_edit_save_delete_scenario() {
    let store = seeded_store(&[(
        "A",
        MemoDocument::from_blocks(vec![paragraph_block("hi")]),
    )]);
    let mut service: Service<_> = MemoService::open(store, BlockEditorFactory).unwrap();
    let memo_a = id("A");
    assert_eq!(service.memo_ids(), &[memo_a.clone()]);

    assert!(service.select_and_load(&memo_a).unwrap());
    assert_eq!(
        service.session().document(),
        Some(&MemoDocument::from_blocks(vec![paragraph_block("hi")]))
    );

    service
        .apply_edit(|editor| editor.append_block(paragraph_block("second")))
        .unwrap()
        .unwrap();
    assert_eq!(service.storage().load(&memo_a).unwrap().unwrap().len(), 2);
    assert_eq!(service.session().document().unwrap().len(), 2);

    service.delete_memo(&memo_a).unwrap();
    assert!(service.memo_ids().is_empty());
    assert_eq!(service.storage().load(&memo_a).unwrap(), None);
    assert_eq!(service.session().phase(), SessionPhase::NoMemo);
    assert_eq!(
        service.session().document(),
        Some(&MemoDocument::default_content())
    );
    assert!(!service.editor().is_mounted());
}

#[test]
fn stale_load_never_overwrites_newer_selection() {
    let store = seeded_store(&[
        ("A", MemoDocument::from_blocks(vec![paragraph_block("from A")])),
        ("B", MemoDocument::from_blocks(vec![paragraph_block("from B")])),
    ]);
    let mut service: Service<_> = MemoService::open(store, BlockEditorFactory).unwrap();
    let memo_a = id("A");
    let memo_b = id("B");

    let SelectOutcome::Loading(ticket_a) = service.select_memo(&memo_a) else {
        panic!("expected load for memo-A");
    };
    let SelectOutcome::Loading(ticket_b) = service.select_memo(&memo_b) else {
        panic!("expected load for memo-B");
    };
    assert_eq!(service.session().phase(), SessionPhase::Loading);

    assert_eq!(service.complete_load(ticket_b).unwrap(), LoadOutcome::Applied);
    assert_eq!(service.complete_load(ticket_a).unwrap(), LoadOutcome::Stale);

    assert_eq!(service.session().current(), Some(&memo_b));
    assert_eq!(
        service.session().document(),
        Some(&MemoDocument::from_blocks(vec![paragraph_block("from B")]))
    );
    assert_eq!(service.editor().instances_created(), 1);
}

#[test]
fn stale_load_resolved_first_is_still_rejected() {
    let store = seeded_store(&[
        ("A", MemoDocument::from_blocks(vec![paragraph_block("a")])),
        ("B", MemoDocument::from_blocks(vec![paragraph_block("b")])),
    ]);
    let mut service: Service<_> = MemoService::open(store, BlockEditorFactory).unwrap();

    let SelectOutcome::Loading(ticket_a) = service.select_memo(&id("A")) else {
        panic!("expected load for A");
    };
    let SelectOutcome::Loading(ticket_b) = service.select_memo(&id("B")) else {
        panic!("expected load for B");
    };

    assert_eq!(service.complete_load(ticket_a).unwrap(), LoadOutcome::Stale);
    assert!(service.session().is_loading());
    assert_eq!(service.complete_load(ticket_b).unwrap(), LoadOutcome::Applied);
    assert_eq!(service.session().current(), Some(&id("B")));
}

#[test]
fn reselecting_current_memo_does_not_reload() {
    let mut service = memory_service();
    let created = service.create_memo("once").unwrap();
    let mounted = service.editor().instances_created();

    service.open_picker();
    assert_eq!(service.select_memo(&created), SelectOutcome::AlreadySelected);
    assert!(!service.session().is_picker_open());
    assert_eq!(service.editor().instances_created(), mounted);
}

#[test]
fn empty_stored_document_loads_as_default_content() {
    let mut store = MemoryKeyValueStore::new();
    store.set("memo-empty", "[]").unwrap();
    let mut service: Service<_> = MemoService::open(store, BlockEditorFactory).unwrap();

    assert!(service.select_and_load(&id("empty")).unwrap());
    assert_eq!(
        service.session().document(),
        Some(&MemoDocument::default_content())
    );
}

#[test]
fn deleting_other_memo_leaves_session_untouched() {
    let mut service = memory_service();
    let other = service.create_memo("other").unwrap();
    let current = service.create_memo("current").unwrap();

    service.delete_memo(&other).unwrap();
    assert_eq!(service.session().current(), Some(&current));
    assert!(service.editor().is_mounted());
    assert_eq!(service.memo_ids(), &[current]);
}

#[test]
fn every_edit_produces_one_write() {
    let mut service = memory_service();
    let created = service.create_memo("typing").unwrap();
    for idx in 0..3 {
        service
            .apply_edit(|editor| editor.append_block(paragraph_block(&format!("line {idx}"))))
            .unwrap()
            .unwrap();
        assert_eq!(
            service.storage().load(&created).unwrap().unwrap().len(),
            idx + 2
        );
    }
}

#[test]
fn edit_while_loading_is_ignored() {
    let store = seeded_store(&[("slow", MemoDocument::default_content())]);
    let mut service: Service<_> = MemoService::open(store, BlockEditorFactory).unwrap();
    let SelectOutcome::Loading(_ticket) = service.select_memo(&id("slow")) else {
        panic!("expected load");
    };

    let applied = service
        .apply_edit(|editor| editor.append_block(paragraph_block("lost")))
        .unwrap();
    assert!(applied.is_none());
    assert!(!service.save().unwrap());
}

#[test]
fn registry_survives_restart_and_reconcile_picks_up_external_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memo.sqlite3");

    {
        let store = SqliteKeyValueStore::open(&path).unwrap();
        let mut service: Service<_> = MemoService::open(store, BlockEditorFactory).unwrap();
        service.create_memo("persisted").unwrap();
        service
            .apply_edit(|editor| editor.append_block(paragraph_block("body")))
            .unwrap();
    }

    let store = SqliteKeyValueStore::open(&path).unwrap();
    let mut service: Service<_> = MemoService::open(store, BlockEditorFactory).unwrap();
    assert_eq!(service.memo_ids(), &[id("persisted")]);
    assert_eq!(service.session().phase(), SessionPhase::NoMemo);
    assert!(service.session().is_picker_open());

    {
        let mut external = SqliteKeyValueStore::open(&path).unwrap();
        external.set("memo-external", "[]").unwrap();
    }
    assert!(!service.registry().contains(&id("external")));
    assert_eq!(service.reconcile().unwrap(), 2);
    assert!(service.registry().contains(&id("external")));
}

#[test]
fn failed_load_resets_session_and_reopens_picker() {
    let mut store = MemoryKeyValueStore::new();
    store
        .set("memo-secret diary", r#"{"type":"paragraph"}"#)
        .unwrap();
    let mut service: Service<_> = MemoService::open(store, BlockEditorFactory).unwrap();
    service.create_memo("other").unwrap();
    assert!(service.editor().is_mounted());

    let SelectOutcome::Loading(ticket) = service.select_memo(&id("secret diary")) else {
        panic!("expected load");
    };
    let err = service.complete_load(ticket).unwrap_err();

    assert!(matches!(err, MemoError::Storage(StoreError::InvalidData(_))));
    assert!(!err.to_string().contains("secret diary"));
    assert_eq!(service.session().phase(), SessionPhase::NoMemo);
    assert_eq!(service.session().selected(), None);
    assert!(service.session().is_picker_open());
    assert!(!service.editor().is_mounted());
    assert!(service.registry().contains(&id("secret diary")));
}

#[test]
fn failed_create_leaves_registry_and_session_unchanged() {
    let (store, refuse_writes) = FlakyStore::new();
    let mut service: Service<_> = MemoService::open(store, BlockEditorFactory).unwrap();
    let kept = service.create_memo("kept").unwrap();
    let mounted = service.editor().instances_created();

    refuse_writes.set(true);
    let err = service.create_memo("new").unwrap_err();

    assert!(matches!(err, MemoError::Storage(StoreError::Sqlite(_))));
    assert_eq!(service.memo_ids(), &[kept.clone()]);
    assert_eq!(service.session().current(), Some(&kept));
    assert!(!service.session().is_picker_open());
    assert_eq!(service.editor().instances_created(), mounted);
    assert_eq!(service.storage().load(&id("new")).unwrap(), None);
}

#[test]
fn failed_delete_keeps_memo_registered_and_selected() {
    let (store, refuse_writes) = FlakyStore::new();
    let mut service: Service<_> = MemoService::open(store, BlockEditorFactory).unwrap();
    let kept = service.create_memo("kept").unwrap();

    refuse_writes.set(true);
    let err = service.delete_memo(&kept).unwrap_err();

    assert!(matches!(err, MemoError::Storage(_)));
    assert!(service.registry().contains(&kept));
    assert_eq!(service.session().current(), Some(&kept));
    assert!(service.editor().is_mounted());
    assert!(service.storage().load(&kept).unwrap().is_some());
}
