//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memo_core` linkage.
//! - Run one in-memory memo round and print deterministic results.

use memo_core::{
    paragraph_block, BlockEditorFactory, MemoResult, MemoService, SqliteKeyValueStore,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("memo_core ping={}", memo_core::ping());
    println!("memo_core version={}", memo_core::core_version());

    match smoke_round() {
        Ok(blocks) => {
            println!("memo_core smoke=ok blocks={blocks}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("memo_core smoke=error error={err}");
            ExitCode::FAILURE
        }
    }
}

/// Create, edit and reload one memo against an in-memory SQLite store.
///
/// Returns the block count of the freshly mounted editor.
fn smoke_round() -> MemoResult<usize> {
    let store = SqliteKeyValueStore::open_in_memory()?;
    let mut service = MemoService::open(store, BlockEditorFactory)?;

    let id = service.create_memo("smoke")?;
    service.apply_edit(|editor| editor.append_block(paragraph_block("hello")))?;
    service.create_memo("scratch")?;
    service.select_and_load(&id)?;

    Ok(service
        .editor()
        .surface()
        .map_or(0, |editor| editor.blocks().len()))
}
