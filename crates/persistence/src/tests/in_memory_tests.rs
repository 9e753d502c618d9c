// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{create_test_form, create_test_key};
use crate::{DraftKey, DraftRecord, DraftStore, InMemoryDraftStore};
use upscalex_domain::FormState;

#[test]
fn test_save_then_load_returns_snapshot() {
    let mut store: InMemoryDraftStore = InMemoryDraftStore::new();
    let key: DraftKey = create_test_key("s-1");
    let form: FormState = create_test_form();

    store.save(&key, &form, 2).unwrap();
    let loaded: DraftRecord = store.load(&key).unwrap().unwrap();

    assert_eq!(loaded.form, form.without_file_handles());
    assert_eq!(loaded.current_ordinal, 2);
    assert_eq!(loaded.revision, 1);
    assert!(loaded.form.files("attachments")[0].handle.is_none());
}

#[test]
fn test_load_missing_key_returns_none() {
    let mut store: InMemoryDraftStore = InMemoryDraftStore::new();

    let loaded: Option<DraftRecord> = store.load(&create_test_key("absent")).unwrap();

    assert!(loaded.is_none());
}

#[test]
fn test_last_save_wins_and_bumps_revision() {
    let mut store: InMemoryDraftStore = InMemoryDraftStore::new();
    let key: DraftKey = create_test_key("s-1");

    store.save(&key, &FormState::new(), 1).unwrap();
    let second: DraftRecord = store.save(&key, &create_test_form(), 3).unwrap();
    let loaded: DraftRecord = store.load(&key).unwrap().unwrap();

    assert_eq!(second.revision, 2);
    assert_eq!(loaded, second);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_clear_removes_only_its_key() {
    let mut store: InMemoryDraftStore = InMemoryDraftStore::new();
    let first: DraftKey = create_test_key("s-1");
    let second: DraftKey = create_test_key("s-2");
    store.save(&first, &create_test_form(), 1).unwrap();
    store.save(&second, &create_test_form(), 1).unwrap();

    store.clear(&first).unwrap();
    store.clear(&first).unwrap();

    assert!(store.load(&first).unwrap().is_none());
    assert!(store.load(&second).unwrap().is_some());
}
