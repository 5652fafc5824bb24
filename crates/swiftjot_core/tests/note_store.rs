use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use swiftjot_core::{
    JsonNoteRepository, Note, NoteRepository, NoteStore, StoreError, StoreResult,
    FIRST_NOTE_TITLE,
};

const TEST_DELAY: Duration = Duration::from_millis(80);
const SETTLE: Duration = Duration::from_millis(350);

/// In-memory repository that records every save.
struct MemoryRepository {
    initial: StoreResult<Vec<Note>>,
    saves: Mutex<Vec<Vec<Note>>>,
}

impl MemoryRepository {
    fn with_notes(notes: Vec<Note>) -> Arc<Self> {
        Arc::new(Self {
            initial: Ok(notes),
            saves: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            initial: Err(StoreError::Io(std::io::Error::other("unreadable"))),
            saves: Mutex::new(Vec::new()),
        })
    }

    fn saves(&self) -> Vec<Vec<Note>> {
        self.saves.lock().unwrap().clone()
    }
}

impl NoteRepository for MemoryRepository {
    fn load_notes(&self) -> StoreResult<Vec<Note>> {
        match &self.initial {
            Ok(notes) => Ok(notes.clone()),
            Err(_) => Err(StoreError::Io(std::io::Error::other("unreadable"))),
        }
    }

    fn save_notes(&self, notes: &[Note]) -> StoreResult<()> {
        self.saves.lock().unwrap().push(notes.to_vec());
        Ok(())
    }
}

fn two_notes() -> Vec<Note> {
    vec![Note::with_id("a", "T1", "C1"), Note::with_id("b", "T2", "C2")]
}

#[test]
fn empty_store_yields_single_default_note() {
    let repo = MemoryRepository::with_notes(Vec::new());
    let store = NoteStore::load_with_delay(repo.clone(), TEST_DELAY);

    assert_eq!(store.len(), 1);
    assert_eq!(store.selected().title, FIRST_NOTE_TITLE);
    assert_eq!(store.selected().title, "My First Jot");
    assert!(repo.saves().is_empty());
}

#[test]
fn missing_or_corrupt_file_yields_default_note() {
    let dir = tempfile::tempdir().unwrap();
    let missing_repo = JsonNoteRepository::new(dir.path().join("notes.json"));
    let missing = NoteStore::load(Arc::new(missing_repo));
    assert_eq!(missing.notes().len(), 1);
    assert_eq!(missing.selected().title, "My First Jot");

    let corrupt_path = dir.path().join("corrupt.json");
    std::fs::write(&corrupt_path, "{{{").unwrap();
    let corrupt = NoteStore::load(Arc::new(JsonNoteRepository::new(corrupt_path)));
    assert_eq!(corrupt.selected().title, "My First Jot");

    let unreadable = NoteStore::load(MemoryRepository::failing());
    assert_eq!(unreadable.len(), 1);
}

#[test]
fn stored_records_load_in_order_with_first_selected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    std::fs::write(
        &path,
        r#"[{"id":"a","title":"T1","content":"C1"},{"id":"b","title":"T2","content":"C2"}]"#,
    )
    .unwrap();

    let store = NoteStore::load(Arc::new(JsonNoteRepository::new(path)));

    let ids: Vec<&str> = store.notes().iter().map(|note| note.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(store.notes()[1].title, "T2");
    assert_eq!(store.notes()[1].content, "C2");
    assert_eq!(store.selected_index(), 0);
    assert_eq!(store.selected().id, "a");
}

#[test]
fn pascal_case_notes_file_keeps_user_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    std::fs::write(
        &path,
        r#"[{"Id":"a","Title":"Plans","Content":"ship it","HasManualTitle":true}]"#,
    )
    .unwrap();
    let repo = Arc::new(JsonNoteRepository::new(&path));

    let mut store = NoteStore::load_with_delay(repo.clone(), TEST_DELAY);
    assert_eq!(store.selected().id, "a");
    assert_eq!(store.selected().title, "Plans");
    assert_eq!(store.selected().content, "ship it");

    store.set_selected_content("ship it today");
    store.flush();

    let reloaded = repo.load_notes().unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].id, "a");
    assert_eq!(reloaded[0].title, "Plans");
    assert_eq!(reloaded[0].content, "ship it today");
}

#[test]
fn burst_of_edits_saves_once_with_final_content() {
    let repo = MemoryRepository::with_notes(two_notes());
    let mut store = NoteStore::load_with_delay(repo.clone(), TEST_DELAY);

    for text in ["h", "he", "hel", "hell", "hello"] {
        store.set_selected_content(text);
    }
    assert!(store.has_pending_save());
    thread::sleep(SETTLE);

    let saves = repo.saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0][0].content, "hello");
    assert_eq!(saves[0][0].title, "hello");
    assert_eq!(saves[0][1], Note::with_id("b", "T2", "C2"));
}

#[test]
fn flush_writes_pending_snapshot_once() {
    let repo = MemoryRepository::with_notes(two_notes());
    let mut store = NoteStore::load_with_delay(repo.clone(), TEST_DELAY);

    store.set_selected_content("saved text");
    assert!(store.flush());
    assert!(!store.has_pending_save());
    assert_eq!(repo.saves().len(), 1);
    assert_eq!(repo.saves()[0][0].content, "saved text");
    assert!(!store.flush());
}

#[test]
fn manual_title_survives_content_edits() {
    let repo = MemoryRepository::with_notes(two_notes());
    let mut store = NoteStore::load_with_delay(repo.clone(), TEST_DELAY);

    store.set_selected_title("Pinned");
    store.set_selected_content("first line\nsecond line");

    assert_eq!(store.selected().title, "Pinned");
    assert!(store.selected().has_manual_title);

    store.select("b");
    store.set_selected_content("  derived   title \nbody");
    assert_eq!(store.selected().title, "derived title");
}

#[test]
fn add_note_appends_numbered_jot_and_selects_it() {
    let repo = MemoryRepository::with_notes(two_notes());
    let mut store = NoteStore::load_with_delay(repo.clone(), TEST_DELAY);

    let added = store.add_note().clone();

    assert_eq!(added.title, "Jot 3");
    assert_eq!(store.len(), 3);
    assert_eq!(store.selected_index(), 2);
    assert_eq!(store.selected().id, added.id);

    thread::sleep(SETTLE);
    assert_eq!(repo.saves().last().unwrap().len(), 3);
}

#[test]
fn delete_selects_previous_and_keeps_last_note() {
    let repo = MemoryRepository::with_notes(two_notes());
    let mut store = NoteStore::load_with_delay(repo.clone(), TEST_DELAY);

    assert!(store.select("b"));
    assert!(store.delete_selected());
    assert_eq!(store.selected().id, "a");
    assert_eq!(store.len(), 1);

    assert!(!store.delete_selected());
    assert!(!store.delete_note("a"));
    assert_eq!(store.len(), 1);

    thread::sleep(SETTLE);
    let saves = repo.saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0], vec![Note::with_id("a", "T1", "C1")]);
}

#[test]
fn deleting_an_earlier_note_keeps_selection_on_same_note() {
    let mut notes = two_notes();
    notes.push(Note::with_id("c", "T3", "C3"));
    let repo = MemoryRepository::with_notes(notes);
    let mut store = NoteStore::load_with_delay(repo, TEST_DELAY);

    assert!(store.select("c"));
    assert!(store.delete_note("a"));
    assert_eq!(store.selected().id, "c");
    assert!(!store.delete_note("missing"));
    assert!(!store.select("missing"));
    assert!(!store.select_index(9));
}

#[test]
fn export_writes_selected_content_verbatim() {
    let repo = MemoryRepository::with_notes(two_notes());
    let mut store = NoteStore::load_with_delay(repo, TEST_DELAY);
    store.set_selected_content("line1\nline2");

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("export.md");
    store.export_selected(&target).unwrap();

    assert_eq!(std::fs::read(&target).unwrap(), b"line1\nline2");
}

#[test]
fn saves_reach_the_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    let repo = Arc::new(JsonNoteRepository::new(&path));
    let mut store = NoteStore::load_with_delay(repo.clone(), TEST_DELAY);

    store.set_selected_content("persisted");
    thread::sleep(SETTLE);

    let reloaded = repo.load_notes().unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].content, "persisted");
    assert_eq!(reloaded[0].id, store.selected().id);
}
