use std::fs;
use std::io::Write;

use piece_buffer::Editor;

fn read(path: &std::path::Path) -> Vec<u8> {
    fs::read(path).unwrap()
}

#[test]
fn load_then_save_round_trips_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("source.txt");
    fs::write(&src, b"the quick brown fox jumps over the lazy dog").unwrap();

    let mut ed = Editor::open(&src).unwrap();
    let dst = dir.path().join("copy.txt");
    ed.save(&dst).unwrap();

    assert_eq!(read(&dst), read(&src));
    assert!(!ed.modified());
}

#[test]
fn edit_then_save_then_reload() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("a.txt");
    fs::write(&src, b"hello world").unwrap();

    let mut ed = Editor::open(&src).unwrap();
    ed.delete(5, 6).unwrap();
    ed.insert(5, b" there").unwrap();
    ed.save(&src).unwrap();
    assert!(!ed.modified());

    let reloaded = Editor::open(&src).unwrap();
    assert_eq!(reloaded.to_vec(), b"hello there");
}

#[test]
fn save_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");

    let mut ed = Editor::empty();
    ed.insert(0, b"abcdef").unwrap();
    ed.save(&path).unwrap();
    let first = read(&path);

    ed.save(&path).unwrap();
    let second = read(&path);

    assert_eq!(first, second);
    assert!(!ed.modified());
}

#[test]
fn save_on_empty_document_truncates_to_zero_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    // Pre-seed the destination so truncation is actually exercised.
    fs::File::create(&path)
        .unwrap()
        .write_all(b"stale")
        .unwrap();

    let mut ed = Editor::empty();
    ed.save(&path).unwrap();

    assert_eq!(read(&path), Vec::<u8>::new());
}

#[test]
fn open_rejects_directories() {
    let dir = tempfile::tempdir().unwrap();
    let err = Editor::open(dir.path()).unwrap_err();
    assert!(matches!(err, piece_buffer::EditorError::NotRegularFile(_)));
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    let err = Editor::open(&missing).unwrap_err();
    assert!(matches!(err, piece_buffer::EditorError::Io(_)));
}
