use mirror_fs::io;
use mirror_fs::walk::{EntryKind, entry_kind};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_copy_atomic_creates_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.txt");
    fs::write(&source, "hello world").unwrap();
    let target = temp.path().join("deep/nested/target.txt");

    let bytes = io::copy_atomic(&source, &target).unwrap();

    assert_eq!(bytes, 11);
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello world");
}

#[test]
fn test_copy_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.txt");
    let target = temp.path().join("target.txt");
    fs::write(&source, "updated").unwrap();
    fs::write(&target, "original content that is longer").unwrap();

    io::copy_atomic(&source, &target).unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "updated");
}

#[test]
fn test_copy_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.txt");
    fs::write(&source, "content").unwrap();
    let replica = temp.path().join("replica");

    io::copy_atomic(&source, &replica.join("a.txt")).unwrap();

    let names: Vec<String> = fs::read_dir(&replica)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.txt".to_string()]);
}

#[test]
fn test_copy_atomic_missing_source_keeps_target() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("target.txt");
    fs::write(&target, "keep me").unwrap();

    let result = io::copy_atomic(&temp.path().join("missing.txt"), &target);

    assert!(result.unwrap_err().is_not_found());
    assert_eq!(fs::read_to_string(&target).unwrap(), "keep me");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn test_copy_attributes_carries_mtime() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.txt");
    let target = temp.path().join("target.txt");
    fs::write(&source, "a").unwrap();
    fs::write(&target, "a").unwrap();
    let stamp = filetime::FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_mtime(&source, stamp).unwrap();

    io::copy_attributes(&source, &target).unwrap();

    let meta = fs::metadata(&target).unwrap();
    assert_eq!(filetime::FileTime::from_last_modification_time(&meta), stamp);
}

#[test]
fn test_copy_attributes_carries_readonly_flag() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.txt");
    let target = temp.path().join("target.txt");
    fs::write(&source, "a").unwrap();
    fs::write(&target, "a").unwrap();
    let mut permissions = fs::metadata(&source).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&source, permissions).unwrap();

    io::copy_attributes(&source, &target).unwrap();

    assert!(fs::metadata(&target).unwrap().permissions().readonly());
}

#[test]
fn test_copy_attributes_missing_target_fails() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.txt");
    fs::write(&source, "a").unwrap();

    assert!(io::copy_attributes(&source, &temp.path().join("absent")).is_err());
}

#[test]
fn test_remove_entry_file_and_empty_dir() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("dir");
    let file = dir.join("f.txt");
    fs::create_dir(&dir).unwrap();
    fs::write(&file, "x").unwrap();

    io::remove_entry(&file, EntryKind::File).unwrap();
    io::remove_entry(&dir, EntryKind::Directory).unwrap();

    assert_eq!(entry_kind(&dir).unwrap(), None);
}

#[test]
fn test_remove_entry_non_empty_dir_fails() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("dir");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("child"), "x").unwrap();

    assert!(io::remove_entry(&dir, EntryKind::Directory).is_err());
}

#[test]
fn test_ensure_dir_reports_creation() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("a/b");

    assert!(io::ensure_dir(&dir).unwrap());
    assert!(!io::ensure_dir(&dir).unwrap());
    assert!(dir.is_dir());
}

#[test]
fn test_remove_entry_and_ensure_dir_on_fixture_tree() {
    use assert_fs::prelude::*;
    use predicates::prelude::*;

    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("keep/file.txt").write_str("data").unwrap();
    temp.child("empty").create_dir_all().unwrap();

    io::remove_entry(&temp.child("keep/file.txt").path(), EntryKind::File).unwrap();
    io::remove_entry(&temp.child("empty").path(), EntryKind::Directory).unwrap();
    assert!(io::ensure_dir(&temp.child("fresh/dir").path()).unwrap());
    assert!(!io::ensure_dir(&temp.child("keep").path()).unwrap());

    temp.child("keep/file.txt").assert(predicate::path::missing());
    temp.child("empty").assert(predicate::path::missing());
    temp.child("fresh/dir").assert(predicate::path::is_dir());
    temp.child("keep").assert(predicate::path::is_dir());
}
