//! Filesystem behavior of the citation rewriter.

use std::fs;

use imcite_core::rewrite::{backup_path, rewrite_file, rewrite_target};
use imcite_core::RenameMap;
use tempfile::tempdir;

fn simple_map() -> RenameMap {
    let mut map = RenameMap::new();
    map.insert("smith99", "Smith:1999abc");
    map
}

#[test]
fn changed_file_gets_exactly_one_backup() {
    let dir = tempdir().unwrap();
    let tex = dir.path().join("paper.tex");
    fs::write(&tex, "Intro \\citep{smith99} outro.\n").unwrap();

    let changed = rewrite_file(&tex, &simple_map()).unwrap();
    assert!(changed);

    assert_eq!(
        fs::read_to_string(&tex).unwrap(),
        "Intro \\citep{Smith:1999abc} outro.\n"
    );
    assert_eq!(
        fs::read_to_string(backup_path(&tex)).unwrap(),
        "Intro \\citep{smith99} outro.\n"
    );
}

#[test]
fn untouched_file_produces_no_backup() {
    let dir = tempdir().unwrap();
    let tex = dir.path().join("paper.tex");
    let content = "No relevant \\cite{other} here.\n";
    fs::write(&tex, content).unwrap();

    let changed = rewrite_file(&tex, &simple_map()).unwrap();
    assert!(!changed);
    assert_eq!(fs::read_to_string(&tex).unwrap(), content);
    assert!(!backup_path(&tex).exists());
}

#[test]
fn rewrite_is_idempotent() {
    let dir = tempdir().unwrap();
    let tex = dir.path().join("paper.tex");
    fs::write(&tex, "\\cite{smith99}\n").unwrap();

    assert!(rewrite_file(&tex, &simple_map()).unwrap());
    let after_first = fs::read_to_string(&tex).unwrap();

    // Second run touches nothing and leaves the backup alone.
    assert!(!rewrite_file(&tex, &simple_map()).unwrap());
    assert_eq!(fs::read_to_string(&tex).unwrap(), after_first);
    assert_eq!(
        fs::read_to_string(backup_path(&tex)).unwrap(),
        "\\cite{smith99}\n"
    );
}

#[test]
fn stale_backup_is_replaced_not_kept() {
    let dir = tempdir().unwrap();
    let tex = dir.path().join("paper.tex");
    let backup = dir.path().join("paper-old.tex");
    fs::write(&tex, "\\cite{smith99}\n").unwrap();
    fs::write(&backup, "stale backup from another run\n").unwrap();

    assert!(rewrite_file(&tex, &simple_map()).unwrap());
    assert_eq!(fs::read_to_string(&backup).unwrap(), "\\cite{smith99}\n");
}

#[test]
fn directory_walk_skips_backups_and_isolates_failures() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();

    fs::write(dir.path().join("a.tex"), "\\cite{smith99}\n").unwrap();
    fs::write(dir.path().join("sub/b.tex"), "\\citet{smith99}\n").unwrap();
    fs::write(dir.path().join("a-old.tex"), "\\cite{smith99}\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "\\cite{smith99}\n").unwrap();
    // Invalid UTF-8 makes this one unreadable as text.
    fs::write(dir.path().join("broken.tex"), [0xff, 0xfe, 0x00]).unwrap();

    let summary = rewrite_target(dir.path(), &simple_map());

    let mut modified: Vec<_> = summary
        .modified
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    modified.sort();
    assert_eq!(modified, vec!["a.tex", "b.tex"]);

    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].0.ends_with("broken.tex"));

    // The pre-existing backup and the non-tex file were never touched.
    assert_eq!(
        fs::read_to_string(dir.path().join("a-old.tex")).unwrap(),
        "\\cite{smith99}\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
        "\\cite{smith99}\n"
    );
}

#[test]
fn empty_map_skips_everything() {
    let dir = tempdir().unwrap();
    let tex = dir.path().join("paper.tex");
    fs::write(&tex, "\\cite{smith99}\n").unwrap();

    let summary = rewrite_target(&tex, &RenameMap::new());
    assert!(summary.modified.is_empty());
    assert!(summary.unchanged.is_empty());
    assert!(summary.failed.is_empty());
    assert!(!backup_path(&tex).exists());
}

#[test]
fn single_non_tex_target_is_skipped() {
    let dir = tempdir().unwrap();
    let txt = dir.path().join("notes.txt");
    fs::write(&txt, "\\cite{smith99}\n").unwrap();

    let summary = rewrite_target(&txt, &simple_map());
    assert!(summary.modified.is_empty());
    assert_eq!(fs::read_to_string(&txt).unwrap(), "\\cite{smith99}\n");
}
