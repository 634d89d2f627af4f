//! Integration tests for save, show and resync

use blockmark::domain::{ContentId, ContentItem, ContentKind, MarkerTerm};
use blockmark::infrastructure::{ContentStore, FileSystemStore};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::{blockmark_cmd, init_store, save, WIDGET};

fn members(dir: &std::path::Path) -> Vec<ContentId> {
    FileSystemStore::new(dir.to_path_buf())
        .marker_members(MarkerTerm::READ_MORE)
        .unwrap()
        .into_iter()
        .collect()
}

#[test]
fn test_save_with_widget_attaches_marker() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());

    blockmark_cmd()
        .current_dir(temp.path())
        .args(["save", "7", "--title", "Hello", "--body", WIDGET])
        .assert()
        .success()
        .stdout("Saved 7 (marker attached)\n");

    assert_eq!(members(temp.path()), vec![ContentId(7)]);
}

#[test]
fn test_save_without_widget_detaches_marker() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());
    save(temp.path(), 7, "2025-01-10", WIDGET);

    blockmark_cmd()
        .current_dir(temp.path())
        .args(["save", "7", "--body", "<p>no more link</p>"])
        .assert()
        .success()
        .stdout("Saved 7 (marker detached)\n");

    assert!(members(temp.path()).is_empty());
    // The term stays behind with no associations
    let term_dir = temp
        .path()
        .join(".blockmark/terms/blockmark_block_marker/has-read-more-block");
    assert!(term_dir.is_dir());
    assert!(!term_dir.join("7").exists());
}

#[test]
fn test_save_body_from_file() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());
    let body_path = temp.path().join("body.html");
    fs::write(&body_path, format!("<p>Intro</p>\n{}\n", WIDGET)).unwrap();

    blockmark_cmd()
        .current_dir(temp.path())
        .args(["save", "3", "--title", "From file", "--body-file"])
        .arg(&body_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("marker attached"));
}

#[test]
fn test_new_item_without_title_fails() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());

    blockmark_cmd()
        .current_dir(temp.path())
        .args(["save", "3", "--body", WIDGET])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs a --title"));

    assert!(members(temp.path()).is_empty());
}

#[test]
fn test_save_rejects_bad_published() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());

    blockmark_cmd()
        .current_dir(temp.path())
        .args(["save", "3", "--title", "x", "--published", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --published value"));
}

#[test]
fn test_show_prints_title_and_permalink() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());
    save(temp.path(), 5, "2025-03-02", "<p>x</p>");

    blockmark_cmd()
        .current_dir(temp.path())
        .args(["show", "5"])
        .assert()
        .success()
        .stdout("Item 5\nhttps://example.com/2025/03/item-5/\n");
}

#[test]
fn test_show_missing_item() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());

    blockmark_cmd()
        .current_dir(temp.path())
        .args(["show", "404"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Content not found: 404"));
}

#[test]
fn test_resync_backfills_markers() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());

    // Items written straight to the store never went through a save
    let store = FileSystemStore::new(temp.path().to_path_buf());
    let published = chrono::NaiveDate::from_ymd_opt(2025, 1, 5)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    for (id, body) in [(1, WIDGET), (2, "<p>plain</p>"), (3, WIDGET)] {
        let item = ContentItem::new(ContentId(id), ContentKind::Post, "Imported", published, body);
        store.put_item(&item).unwrap();
    }
    assert!(members(temp.path()).is_empty());

    blockmark_cmd()
        .current_dir(temp.path())
        .arg("resync")
        .assert()
        .success()
        .stdout("Resynced 3 items (2 attached, 1 detached)\n");

    assert_eq!(members(temp.path()), vec![ContentId(1), ContentId(3)]);
}

#[test]
fn test_parallel_saves_of_different_items_keep_every_marker() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());

    std::thread::scope(|scope| {
        for id in 1..=24u64 {
            let dir = temp.path();
            scope.spawn(move || {
                blockmark_cmd()
                    .current_dir(dir)
                    .args([
                        "save",
                        &id.to_string(),
                        "--title",
                        "Parallel",
                        "--published",
                        "2025-01-10",
                        "--body",
                        WIDGET,
                    ])
                    .assert()
                    .success()
                    .stdout(format!("Saved {} (marker attached)\n", id));
            });
        }
    });

    let expected: Vec<ContentId> = (1..=24).map(ContentId).collect();
    assert_eq!(members(temp.path()), expected);
}
