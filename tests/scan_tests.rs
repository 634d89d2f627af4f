//! Integration tests for scan-marked-content

use blockmark::application::SaveContentService;
use blockmark::domain::{ContentId, ContentItem, ContentKind};
use blockmark::infrastructure::FileSystemStore;
use predicates::prelude::*;
use tempfile::TempDir;

mod common;
use common::{blockmark_cmd, init_store, save, stdout_lines, WIDGET};

fn scan(dir: &std::path::Path, args: &[&str]) -> std::process::Output {
    blockmark_cmd()
        .current_dir(dir)
        .arg("scan-marked-content")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_scan_lists_marked_items_in_range() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());
    save(temp.path(), 1, "2025-01-01 00:00:00", WIDGET);
    save(temp.path(), 2, "2025-01-15 12:00:00", WIDGET);
    save(temp.path(), 3, "2025-01-31 23:59:59", WIDGET);
    save(temp.path(), 4, "2025-02-01 00:00:00", WIDGET);
    save(temp.path(), 5, "2025-01-20 10:00:00", "<p>no widget</p>");

    let output = scan(
        temp.path(),
        &["--date-after=2025-01-01", "--date-before=2025-01-31"],
    );
    assert!(output.status.success());

    assert_eq!(
        stdout_lines(&output),
        vec![
            "Searching for posts published after 2025-01-01 and before 2025-01-31...",
            "3",
            "2",
            "1",
            "Finished! Found a total of 3 posts.",
        ]
    );
}

#[test]
fn test_scan_single_result_is_singular() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());
    save(temp.path(), 9, "2025-01-15", WIDGET);

    blockmark_cmd()
        .current_dir(temp.path())
        .args(["scan-marked-content", "--date-after", "2025-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Searching for posts published after 2025-01-01...",
        ))
        .stdout(predicate::str::contains("Finished! Found a total of 1 post."));
}

#[test]
fn test_scan_before_only() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());
    save(temp.path(), 1, "2024-06-01", WIDGET);
    save(temp.path(), 2, "2025-06-01", WIDGET);

    let output = scan(temp.path(), &["--date-before=2025-01-01"]);
    assert_eq!(
        stdout_lines(&output),
        vec![
            "Searching for posts published before 2025-01-01...",
            "1",
            "Finished! Found a total of 1 post.",
        ]
    );
}

#[test]
fn test_scan_default_window_is_last_30_days() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());

    // Published now
    blockmark_cmd()
        .current_dir(temp.path())
        .args(["save", "1", "--title", "Fresh", "--body", WIDGET])
        .assert()
        .success();
    save(temp.path(), 2, "2001-01-01", WIDGET);

    let output = scan(temp.path(), &[]);
    assert_eq!(
        stdout_lines(&output),
        vec![
            "Searching for posts published in the last 30 days...",
            "1",
            "Finished! Found a total of 1 post.",
        ]
    );
}

#[test]
fn test_invalid_date_aborts_before_output() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());
    save(temp.path(), 1, "2025-01-15", WIDGET);

    blockmark_cmd()
        .current_dir(temp.path())
        .args(["scan-marked-content", "--date-after=not-a-date"])
        .assert()
        .code(3)
        .stdout("")
        .stderr("Error: Invalid --date-after format: 'not-a-date'. Please use YYYY-MM-DD.\n");
}

#[test]
fn test_invalid_date_reported_even_outside_store() {
    let temp = TempDir::new().unwrap();

    blockmark_cmd()
        .current_dir(temp.path())
        .args(["scan-marked-content", "--date-before=2025-13-01"])
        .assert()
        .code(3)
        .stdout("")
        .stderr(predicate::str::contains("Invalid --date-before format"));
}

#[test]
fn test_scan_pages_through_everything() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());

    let service = SaveContentService::new(FileSystemStore::new(temp.path().to_path_buf()));
    let published = chrono::NaiveDate::from_ymd_opt(2025, 1, 10)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    for id in 1..=25 {
        let body = if id % 5 == 0 { "<p>plain</p>" } else { WIDGET };
        let item = ContentItem::new(ContentId(id), ContentKind::Post, "Bulk", published, body);
        service.save(&item).unwrap();
    }

    let output = blockmark_cmd()
        .current_dir(temp.path())
        .env("BLOCKMARK_PAGE_SIZE", "7")
        .args(["scan-marked-content", "--date-after=2025-01-01"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 22);
    assert_eq!(lines[21], "Finished! Found a total of 20 posts.");

    let mut ids: Vec<u64> = lines[1..21].iter().map(|l| l.parse().unwrap()).collect();
    // Same timestamp: ties ordered by id, highest first
    assert_eq!(ids[0], 24);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
    assert!(ids.iter().all(|id| id % 5 != 0));
}

#[test]
fn test_marker_follows_body_between_saves() {
    let temp = TempDir::new().unwrap();
    init_store(temp.path());
    let window = ["--date-after=2025-01-01", "--date-before=2025-01-31"];

    save(temp.path(), 42, "2025-01-20", WIDGET);
    let first = scan(temp.path(), &window);
    assert!(stdout_lines(&first).contains(&"42".to_string()));

    blockmark_cmd()
        .current_dir(temp.path())
        .args(["save", "42", "--body", "<p>link removed</p>"])
        .assert()
        .success();
    let second = scan(temp.path(), &window);
    assert_eq!(
        stdout_lines(&second),
        vec![
            "Searching for posts published after 2025-01-01 and before 2025-01-31...",
            "Finished! Found a total of 0 posts.",
        ]
    );
}
