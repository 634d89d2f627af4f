#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

pub const WIDGET: &str = r#"<!-- wp:dmg-rml/read-more-link {"postID":1} /-->"#;

pub fn blockmark_cmd() -> Command {
    let mut cmd = Command::cargo_bin("blockmark").unwrap();
    cmd.env_remove("BLOCKMARK_ROOT");
    cmd.env_remove("BLOCKMARK_PAGE_SIZE");
    cmd.env_remove("BLOCKMARK_LOG");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Initialize a store in `dir`
pub fn init_store(dir: &Path) {
    blockmark_cmd()
        .arg("init")
        .arg(dir)
        .arg("--site-url")
        .arg("https://example.com")
        .assert()
        .success();
}

/// Save an item through the CLI
pub fn save(dir: &Path, id: u64, published: &str, body: &str) {
    blockmark_cmd()
        .current_dir(dir)
        .args([
            "save",
            &id.to_string(),
            "--title",
            &format!("Item {}", id),
            "--published",
            published,
            "--body",
            body,
        ])
        .assert()
        .success();
}

/// Lines printed on stdout
pub fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect()
}
