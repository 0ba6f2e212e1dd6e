use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::{env, fs};

use serde_json::Value;
use tempfile::tempdir;

fn cli_bin_path() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_folio") {
        return PathBuf::from(path);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(PathBuf::from)
        .expect("workspace root");
    let bin_name = if cfg!(windows) { "folio.exe" } else { "folio" };
    let fallback = workspace_root.join("target").join("debug").join(bin_name);
    assert!(
        fallback.exists(),
        "folio binary not found at {}",
        fallback.display()
    );
    fallback
}

fn run(root: &Path, args: &[&str]) -> Output {
    Command::new(cli_bin_path())
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("FOLIO_BOT_TOKEN")
        .env_remove("FOLIO_OPERATOR_ID")
        .env("RUST_LOG", "off")
        .output()
        .expect("run folio")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

#[test]
fn put_then_search_process_contract_finds_item() {
    let root = tempdir().expect("tempdir");
    stdout_json(&run(root.path(), &["mkdir", "Movies"]));
    stdout_json(&run(
        root.path(),
        &[
            "put",
            "Movies",
            "Lost",
            "--json",
            r#"{"type":"copy","from_chat_id":-100,"message_id":4}"#,
        ],
    ));

    let hits = stdout_json(&run(root.path(), &["search", "lost"]));
    assert_eq!(hits[0]["name"], "Lost");
    assert_eq!(hits[0]["path"], "Movies");
    assert_eq!(hits[0]["kind"], "copy");

    let listing = stdout_json(&run(root.path(), &["ls", "Movies", "--page", "0"]));
    assert_eq!(listing["labels"][0], "🎬 Lost");
}

#[test]
fn open_redirect_process_contract_reports_navigation() {
    let root = tempdir().expect("tempdir");
    fs::create_dir_all(root.path().join("A/B")).expect("mkdir");
    fs::write(
        root.path().join("go.json"),
        r#"{"type":"redirect","target_path":"A/B"}"#,
    )
    .expect("write redirect");

    let intent = stdout_json(&run(root.path(), &["open", "", "go"]));
    assert_eq!(intent["intent"], "navigate");
    assert_eq!(intent["path"], "A/B");
}

#[test]
fn locked_folder_process_contract_denies_without_membership() {
    let root = tempdir().expect("tempdir");
    fs::create_dir_all(root.path().join("Vip")).expect("mkdir");
    fs::write(
        root.path().join("Vip/config.json"),
        r#"{"locked_channel":"@vip"}"#,
    )
    .expect("write config");

    let verdict = stdout_json(&run(root.path(), &["can-enter", "Vip", "--user", "5"]));
    assert_eq!(verdict["allowed"], false);
    let open = stdout_json(&run(root.path(), &["can-enter", "", "--user", "5"]));
    assert_eq!(open["allowed"], true);
}

#[test]
fn missing_item_process_contract_exits_non_zero_with_payload() {
    let root = tempdir().expect("tempdir");
    let output = run(root.path(), &["open", "", "nothing"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"code\":\"NOT_FOUND\""), "stderr: {stderr}");
}
