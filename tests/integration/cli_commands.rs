//! Integration tests driving the `extgen` binary

use super::support::{write_file, G1_MANIFEST};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const INPUT: &str = r#"
components:
  - id: CompA
    generator: G1
  - id: CompB
    generator: G1
contexts:
  - id: ctxA
    type: single-core
    components:
      - component: CompA
  - id: ctxB
    type: multi-core
    components:
      - component: CompA
      - component: CompB
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "packs/g1.generator.yml", G1_MANIFEST);
        write_file(dir.path(), "project.yml", INPUT);
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_extgen"));
        for (key, _) in std::env::vars() {
            if key.starts_with("EXTGEN") {
                cmd.env_remove(key);
            }
        }
        cmd.env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .current_dir(self.path())
            .arg("--quiet")
            .arg("--workspace")
            .arg(self.path())
            .arg("--manifest-dir")
            .arg(self.path().join("packs"))
            .args(args);
        cmd.output().unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_generators_list_json() {
    let ws = Workspace::new();
    let output = ws.run(&["generators", "list", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["total"], 1);
    assert_eq!(value["generators"][0]["id"], "G1");
    assert_eq!(value["success"], true);
}

#[test]
fn test_generators_show_unknown_is_not_found() {
    let ws = Workspace::new();
    let output = ws.run(&["generators", "show", "Nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error [not found]"));
}

#[test]
fn test_check_mismatch_fails() {
    let ws = Workspace::new();
    let input = ws.path().join("project.yml");
    let input = input.to_str().unwrap();

    let ok = ws.run(&[
        "check", "--input", input, "--component", "CompA", "--generator", "G1", "--type",
        "multi-core",
    ]);
    assert!(ok.status.success());
    assert!(stdout(&ok).contains("in a multi-core context"));

    let bad = ws.run(&[
        "check", "--input", input, "--component", "CompA", "--generator", "G2",
    ]);
    assert_eq!(bad.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&bad.stderr).contains("error [mismatch]"));
}

#[test]
fn test_resolve_yaml_layers() {
    let ws = Workspace::new();
    let input = ws.path().join("project.yml");
    let output = ws.run(&[
        "resolve",
        "--input",
        input.to_str().unwrap(),
        "--context",
        "ctxB",
        "--format",
        "yaml",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    assert!(text.contains("ctxB"));
    assert!(text.contains("CompA/gen"));
    assert!(text.contains("CompB/gen/ctxB.cgen.yml"));
    assert!(!text.contains("ctxA"));
}

#[test]
fn test_resolve_with_failures_exits_two() {
    let ws = Workspace::new();
    let input = write_file(
        ws.path(),
        "broken.yml",
        r#"
components:
  - id: CompA
    generator: G1
contexts:
  - id: c
    type: single-core
    components:
      - component: CompA
      - component: Ghost
"#,
    );
    let output = ws.run(&["resolve", "--input", input.to_str().unwrap(), "--format", "json"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("CompA/gen"));
}

#[test]
fn test_calls_json_one_per_directory() {
    let ws = Workspace::new();
    let input = ws.path().join("project.yml");
    let output = ws.run(&["calls", "--input", input.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let calls = value["calls"].as_array().expect("calls array");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0]["command"], "gen run CompA");
}
