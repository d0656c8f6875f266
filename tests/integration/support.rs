//! Shared fixtures for integration tests

use std::path::{Path, PathBuf};

pub const G1_MANIFEST: &str = r#"
generator:
  - id: G1
    description: Device configurator
    gen-dir: ${comp}/gen
    run-cmd: gen run ${comp}
"#;

pub fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, body).unwrap();
    path
}
