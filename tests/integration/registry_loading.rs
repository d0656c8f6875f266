//! Integration tests for loading the generator registry from manifests on disk

use super::support::{write_file, G1_MANIFEST};
use extgen::generator::{discover_manifests, GeneratorRegistry};
use extgen::GenErrorKind;
use tempfile::TempDir;

#[test]
fn test_discovered_manifests_load_into_registry() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "etc/device.generator.yml", G1_MANIFEST);
    write_file(
        temp.path(),
        "etc/vendor/board.generator.yaml",
        r#"
generator:
  - id: BoardGen
    gen-dir: board/${project}
    run-cmd: bgen ${context}
"#,
    );

    let discovery = discover_manifests(&[temp.path().join("etc")]);
    assert_eq!(discovery.manifests.len(), 2);
    assert!(discovery.issues.is_empty());

    let (registry, report) = GeneratorRegistry::load(&discovery.manifests, true).unwrap();
    assert!(report.is_success());
    assert!(report.issues.is_empty());
    assert_eq!(report.loaded.len(), 2);
    assert!(registry.is_known("G1"));
    assert!(registry.is_known("BoardGen"));
    assert_eq!(registry.run_cmd_template("BoardGen").unwrap(), "bgen ${context}");
}

#[test]
fn test_same_id_identical_content_is_not_a_conflict() {
    let temp = TempDir::new().unwrap();
    let a = write_file(temp.path(), "a.generator.yml", G1_MANIFEST);
    let b = write_file(temp.path(), "b.generator.yml", G1_MANIFEST);

    let (registry, report) = GeneratorRegistry::load(&[a, b], true).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(report.issues_of(GenErrorKind::Conflict).count(), 0);
}

#[test]
fn test_same_id_different_templates_conflicts_on_second() {
    let temp = TempDir::new().unwrap();
    let a = write_file(temp.path(), "a.generator.yml", G1_MANIFEST);
    let b = write_file(
        temp.path(),
        "b.generator.yml",
        "generator:\n  - id: G1\n    gen-dir: ${comp}/gen\n    run-cmd: other ${comp}\n",
    );

    let (registry, report) = GeneratorRegistry::load(&[a, b.clone()], true).unwrap();
    let conflicts: Vec<_> = report.issues_of(GenErrorKind::Conflict).collect();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].manifest, b);
    assert_eq!(registry.run_cmd_template("G1").unwrap(), "gen run ${comp}");
}

#[test]
fn test_schema_check_can_be_disabled() {
    let temp = TempDir::new().unwrap();
    let extra_key = write_file(
        temp.path(),
        "x.generator.yml",
        "generator:\n  - id: G9\n    gen-dir: d\n    run-cmd: r\n    vendor-extension: true\n",
    );

    let (strict, report) = GeneratorRegistry::load(&[extra_key.clone()], true).unwrap();
    assert!(!strict.is_known("G9"));
    assert_eq!(report.issues_of(GenErrorKind::SchemaViolation).count(), 1);
    assert!(report.is_success(), "schema violations are not hard failures");

    let (lenient, report) = GeneratorRegistry::load(&[extra_key], false).unwrap();
    assert!(lenient.is_known("G9"));
    assert!(report.issues.is_empty());
}

#[test]
fn test_unreadable_manifest_fails_pass_but_keeps_others() {
    let temp = TempDir::new().unwrap();
    let good = write_file(temp.path(), "good.generator.yml", G1_MANIFEST);
    let missing = temp.path().join("gone.generator.yml");

    let (registry, report) = GeneratorRegistry::load(&[missing, good], true).unwrap();
    assert!(!report.is_success());
    assert_eq!(report.issues_of(GenErrorKind::Io).count(), 1);
    assert!(registry.is_known("G1"));
}

#[test]
fn test_templates_are_deterministic_across_calls() {
    let temp = TempDir::new().unwrap();
    let path = write_file(temp.path(), "a.generator.yml", G1_MANIFEST);
    let (registry, _) = GeneratorRegistry::load(&[path], true).unwrap();
    for _ in 0..3 {
        assert_eq!(registry.gen_dir_template("G1").unwrap(), "${comp}/gen");
        assert_eq!(registry.run_cmd_template("G1").unwrap(), "gen run ${comp}");
    }
}

#[cfg(unix)]
#[test]
fn test_broken_manifest_link_fails_discovery_pass() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "etc/g1.generator.yml", G1_MANIFEST);
    let link = temp.path().join("etc/pack.generator.yml");
    std::os::unix::fs::symlink(temp.path().join("etc/gone.yml"), &link).unwrap();

    let (registry, report) = GeneratorRegistry::discover(&[temp.path().join("etc")], true).unwrap();
    assert!(registry.is_known("G1"));
    assert!(!report.is_success());
    let io: Vec<_> = report.issues_of(GenErrorKind::Io).collect();
    assert_eq!(io.len(), 1);
    assert_eq!(io[0].manifest, link);
}
