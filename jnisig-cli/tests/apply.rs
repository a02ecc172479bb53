//! End-to-end tests of `jnisig apply` against the snapshots in `tests/jni`.

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use jnisig::{program::Program, ProgramDatabase};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tests/jni")
        .join(name)
}

fn apply(program: &Path, methods: &str, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jnisig"))
        .arg("--json")
        .arg("apply")
        .arg("--program")
        .arg(program)
        .arg("--methods")
        .arg(fixture(methods))
        .args(extra)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run jnisig apply")
}

fn parameter_names(program: &ProgramDatabase, name: &str) -> Vec<String> {
    let function = program.find(name).expect("function missing from snapshot");
    program
        .parameters(function)
        .unwrap()
        .iter()
        .map(|p| p.name.clone())
        .collect()
}

#[test]
fn apply_writes_updated_snapshot() {
    let tmp = tempdir().unwrap();
    let snapshot = tmp.path().join("libscenario.json");
    fs::copy(fixture("libscenario.json"), &snapshot).unwrap();

    let output = apply(&snapshot, "methods.json", &[]);
    assert!(
        output.status.success(),
        "jnisig exited with {:?}: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["applied"][0], "Java_com_x_Y_foo");

    let program = ProgramDatabase::from_path(&snapshot).unwrap();
    assert_eq!(
        parameter_names(&program, "Java_com_x_Y_foo"),
        ["env", "thiz", "a0", "a1"]
    );
    assert_eq!(parameter_names(&program, "JNI_OnLoad")[0], "vm");
}

#[test]
fn failed_run_keeps_completed_updates_on_disk() {
    let tmp = tempdir().unwrap();
    let snapshot = tmp.path().join("libscenario.json");
    fs::copy(fixture("libscenario.json"), &snapshot).unwrap();

    let output = apply(&snapshot, "methods_unknown_type.json", &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("java.lang.String"));

    let program = ProgramDatabase::from_path(&snapshot).unwrap();
    assert_eq!(
        parameter_names(&program, "Java_com_x_Y_foo"),
        ["env", "thiz", "a0"]
    );
    assert_eq!(parameter_names(&program, "Java_com_x_Y_bar"), ["param_1"]);

    let on_load = program.find("JNI_OnLoad").unwrap();
    let params = program.parameters(on_load).unwrap();
    assert_eq!(params[0].name, "vm");
    assert_eq!(params[0].data_type.name, "JavaVM *");
}

#[test]
fn dry_run_leaves_snapshot_untouched() {
    let tmp = tempdir().unwrap();
    let snapshot = tmp.path().join("libscenario.json");
    fs::copy(fixture("libscenario.json"), &snapshot).unwrap();
    let before = fs::read_to_string(&snapshot).unwrap();

    let output = apply(&snapshot, "methods_unknown_type.json", &["--dry-run"]);
    assert!(!output.status.success());
    assert_eq!(fs::read_to_string(&snapshot).unwrap(), before);
}

#[test]
fn output_flag_writes_elsewhere() {
    let tmp = tempdir().unwrap();
    let snapshot = tmp.path().join("libscenario.json");
    let target = tmp.path().join("updated.json");
    fs::copy(fixture("libscenario.json"), &snapshot).unwrap();
    let before = fs::read_to_string(&snapshot).unwrap();

    let output = apply(
        &snapshot,
        "methods_unknown_type.json",
        &["--output", target.to_str().unwrap()],
    );
    assert!(!output.status.success());
    assert_eq!(fs::read_to_string(&snapshot).unwrap(), before);

    let program = ProgramDatabase::from_path(&target).unwrap();
    assert_eq!(parameter_names(&program, "Java_com_x_Y_foo").len(), 3);
}
