//! End-to-end tests for `sketch render`: script in, file out.

use std::fs;
use std::process::Command;

use serde_json::json;

fn sketch() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sketch"));
    cmd.env_remove("RUST_LOG").env_remove("PULSE_TEX_URL");
    cmd
}

fn write_script(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let script = json!([
        { "type": "pointer", "data": { "phase": "down", "x": 0.0, "y": 0.0 } },
        { "type": "pointer", "data": { "phase": "move", "x": 50.0, "y": 0.0 } },
        { "type": "pointer", "data": { "phase": "up", "x": 100.0, "y": 0.0 } }
    ]);
    let path = dir.path().join("line.json");
    fs::write(&path, script.to_string()).expect("write script");
    path
}

fn write_config(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("session.json");
    fs::write(
        &path,
        json!({ "tool": "line", "size": { "width": 200.0, "height": 100.0 } }).to_string(),
    )
    .expect("write config");
    path
}

#[test]
fn render_writes_svg() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir);
    let config = write_config(&dir);
    let output = dir.path().join("out.svg");

    let status = sketch()
        .arg("render")
        .arg(&script)
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .status()
        .expect("run sketch");
    assert!(status.success());

    let svg = fs::read_to_string(&output).expect("read svg");
    assert!(svg.contains(r#"width="200""#));
    assert!(svg.contains(r#"<line x1="0" y1="0" x2="100" y2="0""#));
}

#[test]
fn render_writes_png_by_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir);
    let config = write_config(&dir);
    let output = dir.path().join("out.png");

    let status = sketch()
        .arg("render")
        .arg(&script)
        .arg("--config")
        .arg(&config)
        .arg("-o")
        .arg(&output)
        .status()
        .expect("run sketch");
    assert!(status.success());

    let png = fs::read(&output).expect("read png");
    assert_eq!(&png[0..4], &[137, 80, 78, 71]);
}

#[test]
fn render_of_empty_sketch_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = dir.path().join("empty.json");
    fs::write(&script, "[]").expect("write script");
    let output = dir.path().join("out.svg");

    let result = sketch()
        .arg("render")
        .arg(&script)
        .arg("--output")
        .arg(&output)
        .output()
        .expect("run sketch");
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Canvas is empty"));
    assert!(!output.exists());
}

#[test]
fn render_rejects_invalid_surface_size() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = write_script(&dir);
    let config = dir.path().join("bad.json");
    fs::write(&config, json!({ "size": { "width": -5.0, "height": 100.0 } }).to_string())
        .expect("write config");
    let output = dir.path().join("out.png");

    let result = sketch()
        .arg("render")
        .arg(&script)
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .output()
        .expect("run sketch");
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Invalid surface size"));
    assert!(!output.exists());
}
