use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const IMAGE: &str = "urn:publicid:IDN+emulab.net+image+emulab-ops:UBUNTU22-64-STD";

fn rspecgen(store: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rspecgen"))
        .arg("--store")
        .arg(store)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run rspecgen")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn no_arguments_prints_builtin_rspec() {
    let output = Command::new(env!("CARGO_BIN_EXE_rspecgen"))
        .output()
        .expect("failed to run rspecgen");

    assert!(output.status.success());
    let xml = stdout(&output);

    assert_eq!(xml.matches("<node ").count(), 1);
    assert!(xml.contains("<hardware_type name=\"d430\"/>"));
    assert!(xml.contains(&format!("<disk_image name=\"{}\"/>", IMAGE)));
    assert!(xml.contains("<emulab:routable_control_ip/>"));
    assert_eq!(xml.matches("<emulab:blockstore ").count(), 1);
    assert!(xml.contains("mountpoint=\"/mydata\""));
    assert!(xml.contains("size=\"20GB\""));
    assert!(xml.contains(
        "<description type=\"text\">\nExample profile for the hello-world-cluster\n</description>"
    ));
}

#[test]
fn output_is_byte_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let first = rspecgen(dir.path(), &["render"]);
    let second = rspecgen(dir.path(), &["render"]);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn render_to_file_matches_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("request.xml");

    let written = rspecgen(dir.path(), &["render", "--output", out.to_str().unwrap()]);
    assert!(written.status.success());
    assert!(written.stdout.is_empty());

    let printed = rspecgen(dir.path(), &["render"]);
    assert_eq!(fs::read(&out).unwrap(), printed.stdout);
}

#[test]
fn exported_profile_renders_like_builtin() {
    let dir = tempfile::tempdir().unwrap();

    let export = rspecgen(dir.path(), &["profile", "export", "hello"]);
    assert!(export.status.success());

    let list = rspecgen(dir.path(), &["profile", "list"]);
    assert_eq!(stdout(&list).trim(), "hello");

    let stored = rspecgen(dir.path(), &["render", "--profile", "hello"]);
    let builtin = rspecgen(dir.path(), &["render"]);
    assert!(stored.status.success());
    assert_eq!(stored.stdout, builtin.stdout);

    let delete = rspecgen(dir.path(), &["profile", "delete", "hello"]);
    assert!(delete.status.success());
    let again = rspecgen(dir.path(), &["profile", "delete", "hello"]);
    assert_eq!(again.status.code(), Some(1));
}

#[test]
fn invalid_definition_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bad.yaml");
    fs::write(
        &file,
        "nodes:\n  - name: n0\n    blockstores:\n      - name: bs\n        mount: data\n        size: 20GB\n",
    )
    .unwrap();

    let output = rspecgen(dir.path(), &["render", "--profile", file.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("mount path 'data' is not absolute"), "{stderr}");
}

#[test]
fn unknown_profile_name_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = rspecgen(dir.path(), &["validate", "--profile", "missing"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing"));
}

#[test]
fn show_json_reports_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    let output = rspecgen(dir.path(), &["show", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["nodes"][0]["name"], "deploy-node");
    assert_eq!(value["fingerprint"].as_str().unwrap().len(), 64);
}

#[test]
fn validate_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let output = rspecgen(dir.path(), &["validate"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Profile OK: 1 node(s)");
}

#[test]
fn control_characters_fail_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bell.json");
    fs::write(
        &file,
        r#"{
  "tour": { "description": "bell\u0007here" },
  "nodes": [ { "name": "n0", "hardware_type": "d430" } ]
}"#,
    )
    .unwrap();

    let output = rspecgen(dir.path(), &["render", "--profile", file.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tour description contains a character not allowed in XML"), "{stderr}");
}
