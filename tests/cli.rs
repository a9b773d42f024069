use std::{
    fs,
    path::PathBuf,
    process::{Command, Output, Stdio},
};

fn bin_path() -> &'static str {
    env!("CARGO_BIN_EXE_navtree")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn navtree(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run navtree")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn script() -> String {
    fixture("navtreedata.js").display().to_string()
}

#[test]
fn check_summarizes_generated_script() {
    let output = navtree(&["check", &script()]);
    assert!(
        output.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout(&output).trim(),
        "41 entries, 41 index chunks, 8 deferred child script(s), 0 issue(s)"
    );
}

#[test]
fn lookup_prints_label_path() {
    let output = navtree(&["lookup", &script(), "dpdk_backend.html"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "P4 Compiler Documentation (P4C) > Backends > DPDK Backend"
    );
}

#[test]
fn lookup_of_unknown_target_fails_softly() {
    let output = navtree(&["lookup", &script(), "z.html"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output).trim(), "not found");
}

#[test]
fn index_resolves_chunk_for_anchor() {
    let output = navtree(&[
        "index",
        &script(),
        "class_p4_1_1_type_inference.html#a0123",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "navtreeindex25");
}

#[test]
fn tree_outline_honours_depth() {
    let output = navtree(&["tree", &script(), "--depth", "0"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "P4 Compiler Documentation (P4C) (index.html)\n"
    );
}

#[test]
fn format_reproduces_generated_body() {
    let output = navtree(&["format", &script()]);
    assert!(output.status.success());
    let original = fs::read_to_string(fixture("navtreedata.js")).expect("fixture");
    let body = &original[original.find("var NAVTREE =").expect("tree binding")..];
    assert_eq!(stdout(&output).trim_end(), body.trim_end());
}

#[test]
fn resolve_flag_inlines_deferred_children() {
    let output = navtree(&[
        "lookup",
        &script(),
        "namespace_b_f_n_1_1_b_f_r_t.html",
        "--resolve",
    ]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "P4 Compiler Documentation (P4C) > Namespaces > Namespace List > BFN > BFRT"
    );
    // scripts missing from the fixture directory are reported but not fatal
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("namespacemembers_dup"), "{stderr}");
}

#[test]
fn config_file_beside_script_is_used() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::copy(fixture("navtreedata.js"), dir.path().join("navtreedata.js")).expect("copy");
    fs::copy(fixture("namespaces_dup.js"), dir.path().join("namespaces_dup.js")).expect("copy");
    fs::write(dir.path().join("navtree.toml"), "resolve_deferred = true\n").expect("config");

    let path = dir.path().join("navtreedata.js").display().to_string();
    let output = navtree(&["lookup", &path, "namespace_test.html"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "P4 Compiler Documentation (P4C) > Namespaces > Namespace List > Test"
    );
}

#[test]
fn syntax_errors_fail_with_diagnostics() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("navtreedata.js");
    fs::write(&path, "var NAVTREE = [ [ \"A\", \"a.html\" null ] ];").expect("write");
    let output = navtree(&["check", &path.display().to_string()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Expected `,` or `]` in array"), "{stderr}");
}

#[test]
fn bad_usage_exits_with_two() {
    assert_eq!(navtree(&["render", &script()]).status.code(), Some(2));
    let unknown = navtree(&["render", "missing.js"]);
    assert_eq!(unknown.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("Invalid command `render`."));
    assert_eq!(navtree(&["lookup"]).status.code(), Some(2));
    assert_eq!(navtree(&["tree", &script(), "--depth", "x"]).status.code(), Some(2));
}

#[test]
fn json_output_is_positional() {
    let output = navtree(&["json", &script()]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["navtree"][0][0], "P4 Compiler Documentation (P4C)");
    assert_eq!(value["navtree"][0][2][0][2], serde_json::Value::Null);
    assert_eq!(value["index"].as_array().map(Vec::len), Some(41));
    assert_eq!(value["sync"]["on"], "click to disable panel synchronization");
}
