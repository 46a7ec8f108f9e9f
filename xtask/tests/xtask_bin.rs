use std::process::Command;

#[test]
fn xtask_help_runs() {
    let exe = env!("CARGO_BIN_EXE_xtask");
    let output = Command::new(exe)
        .arg("help")
        .output()
        .expect("run xtask");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("xtask commands"));
}

#[test]
fn print_schema_ids_lists_every_schema() {
    let exe = env!("CARGO_BIN_EXE_xtask");
    let output = Command::new(exe)
        .arg("print-schema-ids")
        .output()
        .expect("run xtask");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in [
        "polcheck.config.v1",
        "polcheck.catalog.v1",
        "polcheck.event.v1",
        "polcheck.report.v1",
    ] {
        assert!(stdout.contains(id), "missing {id} in {stdout}");
    }
}

#[test]
fn check_fixtures_accepts_workspace_fixtures() {
    let exe = env!("CARGO_BIN_EXE_xtask");
    let output = Command::new(exe)
        .arg("check-fixtures")
        .output()
        .expect("run xtask");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "check-fixtures failed: {stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("fixtures are valid"), "{stdout}");
}

#[test]
fn committed_schemas_are_up_to_date() {
    let exe = env!("CARGO_BIN_EXE_xtask");
    let output = Command::new(exe)
        .arg("validate-schemas")
        .output()
        .expect("run xtask");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "validate-schemas failed: {stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("All schemas are up to date."), "{stdout}");
}
