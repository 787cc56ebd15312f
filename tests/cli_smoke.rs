use std::path::PathBuf;
use std::process::Command;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_drillpath")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "drillpath.exe"
            } else {
                "drillpath"
            });
            p
        })
}

#[test]
fn cli_distribute_prints_positions() {
    let output = Command::new(exe())
        .args(["distribute", "M 0 0 L 100 0", "--items", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["0 0 0", "1 50 0", "2 100 0"]);
}

#[test]
fn cli_validate_normalizes_and_append_extends() {
    let output = Command::new(exe())
        .args(["validate", "M 0.0 0 L 100.0 0.5"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        "M 0 0 L 100 0.5"
    );

    let output = Command::new(exe())
        .args(["append", "M 0 0 L 100 0"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        "M 0 0 L 100 0 L 350 0"
    );
}

#[test]
fn cli_rejects_a_malformed_path() {
    let output = Command::new(exe())
        .args(["validate", "L 1 2"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
