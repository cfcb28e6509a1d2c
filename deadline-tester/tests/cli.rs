use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "deadline-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_strategies_writes_output() {
    let exe = env!("CARGO_BIN_EXE_deadline-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-strategies", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available strategies"));
    assert!(content.contains("perfectionist"));
}

#[test]
fn cli_runs_strategies_with_csv_report() {
    let exe = env!("CARGO_BIN_EXE_deadline-tester");
    let output_path = temp_path("run.csv");
    let output = Command::new(exe)
        .args([
            "--strategies",
            "perfectionist,quitter",
            "--report",
            "csv",
            "--iterations",
            "2",
            "--seeds",
            "1,0x10",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Deadline Automated Tester"));
    let content = std::fs::read_to_string(output_path).expect("read output");
    // header plus 2 strategies x 2 seeds x 2 iterations
    assert_eq!(content.lines().count(), 9);
    assert!(content.contains("quitter,16,abandon"));
}

#[test]
fn cli_rejects_unknown_strategy() {
    let exe = env!("CARGO_BIN_EXE_deadline-tester");
    let output = Command::new(exe)
        .args(["--strategies", "speedrunner"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown strategy"));
}

#[test]
fn cli_fails_on_missing_data_dir() {
    let exe = env!("CARGO_BIN_EXE_deadline-tester");
    let output = Command::new(exe)
        .args(["--strategies", "random", "--iterations", "1", "--data-dir"])
        .arg(temp_path("absent"))
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("days.json"));
}
