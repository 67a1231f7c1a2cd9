use std::path::PathBuf;
use std::process::Command;

fn temp_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "geocoin-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn run(args: &[&str], save_dir: &PathBuf) -> String {
    let exe = env!("CARGO_BIN_EXE_geocoin");
    let output = Command::new(exe)
        .args(args)
        .arg("--save-dir")
        .arg(save_dir)
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "cli failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn play_persists_and_status_reads_it_back() {
    let save_dir = temp_dir("play");
    let played = run(
        &[
            "--mode",
            "play",
            "--commands",
            "n e collect-all:0,0 collect-all:1,0 collect-all:1,1 collect-all:0,1",
        ],
        &save_dir,
    );
    let final_status = played
        .lines()
        .last()
        .expect("play prints a status line")
        .to_string();
    assert!(final_status.starts_with("You have"));

    let status = run(&["--mode", "status"], &save_dir);
    assert!(
        status.lines().next().unwrap_or_default() == final_status,
        "reload disagrees with played state:\n{played}\n---\n{status}"
    );
}

#[test]
fn reset_wipes_progress() {
    let save_dir = temp_dir("reset");
    run(&["--mode", "play", "--commands", "n n e"], &save_dir);
    let reset = run(&["--mode", "reset"], &save_dir);
    assert!(reset.contains("world reset"));
    let status = run(&["--mode", "status"], &save_dir);
    assert!(status.contains("You have 0 points"));
    assert!(status.contains("cell 0,0"));
}

#[test]
fn simulate_reports_conserved_walks() {
    let save_dir = temp_dir("sim");
    let output_path = temp_dir("sim-report");
    run(
        &[
            "--mode",
            "simulate",
            "--seeds",
            "1337,42",
            "--steps",
            "80",
            "--report",
            "json",
            "--output",
            output_path.to_str().expect("utf-8 temp path"),
        ],
        &save_dir,
    );
    let report = std::fs::read_to_string(&output_path).expect("read report");
    let parsed: serde_json::Value = serde_json::from_str(&report).expect("json report");
    let walks = parsed.as_array().expect("array of walks");
    assert_eq!(walks.len(), 2);
    for walk in walks {
        assert_eq!(walk["conservation_ok"], serde_json::Value::Bool(true));
    }
}
