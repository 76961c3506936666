use approx::assert_relative_eq;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn run_json(args: &[&str]) -> serde_json::Value {
    let mut cmd = Command::cargo_bin("tefind").unwrap();
    let output = cmd.arg("detect").args(args).output().unwrap();
    assert!(output.status.success());

    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn command_detect_single_element() {
    let json = run_json(&["tests/fasta/te.fa"]);

    assert_eq!(json["name"], "te");
    assert_eq!(json["sequence_length"], 52);
    assert_eq!(json["num_detected"], 1);

    let te = &json["transposons"][0];
    assert_eq!(te["start"], 0);
    assert_eq!(te["end"], 51);
    assert_eq!(te["length"], 52);
    assert_eq!(te["tir_left"], "GGCCAATT");
    assert_eq!(te["tir_right"], "AATTGGCC");
    assert_eq!(te["tir_left_pos"], serde_json::json!([8, 15]));
    assert_eq!(te["tir_right_pos"], serde_json::json!([36, 43]));
    assert_eq!(te["tsd"], "ACGTACGT");
    assert_eq!(te["tsd_left_pos"], serde_json::json!([0, 7]));
    assert_eq!(te["tsd_right_pos"], serde_json::json!([44, 51]));
    assert_eq!(te["confidence"], "high");
    assert!(json.get("validation").is_none());
}

#[test]
fn command_detect_with_truth() {
    let json = run_json(&[
        "tests/fasta/synthetic.fa",
        "--tir-min",
        "8",
        "--tir-max",
        "10",
        "--truth",
        "tests/fasta/synthetic_truth.json",
    ]);

    assert_eq!(json["sequence_length"], 288);
    assert_eq!(json["num_detected"], 3);

    let starts: Vec<u64> = json["transposons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|te| te["start"].as_u64().unwrap())
        .collect();
    assert_eq!(starts, vec![25, 110, 208]);
    assert!(json["transposons"]
        .as_array()
        .unwrap()
        .iter()
        .all(|te| te["confidence"] == "high"));

    let report = &json["validation"];
    assert_eq!(report["num_ground_truth"], 3);
    assert_eq!(report["num_detected"], 3);
    assert_eq!(report["true_positives"], 3);
    assert_relative_eq!(report["precision"].as_f64().unwrap(), 1.0);
    assert_relative_eq!(report["recall"].as_f64().unwrap(), 1.0);
}

#[test]
fn command_detect_default_thresholds_truth() {
    let json = run_json(&[
        "tests/fasta/synthetic.fa",
        "--truth",
        "tests/fasta/synthetic_truth.json",
    ]);

    let starts: Vec<u64> = json["transposons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|te| te["start"].as_u64().unwrap())
        .collect();
    assert_eq!(starts, vec![25, 110, 208]);

    let report = &json["validation"];
    assert_eq!(report["num_detected"], 3);
    assert_eq!(report["true_positives"], 3);
    assert_relative_eq!(report["precision"].as_f64().unwrap(), 1.0);
    assert_relative_eq!(report["recall"].as_f64().unwrap(), 1.0);
}

#[test]
fn command_detect_short_tirs_truth() {
    // 4-8 bp TIRs pick up shorter, spurious pairs on random flanks
    let json = run_json(&[
        "tests/fasta/synthetic.fa",
        "--tir-min",
        "4",
        "--truth",
        "tests/fasta/synthetic_truth.json",
    ]);

    let report = &json["validation"];
    assert_eq!(report["num_detected"], 3);
    assert_eq!(report["true_positives"], 1);
    assert_relative_eq!(report["precision"].as_f64().unwrap(), 1.0 / 3.0);
    assert_relative_eq!(report["recall"].as_f64().unwrap(), 1.0 / 3.0);
}

#[test]
fn command_detect_parallel() {
    let serial = run_json(&["tests/fasta/synthetic.fa"]);
    let parallel = run_json(&["tests/fasta/synthetic.fa", "--parallel", "3"]);
    assert_eq!(serial, parallel);
}

#[test]
fn command_detect_tsv() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tefind")?;
    let output = cmd
        .arg("detect")
        .arg("tests/fasta/te.fa")
        .arg("--format")
        .arg("tsv")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.lines().next().unwrap().starts_with("#id\tstart"));
    assert!(stdout.contains("1\t0\t51\t52\t8\tACGTACGT\thigh\tGGCCAATT\tAATTGGCC"));

    Ok(())
}

#[test]
fn command_detect_outfile() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let output_file = temp_dir.path().join("detection.json");

    let mut cmd = Command::cargo_bin("tefind")?;
    cmd.arg("detect")
        .arg("tests/fasta/te.fa")
        .arg("-o")
        .arg(&output_file)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_file)?;
    let json: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(json["num_detected"], 1);

    Ok(())
}

#[test]
fn command_detect_missing_truth() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tefind")?;
    let output = cmd
        .arg("detect")
        .arg("tests/fasta/te.fa")
        .arg("--truth")
        .arg("tests/fasta/no_such_truth.json")
        .output()?;

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("skipping validation"));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["num_detected"], 1);
    assert!(json.get("validation").is_none());

    Ok(())
}

#[test]
fn command_detect_missing_input() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tefind")?;
    cmd.arg("detect")
        .arg("tests/fasta/no_such.fa")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input not found"));

    Ok(())
}

#[test]
fn command_detect_invalid_symbol() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tefind")?;
    cmd.arg("detect")
        .arg("tests/fasta/invalid.fa")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid nucleotide symbol 'X' at position 4"));

    Ok(())
}

#[test]
fn command_detect_invalid_params() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("tefind")?;
    cmd.arg("detect")
        .arg("tests/fasta/te.fa")
        .arg("--tir-min")
        .arg("9")
        .arg("--tir-max")
        .arg("8")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid parameters"));

    Ok(())
}

#[test]
fn command_detect_invalid_timeout() -> anyhow::Result<()> {
    for timeout in ["--timeout=1e30", "--timeout=-1", "--timeout=NaN"] {
        let mut cmd = Command::cargo_bin("tefind")?;
        cmd.arg("detect")
            .arg("tests/fasta/te.fa")
            .arg(timeout)
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid timeout"));
    }

    let mut cmd = Command::cargo_bin("tefind")?;
    cmd.arg("detect")
        .arg("tests/fasta/te.fa")
        .arg("--timeout")
        .arg("600")
        .assert()
        .success();

    Ok(())
}
