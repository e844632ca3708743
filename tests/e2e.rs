use std::process::Command;

fn run(fixture: &str) -> (String, String, bool) {
    let path = format!("tests/fixtures/{fixture}");
    let output = Command::new(env!("CARGO_BIN_EXE_credit-ledger"))
        .arg(&path)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn valid_awards() {
    let (stdout, stderr, success) = run("valid.csv");

    assert!(success);
    assert!(stderr.is_empty());

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "user,total_credits,total_events");
    // u1: 100 enrollment + floor(150 * 0.20) = 30 bonus.
    assert_eq!(lines[1], "u1,130,2");
    // u2: 150 enrollment + 40 social post.
    assert_eq!(lines[2], "u2,190,2");
    assert_eq!(lines.len(), 3);
}

#[test]
fn bad_rows_warn_but_do_not_block() {
    let (stdout, stderr, success) = run("with_errors.csv");

    assert!(success);
    // Row-level csv errors.
    assert!(stderr.contains("unknown action type"));
    assert!(stderr.contains("missing credits"));
    // Ledger rejections.
    assert!(stderr.contains("must be non-negative"));
    assert!(stderr.contains("cannot refer themselves"));
    assert!(stderr.contains("has no ledger history"));

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "user,total_credits,total_events");
    // u1: clean enrollment plus the bonus from u2's referred enrollment; every
    // bad row was skipped without creating events.
    assert_eq!(lines[1], "u1,130,2");
    assert_eq!(lines[2], "u2,150,1");
    // u3's request was rejected outright (unknown referrer), so no row for u3.
    assert_eq!(lines.len(), 3);
}
