//! Runs the `dobverify` binary against a temporary database.

use std::path::Path;
use std::process::{Command, Output};

fn dobverify(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dobverify"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env("RUST_LOG", "off")
        .env_remove("DOBVERIFY_CONFIG")
        .output()
        .expect("failed to run dobverify")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn verify_prints_verdict_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let cert = dir.path().join("asha.txt");
    std::fs::write(&cert, "Date of Birth: 12/05/1990\nIssued 01/01/2020\n").unwrap();
    let db = dir.path().join("db");

    let out = dobverify(&db, &["verify", "Asha Rao", "1990-05-12", cert.to_str().unwrap()]);

    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("VERIFIED (accuracy 100%)"), "{text}");
    assert!(text.contains("1990-05-12"), "{text}");
}

#[test]
fn mismatch_still_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let cert = dir.path().join("cert.txt");
    std::fs::write(&cert, "13th May 1990").unwrap();

    let out = dobverify(
        &dir.path().join("db"),
        &["verify", "Asha Rao", "1990-05-12", cert.to_str().unwrap()],
    );

    assert!(out.status.success());
    assert!(stdout(&out).contains("MISMATCH (accuracy 0%)"));
}

#[test]
fn missing_certificate_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");

    let out = dobverify(
        &dir.path().join("db"),
        &["verify", "Asha Rao", "1990-05-12", missing.to_str().unwrap()],
    );

    assert!(out.status.success());
    assert!(stdout(&out).contains("UNREADABLE"));
}

#[test]
fn resubmission_reuses_stored_record() {
    let dir = tempfile::tempdir().unwrap();
    let cert = dir.path().join("cert.txt");
    std::fs::write(&cert, "DOB 12/05/1990").unwrap();
    let db = dir.path().join("db");
    let args = ["verify", "Asha Rao", "1990-05-12", cert.to_str().unwrap()];

    let first = dobverify(&db, &args);
    let second = dobverify(&db, &args);

    assert!(first.status.success() && second.status.success());
    assert!(!stdout(&first).contains("already submitted"));
    assert!(stdout(&second).contains("already submitted as user 1"));
}

#[test]
fn blank_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = dobverify(&dir.path().join("db"), &["verify", "  ", "1990-05-12", "x.txt"]);
    assert!(!out.status.success());
}

#[test]
fn batch_prints_summary() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    std::fs::write(&a, "DOB 12/05/1990").unwrap();
    std::fs::write(&b, "nothing useful").unwrap();
    let batch = dir.path().join("batch.json");
    let body = format!(
        r#"[
            {{"name": "A", "date_of_birth": "1990-05-12", "dob_cert": {a:?}}},
            {{"name": "B", "date_of_birth": "1990-05-12", "dob_cert": {b:?}}},
            {{"name": "", "date_of_birth": "1990-05-12", "dob_cert": "c.txt"}}
        ]"#,
        a = a.to_str().unwrap(),
        b = b.to_str().unwrap(),
    );
    std::fs::write(&batch, body).unwrap();

    let out = dobverify(&dir.path().join("db"), &["batch", batch.to_str().unwrap()]);

    assert!(out.status.success());
    assert!(stdout(&out).contains("verified=1 mismatch=0 unreadable=1 rejected=1"));
}

#[test]
fn extract_prints_date() {
    let dir = tempfile::tempdir().unwrap();
    let cert = dir.path().join("cert.txt");
    std::fs::write(&cert, "Born on 3rd March 1975").unwrap();

    let out = dobverify(&dir.path().join("db"), &["extract", cert.to_str().unwrap()]);

    assert!(out.status.success());
    assert!(stdout(&out).contains("1975-03-03"));
}
