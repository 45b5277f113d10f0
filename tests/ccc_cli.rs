//! End-to-end coverage of the `ccc` binary.
use std::io::Write;

use assert_cmd::Command;

fn write_signal_file(path: &std::path::Path, x: &[f64], y: &[f64]) {
    let mut f = std::fs::File::create(path).unwrap();
    f.write_all(&(x.len() as i32).to_le_bytes()).unwrap();
    for v in x {
        f.write_all(&v.to_le_bytes()).unwrap();
    }
    for v in y {
        f.write_all(&v.to_le_bytes()).unwrap();
    }
}

fn read_result(path: &std::path::Path, n: usize) -> Vec<f64> {
    let bytes = std::fs::read(path).unwrap();
    let start = 4 + 16 * n;
    bytes[start..start + 8 * n]
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

#[test]
fn impulse_x_produces_shifted_y() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sig.bin");
    write_signal_file(&path, &[1.0, 0.0, 0.0, 0.0], &[1.0, 2.0, 3.0, 4.0]);

    Command::cargo_bin("ccc")
        .unwrap()
        .arg(&path)
        .arg("--workers")
        .arg("2")
        .assert()
        .success();

    let r = read_result(&path, 4);
    assert_eq!(r, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn two_files_are_worker_count_independent() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    write_signal_file(&a, &[1.0, 1.0, 1.0, 1.0, 1.0], &[1.0, 2.0, 3.0, 4.0, 5.0]);
    write_signal_file(
        &b,
        &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0],
    );

    Command::cargo_bin("ccc")
        .unwrap()
        .args([&a, &b])
        .arg("--workers")
        .arg("3")
        .assert()
        .success();
    let r_a_w3 = read_result(&a, 5);
    let r_b_w3 = read_result(&b, 7);

    let a2 = dir.path().join("a2.bin");
    let b2 = dir.path().join("b2.bin");
    write_signal_file(&a2, &[1.0, 1.0, 1.0, 1.0, 1.0], &[1.0, 2.0, 3.0, 4.0, 5.0]);
    write_signal_file(
        &b2,
        &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        &[2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0],
    );
    Command::cargo_bin("ccc")
        .unwrap()
        .args([&a2, &b2])
        .arg("--workers")
        .arg("1")
        .assert()
        .success();
    let r_a_w1 = read_result(&a2, 5);
    let r_b_w1 = read_result(&b2, 7);

    assert_eq!(r_a_w3, r_a_w1);
    assert_eq!(r_b_w3, r_b_w1);
    assert_eq!(r_b_w3, vec![30.0; 7]);
}

#[test]
fn compare_mode_reports_zero_mismatches_against_itself() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sig.bin");
    write_signal_file(&path, &[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]);

    Command::cargo_bin("ccc")
        .unwrap()
        .arg(&path)
        .assert()
        .success();

    // The file now carries x, y and R[] back to back; that trailing block
    // doubles as the reference vector for a compare-mode rerun.
    Command::cargo_bin("ccc")
        .unwrap()
        .arg(&path)
        .arg("--compare")
        .assert()
        .success()
        .stdout(predicates::str::contains("mismatches: 0"));
}
