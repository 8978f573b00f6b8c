use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_transfer_flag() {
    Command::cargo_bin("mission")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--transfer"));
}

#[test]
fn default_run_prints_a_plan() {
    Command::cargo_bin("mission")
        .unwrap()
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Trajectory Plan ==="))
        .stdout(predicate::str::contains("Total delta-v"));
}

#[test]
fn lambert_run_honours_flight_time() {
    Command::cargo_bin("mission")
        .unwrap()
        .args(["--transfer", "lambert", "--flight-time", "72"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lambert"))
        .stdout(predicate::str::contains("72.0 h"));
}

#[test]
fn bad_flight_time_fails_with_a_readable_message() {
    Command::cargo_bin("mission")
        .unwrap()
        .args(["--flight-time", "0.01", "--transfer", "lambert"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mission time"));
}

#[test]
fn waypoints_export_writes_a_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("waypoints.csv");
    Command::cargo_bin("mission")
        .unwrap()
        .args(["--waypoints", path.to_str().unwrap()])
        .assert()
        .success();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("index,x_km,y_km,z_km"));
    assert!(contents.lines().count() > 10);
}
