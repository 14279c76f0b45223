use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with plain output in UTC
fn nexstep_cmd(db_arg: &str) -> Command {
    let mut cmd = Command::cargo_bin("nexstep").expect("Failed to find nexstep binary");
    cmd.args(["--no-color", "--time-zone", "UTC", "--database-file", db_arg]);
    cmd
}

/// Extract the ID from "Created ... with ID: N" output
fn extract_id_from_output(output: &str) -> String {
    output
        .lines()
        .find_map(|line| line.split("with ID: ").nth(1))
        .map(|id| id.trim().to_string())
        .expect("Output should contain a created ID")
}

fn run(db_arg: &str, args: &[&str]) -> String {
    let output = nexstep_cmd(db_arg)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).expect("Invalid UTF-8")
}

/// Creates an upcoming trip that departed on 2020-01-01 with one activity
/// and returns (trip id, activity id).
fn seed_past_trip(db_arg: &str) -> (String, String) {
    let trip_id = extract_id_from_output(&run(
        db_arg,
        &["trip", "create", "Ada Lovelace", "Lisbon", "--status", "upcoming"],
    ));
    run(db_arg, &["flight", "add", &trip_id, "departure", "2020-01-01"]);
    let day_id = extract_id_from_output(&run(
        db_arg,
        &["day", "add", &trip_id, "1", "--title", "Arrival"],
    ));
    let activity_id = extract_id_from_output(&run(
        db_arg,
        &["activity", "add", &day_id, "09:00", "Castle", "--location", "Alfama"],
    ));
    (trip_id, activity_id)
}

#[test]
fn test_cli_create_trip_success() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    nexstep_cmd(db_path.to_str().unwrap())
        .args(["trip", "create", "Ada Lovelace", "Lisbon", "--dates", "12-15 May"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created trip with ID:"))
        .stdout(predicate::str::contains("Ada Lovelace: Lisbon"));
}

#[test]
fn test_cli_list_empty_trips() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    nexstep_cmd(db_path.to_str().unwrap())
        .args(["trip", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No trips found."));
}

#[test]
fn test_cli_list_trips_by_status() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    run(db_arg, &["trip", "create", "Ada Lovelace", "Lisbon"]);
    run(
        db_arg,
        &["trip", "create", "Grace Hopper", "Kyoto", "--status", "active"],
    );

    nexstep_cmd(db_arg)
        .args(["trip", "list", "--status", "active"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Grace Hopper"))
        .stdout(predicate::str::contains("Ada Lovelace").not());

    // No subcommand lists every trip
    nexstep_cmd(db_arg)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Trips"))
        .stdout(predicate::str::contains("Ada Lovelace"));
}

#[test]
fn test_cli_show_trip() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let (trip_id, _) = seed_past_trip(db_arg);
    run(
        db_arg,
        &["hotel", "add", &trip_id, "Hotel Avenida", "2020-01-01", "2020-01-03"],
    );

    nexstep_cmd(db_arg)
        .args(["trip", "show", &trip_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Castle"))
        .stdout(predicate::str::contains("Hotel Avenida"))
        .stdout(predicate::str::contains("2020-01-01"));
}

#[test]
fn test_cli_show_missing_trip_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    nexstep_cmd(db_path.to_str().unwrap())
        .args(["trip", "show", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Trip with ID 99 not found"));
}

#[test]
fn test_cli_timeline_of_past_trip_is_completed() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let (trip_id, _) = seed_past_trip(db_arg);

    nexstep_cmd(db_arg)
        .args(["timeline", &trip_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Day 1: Arrival"))
        .stdout(predicate::str::contains("Castle"))
        .stdout(predicate::str::contains("Completed"));
}

#[test]
fn test_cli_timeline_without_departure_flight() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let trip_id = extract_id_from_output(&run(db_arg, &["trip", "create", "Ada", "Lisbon"]));

    nexstep_cmd(db_arg)
        .args(["timeline", &trip_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("No departure flight"));
}

#[test]
fn test_cli_refresh_moves_trip_forward() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    seed_past_trip(db_arg);

    nexstep_cmd(db_arg)
        .arg("refresh")
        .assert()
        .success()
        .stdout(predicate::str::contains("moved from upcoming to active"));

    nexstep_cmd(db_arg)
        .arg("refresh")
        .assert()
        .success()
        .stdout(predicate::str::contains("moved from active to completed"));

    nexstep_cmd(db_arg)
        .arg("refresh")
        .assert()
        .success()
        .stdout(predicate::str::contains("All trip statuses are up to date."));
}

#[test]
fn test_cli_delete_trip_requires_confirmation() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let trip_id = extract_id_from_output(&run(db_arg, &["trip", "create", "Ada", "Lisbon"]));

    nexstep_cmd(db_arg)
        .args(["trip", "delete", &trip_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("confirm"));

    nexstep_cmd(db_arg)
        .args(["trip", "delete", &trip_id, "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted trip"));

    nexstep_cmd(db_arg)
        .args(["trip", "show", &trip_id])
        .assert()
        .failure();
}

#[test]
fn test_cli_disruption_without_reoptimizer_marks_activity() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let (trip_id, activity_id) = seed_past_trip(db_arg);

    nexstep_cmd(db_arg)
        .args([
            "disruption",
            "report",
            &activity_id,
            "--kind",
            "weather",
            "--description",
            "Storm warning",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Notice**"));

    nexstep_cmd(db_arg)
        .args(["trip", "list", "--status", "disrupted"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Lovelace"));

    nexstep_cmd(db_arg)
        .args(["timeline", &trip_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Missed/Disrupted"));
}

#[test]
fn test_cli_activity_update_and_show() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    let (_, activity_id) = seed_past_trip(db_arg);

    nexstep_cmd(db_arg)
        .args(["activity", "update", &activity_id, "--time", "10:15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated activity with ID:"));

    nexstep_cmd(db_arg)
        .args(["activity", "show", &activity_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:15"))
        .stdout(predicate::str::contains("Alfama"));

    nexstep_cmd(db_arg)
        .args(["activity", "update", &activity_id, "--time", "25:99"])
        .assert()
        .failure();
}

#[test]
fn test_cli_unknown_time_zone_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    Command::cargo_bin("nexstep")
        .expect("Failed to find nexstep binary")
        .args([
            "--no-color",
            "--database-file",
            db_path.to_str().unwrap(),
            "--time-zone",
            "Mars/Olympus_Mons",
            "trip",
            "list",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown time zone"));
}
