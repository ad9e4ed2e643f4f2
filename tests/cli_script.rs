use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("subtrack_cli").expect("binary built");
    cmd.env("SUBTRACK_HOME", home.path())
        .env("RUST_LOG", "off");
    cmd
}

fn script(home: &TempDir, input: &str) -> Command {
    let mut cmd = cli(home);
    cmd.env("SUBTRACK_CLI_SCRIPT", "1").write_stdin(input.to_string());
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let input = "\
# comments are skipped
add Netflix 15.49 monthly --category Streaming --start 2024-01-31
add Gym 120 yearly
list
summary
exit
";

    script(&home, input)
        .assert()
        .success()
        .stdout(contains("[ok] Added `Netflix`"))
        .stdout(contains("Streaming"))
        .stdout(contains("Monthly total : $25.49"))
        .stdout(contains("Annual total  : $305.88"));

    let json = std::fs::read_to_string(home.path().join("subtracker_subscriptions.json")).unwrap();
    assert!(json.contains("\"name\": \"Netflix\""));
    assert!(json.contains("\"billingCycle\": \"yearly\""));
    assert!(json.contains("\"startDate\": \"2024-01-31\""));
}

#[test]
fn failing_lines_are_reported_and_skipped() {
    let home = TempDir::new().unwrap();
    let input = "add Broken -5 monthly\nadd Weird 5 daily\nadd Fine 5 weekly\nlist\n";

    script(&home, input)
        .assert()
        .success()
        .stderr(contains("cost must not be negative"))
        .stderr(contains("daily"))
        .stdout(contains("[ok] Added `Fine`"))
        .stdout(contains("Broken").not());
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = TempDir::new().unwrap();
    script(&home, "lsit\n")
        .assert()
        .success()
        .stderr(contains("Unknown command `lsit`"))
        .stdout(contains("Did you mean `list`?"));
}

#[test]
fn one_shot_commands_share_the_saved_collection() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add", "Gym", "9", "monthly", "--category", "Fitness"])
        .assert()
        .success();

    cli(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Gym"))
        .stdout(contains("Fitness"));

    cli(&home)
        .args(["delete", "no-such-id"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Subscription not found"));
}

#[test]
fn export_writes_the_collection_file() {
    let home = TempDir::new().unwrap();
    let out = assert_fs::TempDir::new().unwrap();
    let target = out.child("export.json");
    let input = format!(
        "add Coffee 3.5 weekly --start 2024-01-01\nexport {}\n",
        target.path().display()
    );

    script(&home, &input)
        .assert()
        .success()
        .stdout(contains("Exported 1 subscription(s)"));

    target.assert(predicate::path::exists());
    target.assert(contains("\"billingCycle\": \"weekly\""));
}

#[test]
fn clear_requires_confirmation() {
    let home = TempDir::new().unwrap();
    script(&home, "add A 1 monthly\nclear\nlist\nclear --yes\nlist\n")
        .assert()
        .success()
        .stderr(contains("clear --yes"))
        .stdout(contains("Removed 1 subscription(s)"))
        .stdout(contains("No subscriptions yet."));
}

#[test]
fn backups_can_be_listed_and_restored() {
    let home = TempDir::new().unwrap();
    script(&home, "add First 1 monthly\nbackup before second\nadd Second 2 monthly\nbackups\n")
        .assert()
        .success()
        .stdout(contains("Backup created: subscriptions_"))
        .stdout(contains("_before-second.json"));

    let backups_dir = home.path().join("backups");
    let noted = std::fs::read_dir(&backups_dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .find(|name| name.ends_with("_before-second.json"))
        .expect("noted backup present");

    script(&home, &format!("restore {noted}\nlist\n"))
        .assert()
        .success()
        .stdout(contains("Restored 1 subscription(s)"))
        .stdout(contains("First"))
        .stdout(contains("Second").not());
}

#[test]
fn version_reports_package_version() {
    let home = TempDir::new().unwrap();
    let output = cli(&home).arg("version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let pattern = Regex::new(r"=== Subtrack \d+\.\d+\.\d+ ===").unwrap();
    assert!(pattern.is_match(&stdout), "unexpected version output:\n{stdout}");
}
