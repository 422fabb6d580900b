use assert_cmd::Command;
use predicates::prelude::*;

fn subcmd() -> Command {
    let mut cmd = Command::cargo_bin("subcmd").unwrap();
    cmd.env_remove("SUBCMD_DEBUG");
    cmd
}

#[test]
fn test_greet() {
    subcmd()
        .args(["greet", "-n", "World"])
        .assert()
        .success()
        .stdout("Hello, World!\n");
}

#[test]
fn test_greet_loud_with_long_options() {
    subcmd()
        .args(["greet", "--name", "World", "--loud"])
        .assert()
        .success()
        .stdout("HELLO, WORLD!\n");
}

#[test]
fn test_greet_twice_is_too_many() {
    subcmd()
        .args(["greet", "-n", "a", "-n", "b"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Usage: subcmd greet -n <name> [-l]"))
        .stderr(predicate::str::contains("Too many options: name"));
}

#[test]
fn test_sum() {
    subcmd()
        .args(["sum", "1", "2", "3.5"])
        .assert()
        .success()
        .stdout("6.5\n");
}

#[test]
fn test_sum_negative_numbers() {
    subcmd()
        .args(["sum", "-1.5", "4"])
        .assert()
        .success()
        .stdout("2.5\n");
}

#[test]
fn test_sum_failure_is_reported() {
    subcmd()
        .args(["sum", "1", "two"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("invalid number: two"));
}

#[test]
fn test_sum_requires_an_argument() {
    subcmd()
        .arg("sum")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Usage: subcmd sum <number>..."))
        .stderr(predicate::str::contains(
            "Not enough non-option arguments: got 0, need at least 1",
        ));
}

#[test]
fn test_inspect_prints_options() {
    subcmd()
        .args(["inspect", "-t", "a", "-t", "b", "-p", "key", "value", "-v", "rest"])
        .assert()
        .success()
        .stdout(
            r#"{"":["rest"],"pair":["key","value"],"tag":["a","b"],"verbose":true}
"#,
        );
}

#[test]
fn test_greet_rejects_positionals() {
    subcmd()
        .args(["greet", "-n", "World", "extra"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains(
            "Too many non-option arguments: got 1, maximum of 0",
        ));
}

#[test]
fn test_unknown_command() {
    subcmd()
        .arg("frobnicate")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Usage: subcmd <command> [options]"))
        .stderr(predicate::str::contains("Unknown command: frobnicate"));
}

#[test]
fn test_no_arguments_shows_help() {
    subcmd()
        .assert()
        .success()
        .stderr(predicate::str::contains("Supply <command> for more help"))
        .stderr(predicate::str::contains("Unknown command").not());
}

#[test]
fn test_version() {
    subcmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("subcmd {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_command_help() {
    subcmd()
        .args(["sum", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Add numbers"))
        .stdout(predicate::str::contains("Examples:\n  subcmd sum 1 2 3"))
        .stdout(predicate::str::contains("Prints the sum of all arguments."));
}
