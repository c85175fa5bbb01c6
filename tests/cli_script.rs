mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use common::temp_base;

fn script(base: &std::path::Path, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("rentbook_cli")
        .expect("binary built")
        .env("RENTBOOK_CLI_SCRIPT", "1")
        .env("RENTBOOK_HOME", base)
        .env("RUST_LOG", "off")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_runs_a_billing_month() {
    let base = temp_base();
    let input = r#"
room-add 101 12000 500
person-add "Sita Sharma" 3 9800000000 --room 101 --on 2081-01-05
as-of 2081-03
pay 101 2081-01 40 10000
overdue 101
exit
"#;

    script(&base, input)
        .success()
        .stdout(contains("Room 101 added"))
        .stdout(contains("Sita Sharma added."))
        .stdout(contains("Recorded NPR 10,000.00 for room 101 (Sita Sharma), Baisakh 2081"))
        .stdout(contains("Remaining   : NPR 3,020.00"))
        .stdout(contains("Baisakh 2081 partial, NPR 3,020.00 outstanding"))
        .stdout(contains("Asar 2081 missing"));

    let book = std::fs::read_to_string(base.join("data/books/property.json")).expect("book file");
    assert!(book.contains("\"Sita Sharma\""));
}

#[test]
fn next_period_follows_the_last_completed_month() {
    let base = temp_base();
    let input = r#"
room-add 101 12000 500
person-add "Sita Sharma" 3 9800000000 --room 101 --on 2081-01-05
pay 101 2081-01 40 13020
pay 101 next 40 13020
payments
"#;

    script(&base, input)
        .success()
        .stdout(contains("Jestha 2081"))
        .stdout(contains("2081-02"))
        .stdout(contains("page 1 of 1 (2 payments)"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let base = temp_base();
    script(&base, "room-ad 101 12000\nexit\n")
        .success()
        .stdout(contains("Unknown command `room-ad`"))
        .stdout(contains("Did you mean `room-add`?"));
}

#[test]
fn invalid_arguments_report_usage_and_keep_going() {
    let base = temp_base();
    script(&base, "room-add 101\nroom-add 102 9000\nroom-list\n")
        .success()
        .stderr(contains("missing rent"))
        .stdout(contains("usage: room-add <number> <rent> [water]"))
        .stdout(contains("102").and(contains("(vacant)")));
}

#[test]
fn pinned_period_and_income_are_persisted() {
    use assert_fs::prelude::*;

    let home = assert_fs::TempDir::new().expect("temp home");
    let input = r#"
room-add 101 12000 500
person-add "Sita Sharma" 3 9800000000 --room 101 --on 2081-01-05
as-of 2081-02
pay 101 2081-01 40 13020
income 2081 --json
"#;

    script(home.path(), input)
        .success()
        .stdout(contains("Current period pinned to Jestha 2081."))
        .stdout(contains("\"year\": 2081"));

    home.child("config/config.json")
        .assert(predicate::str::contains("\"current_period\": \"2081-02\""));
    home.child("data/books/property.json")
        .assert(predicate::path::exists());
}

#[test]
fn version_reports_the_build_commit() {
    let base = temp_base();
    script(&base, "version\n")
        .success()
        .stdout(contains(format!("Rentbook {}", env!("CARGO_PKG_VERSION"))))
        .stdout(contains("Commit      :"))
        .stdout(contains("Built on    :"));
}
