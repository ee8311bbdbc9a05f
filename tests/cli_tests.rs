use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{boredit, setup_test_db};

/// init + users alice/bob (EDIT in geo), carol (CONTROL in geo), root (admin)
fn init_with_users(db_path: &str) {
    boredit()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    for args in [
        vec!["user-add", "alice"],
        vec!["user-add", "bob"],
        vec!["user-add", "carol"],
        vec!["user-add", "root", "--admin"],
        vec!["group-add", "geo"],
        vec!["member", "alice", "geo", "--roles", "VIEW,EDIT"],
        vec!["member", "bob", "geo", "--roles", "view,edit"],
        vec!["member", "carol", "geo", "--roles", "VIEW,CONTROL"],
    ] {
        boredit()
            .args(["--db", db_path])
            .args(&args)
            .assert()
            .success();
    }
}

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("cli_init");

    boredit()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    boredit()
        .args(["--db", &db_path, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_member_rejects_unknown_role() {
    let db_path = setup_test_db("cli_bad_role");
    init_with_users(&db_path);

    boredit()
        .args(["--db", &db_path, "member", "alice", "geo", "--roles", "BOSS"])
        .assert()
        .failure()
        .stderr(contains("Invalid role"));
}

#[test]
fn test_commands_need_acting_user() {
    let db_path = setup_test_db("cli_no_user");
    init_with_users(&db_path);

    boredit()
        .args(["--db", &db_path, "borehole", "list"])
        .assert()
        .failure()
        .stderr(contains("missing --user"));

    boredit()
        .args(["--db", &db_path, "-u", "mallory", "borehole", "list"])
        .assert()
        .failure()
        .stderr(contains("user 'mallory'"));
}

#[test]
fn test_edit_session_end_to_end() {
    let db_path = setup_test_db("cli_session");
    init_with_users(&db_path);

    boredit()
        .args(["--db", &db_path, "-u", "alice", "borehole", "add", "BH-1", "--group", "geo"])
        .assert()
        .success()
        .stdout(contains("Borehole 'BH-1' created with id 1"));

    boredit()
        .args(["--db", &db_path, "-u", "alice", "lock", "1"])
        .assert()
        .success()
        .stdout(contains("locked by 'alice'"));

    boredit()
        .args(["--db", &db_path, "-u", "bob", "lock", "1"])
        .assert()
        .failure()
        .stderr(contains("locked by user"));

    boredit()
        .args(["--db", &db_path, "-u", "alice", "profile", "add", "1"])
        .assert()
        .success()
        .stdout(contains("geology").and(contains("primary")));

    boredit()
        .args(["--db", &db_path, "-u", "alice", "layer", "add", "1"])
        .assert()
        .success()
        .stdout(contains("at 0.00"));

    boredit()
        .args(["--db", &db_path, "-u", "alice", "layer", "set", "1", "depth_to", "4"])
        .assert()
        .success();

    boredit()
        .args(["--db", &db_path, "-u", "alice", "layer", "add", "1"])
        .assert()
        .success()
        .stdout(contains("at 4.00"));

    boredit()
        .args(["--db", &db_path, "-u", "alice", "validate", "1"])
        .assert()
        .success()
        .stdout(contains("missing_to"));

    boredit()
        .args(["--db", &db_path, "-u", "alice", "validate", "1", "--json"])
        .assert()
        .success()
        .stdout(contains("\"missing_to\": true").and(contains("\"missing_layers\": false")));

    boredit()
        .args(["--db", &db_path, "-u", "alice", "layer", "set", "1", "colour", "red"])
        .assert()
        .failure()
        .stderr(contains("Unknown attribute"));

    boredit()
        .args(["--db", &db_path, "-u", "alice", "workflow", "submit", "1"])
        .assert()
        .success()
        .stdout(contains("current stage CONTROL"));

    // EDIT is closed: the layers are no longer alice's to change
    boredit()
        .args(["--db", &db_path, "-u", "alice", "layer", "add", "1"])
        .assert()
        .failure()
        .stderr(contains("Not authorized"));

    boredit()
        .args(["--db", &db_path, "-u", "carol", "workflow", "history", "1"])
        .assert()
        .success()
        .stdout(contains("EDIT").and(contains("CONTROL")));
}

#[test]
fn test_admin_force_unlock() {
    let db_path = setup_test_db("cli_force_unlock");
    init_with_users(&db_path);

    boredit()
        .args(["--db", &db_path, "-u", "alice", "borehole", "add", "BH-1", "--group", "geo"])
        .assert()
        .success();

    boredit()
        .args(["--db", &db_path, "-u", "alice", "lock", "1"])
        .assert()
        .success();

    boredit()
        .args(["--db", &db_path, "-u", "bob", "unlock", "1"])
        .assert()
        .failure();

    boredit()
        .args(["--db", &db_path, "-u", "root", "unlock", "1"])
        .assert()
        .success()
        .stdout(contains("unlocked"));

    boredit()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("Force-unlocked"));
}
