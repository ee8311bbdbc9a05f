#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use boredit::config::Config;
use boredit::core::admin::AdminLogic;
use boredit::core::borehole::BoreholeLogic;
use boredit::core::context::EditContext;
use boredit::db::initialize::init_db;
use boredit::db::pool::DbPool;
use boredit::db::queries::{insert_layer, insert_profile, load_user_by_name, load_workflow_log};
use boredit::models::layer::Layer;
use boredit::models::profile::ProfileKind;
use boredit::models::role::Role;
use chrono::{DateTime, TimeZone, Utc};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn boredit() -> Command {
    cargo_bin_cmd!("boredit")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_boredit.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Fixed instant every fixture context starts at.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

pub fn ctx_for(pool: &DbPool, username: &str) -> EditContext {
    let user = load_user_by_name(&pool.conn, username).expect("load user");
    EditContext::new(user, &Config::default())
        .expect("default config")
        .at(t0())
}

/// A database with one workgroup "geo" and a borehole at the EDIT stage.
///
/// Users:
///  - `editor`, `editor2`: VIEW + EDIT in geo
///  - `controller`: VIEW + CONTROL + VALID + PUBLIC in geo
///  - `viewer`: VIEW in geo
///  - `outsider`: VIEW + EDIT in "other"
///  - `root`: admin, no memberships
pub struct Fixture {
    pub pool: DbPool,
    pub group_id: i64,
    pub other_group_id: i64,
    pub borehole_id: i64,
}

impl Fixture {
    pub fn new(name: &str) -> Self {
        let db_path = setup_test_db(name);
        let mut pool = DbPool::new(&db_path).expect("open db");
        init_db(&pool.conn).expect("init db");

        let group_id = AdminLogic::add_group(&mut pool, "geo").expect("group");
        let other_group_id = AdminLogic::add_group(&mut pool, "other").expect("group");

        for (username, admin) in [
            ("editor", false),
            ("editor2", false),
            ("controller", false),
            ("viewer", false),
            ("outsider", false),
            ("root", true),
        ] {
            AdminLogic::add_user(&mut pool, username, admin).expect("user");
        }

        let memberships: [(&str, &str, &[Role]); 5] = [
            ("editor", "geo", &[Role::View, Role::Edit]),
            ("editor2", "geo", &[Role::View, Role::Edit]),
            (
                "controller",
                "geo",
                &[Role::View, Role::Control, Role::Valid, Role::Public],
            ),
            ("viewer", "geo", &[Role::View]),
            ("outsider", "other", &[Role::View, Role::Edit]),
        ];
        for (username, group, roles) in memberships {
            AdminLogic::set_membership(&mut pool, username, group, roles, false).expect("member");
        }

        let editor = ctx_for(&pool, "editor");
        let borehole = BoreholeLogic::create(&mut pool, "BH-1", group_id, Role::Edit, false, &editor)
            .expect("borehole");

        Self {
            pool,
            group_id,
            other_group_id,
            borehole_id: borehole.id,
        }
    }

    pub fn ctx(&self, username: &str) -> EditContext {
        ctx_for(&self.pool, username)
    }

    /// Id of the last workflow entry of the fixture borehole.
    pub fn open_entry(&self) -> i64 {
        load_workflow_log(&self.pool.conn, self.borehole_id)
            .expect("workflow")
            .last()
            .map(|e| e.id)
            .expect("entry")
    }

    /// Profile inserted directly, bypassing the lock.
    pub fn add_profile(&self, kind: ProfileKind) -> i64 {
        insert_profile(&self.pool.conn, self.borehole_id, kind, false, None).expect("profile")
    }

    /// Layer inserted directly, bypassing the lock.
    pub fn add_layer(&self, profile_id: i64, from: Option<f64>, to: Option<f64>) -> i64 {
        insert_layer(&self.pool.conn, &Layer::new(0, profile_id, from, to)).expect("layer")
    }

    pub fn set_borehole_column(&self, column: &str, value: Option<f64>) {
        self.pool
            .conn
            .execute(
                &format!("UPDATE boreholes SET {column} = ?1 WHERE id = ?2"),
                rusqlite::params![value, self.borehole_id],
            )
            .expect("update borehole");
    }

    /// (id, depth_from, depth_to) of a profile in depth order.
    pub fn depths(&self, profile_id: i64) -> Vec<(i64, Option<f64>, Option<f64>)> {
        let mut stmt = self
            .pool
            .conn
            .prepare(
                "SELECT id, depth_from, depth_to FROM layers
                 WHERE stratigraphy_id = ?1
                 ORDER BY depth_from IS NULL, depth_from, id",
            )
            .expect("prepare");
        stmt.query_map([profile_id], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
            .expect("query")
            .map(|r| r.expect("row"))
            .collect()
    }
}
