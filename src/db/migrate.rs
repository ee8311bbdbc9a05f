use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Accounts, workgroups and memberships.
fn create_access_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            username  TEXT NOT NULL UNIQUE,
            admin     INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS workgroups (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS memberships (
            user_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            group_id  INTEGER NOT NULL REFERENCES workgroups(id) ON DELETE CASCADE,
            roles     TEXT NOT NULL DEFAULT '',
            disabled  INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, group_id)
        );
        "#,
    )?;
    Ok(())
}

/// Boreholes, workflow log, stratigraphies and layers.
fn create_borehole_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS boreholes (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            name               TEXT NOT NULL,
            group_id           INTEGER NOT NULL REFERENCES workgroups(id),
            published          INTEGER NOT NULL DEFAULT 0,
            total_depth        REAL,
            top_bedrock        REAL,
            lithology          INTEGER REFERENCES codelists(id),
            lithostratigraphy  INTEGER REFERENCES codelists(id),
            locked_by          INTEGER REFERENCES users(id),
            locked_at          TEXT,
            created_at         TEXT NOT NULL,
            created_by         INTEGER NOT NULL REFERENCES users(id)
        );

        CREATE TABLE IF NOT EXISTS workflows (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            borehole_id  INTEGER NOT NULL REFERENCES boreholes(id) ON DELETE CASCADE,
            role         TEXT NOT NULL CHECK(role IN ('VIEW','EDIT','CONTROL','VALID','PUBLIC')),
            started_at   TEXT,
            finished_at  TEXT,
            user_id      INTEGER NOT NULL REFERENCES users(id)
        );

        CREATE INDEX IF NOT EXISTS idx_workflows_borehole ON workflows(borehole_id, id);

        CREATE TABLE IF NOT EXISTS stratigraphies (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            borehole_id  INTEGER NOT NULL REFERENCES boreholes(id) ON DELETE CASCADE,
            kind         TEXT NOT NULL
                         CHECK(kind IN ('geology','geotechnical','casing','instrument','filling')),
            is_primary   INTEGER NOT NULL DEFAULT 0,
            name         TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_stratigraphies_primary
            ON stratigraphies(borehole_id) WHERE kind = 'geology' AND is_primary = 1;

        CREATE TABLE IF NOT EXISTS layers (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            stratigraphy_id     INTEGER NOT NULL REFERENCES stratigraphies(id) ON DELETE CASCADE,
            depth_from          REAL,
            depth_to            REAL,
            lithology           INTEGER REFERENCES codelists(id),
            lithostratigraphy   INTEGER REFERENCES codelists(id),
            chronostratigraphy  INTEGER REFERENCES codelists(id),
            description         TEXT,
            notes               TEXT,
            casing_id           INTEGER REFERENCES layers(id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_layers_profile_depth ON layers(stratigraphy_id, depth_from, id);
        "#,
    )?;
    Ok(())
}

fn create_codelists_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS codelists (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            schema  TEXT NOT NULL,
            code    TEXT NOT NULL,
            text    TEXT NOT NULL DEFAULT '',
            UNIQUE (schema, code)
        );
        "#,
    )?;
    Ok(())
}

/// Base vocabulary. The `unknown` lithology is the filler tag for closed gaps.
fn seed_codelists(conn: &Connection) -> Result<()> {
    let version = "20250301_0002_seed_codelists";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    const ENTRIES: &[(&str, &str, &str)] = &[
        ("lithology", "unknown", "Undefined lithology"),
        ("lithology", "clay", "Clay"),
        ("lithology", "silt", "Silt"),
        ("lithology", "sand", "Sand"),
        ("lithology", "gravel", "Gravel"),
        ("lithology", "moraine", "Moraine"),
        ("lithology", "marl", "Marl"),
        ("lithology", "sandstone", "Sandstone"),
        ("lithology", "limestone", "Limestone"),
        ("lithology", "granite", "Granite"),
        ("lithostratigraphy", "unknown", "Undefined lithostratigraphy"),
        ("lithostratigraphy", "quaternary_deposits", "Quaternary deposits"),
        ("lithostratigraphy", "molasse", "Molasse"),
        ("lithostratigraphy", "jura", "Jura formations"),
        ("lithostratigraphy", "crystalline", "Crystalline basement"),
        ("chronostratigraphy", "unknown", "Undefined age"),
        ("chronostratigraphy", "holocene", "Holocene"),
        ("chronostratigraphy", "pleistocene", "Pleistocene"),
        ("chronostratigraphy", "miocene", "Miocene"),
        ("chronostratigraphy", "jurassic", "Jurassic"),
    ];

    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO codelists (schema, code, text) VALUES (?1, ?2, ?3)")?;
    for (schema, code, text) in ENTRIES {
        stmt.execute([schema, code, text])?;
    }

    mark_applied(conn, version, "Seeded base codelists")?;
    success(format!("Migration applied: {} → base codelists", version));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Called by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Schema
    let fresh = !table_exists(conn, "boreholes")?;

    create_codelists_table(conn)?;
    create_access_tables(conn)?;
    create_borehole_tables(conn)?;

    if fresh {
        success("Created borehole editing schema.");
    }

    // 3) Data migrations
    seed_codelists(conn)?;

    Ok(())
}
