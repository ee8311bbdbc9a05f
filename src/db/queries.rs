use crate::db::query_builder::QueryBuilder;
use crate::errors::{AppError, AppResult};
use crate::models::borehole::{Borehole, Lock};
use crate::models::layer::Layer;
use crate::models::profile::{Profile, ProfileKind};
use crate::models::role::Role;
use crate::models::user::{Membership, User};
use crate::models::workflow::{WorkflowEntry, WorkflowLog};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

pub fn ts_to_db(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_error(0, AppError::InvalidValue(format!("timestamp '{raw}'"))))
}

fn parse_opt_ts(raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    raw.as_deref().map(parse_ts).transpose()
}

// ---------------------------------------------------------------------------
// Users / workgroups
// ---------------------------------------------------------------------------

pub fn insert_user(conn: &Connection, username: &str, admin: bool) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO users (username, admin) VALUES (?1, ?2)",
        params![username, admin],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_group(conn: &Connection, name: &str) -> AppResult<i64> {
    conn.execute("INSERT INTO workgroups (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn find_group_id(conn: &Connection, name: &str) -> AppResult<i64> {
    conn.query_row("SELECT id FROM workgroups WHERE name = ?1", [name], |r| {
        r.get(0)
    })
    .optional()?
    .ok_or_else(|| AppError::NotFound(format!("workgroup '{name}'")))
}

pub fn upsert_membership(conn: &Connection, user_id: i64, m: &Membership) -> AppResult<()> {
    conn.execute(
        "INSERT INTO memberships (user_id, group_id, roles, disabled)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id, group_id) DO UPDATE
            SET roles = excluded.roles, disabled = excluded.disabled",
        params![
            user_id,
            m.group_id,
            Role::list_to_db_str(&m.roles),
            m.disabled
        ],
    )?;
    Ok(())
}

fn map_membership(row: &Row) -> Result<Membership> {
    let raw: String = row.get("roles")?;
    let roles = Role::list_from_db_str(&raw)
        .ok_or_else(|| conversion_error(0, AppError::InvalidRole(raw.clone())))?;

    Ok(Membership {
        group_id: row.get("group_id")?,
        roles,
        disabled: row.get("disabled")?,
    })
}

fn load_memberships(conn: &Connection, user_id: i64) -> AppResult<Vec<Membership>> {
    let mut stmt = conn.prepare(
        "SELECT group_id, roles, disabled FROM memberships
         WHERE user_id = ?1
         ORDER BY group_id ASC",
    )?;
    let rows = stmt.query_map([user_id], map_membership)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_user_by_name(conn: &Connection, username: &str) -> AppResult<User> {
    let row: Option<(i64, bool)> = conn
        .query_row(
            "SELECT id, admin FROM users WHERE username = ?1",
            [username],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;

    let (id, admin) = row.ok_or_else(|| AppError::NotFound(format!("user '{username}'")))?;

    Ok(User {
        id,
        username: username.to_string(),
        admin,
        memberships: load_memberships(conn, id)?,
    })
}

// ---------------------------------------------------------------------------
// Boreholes
// ---------------------------------------------------------------------------

const BOREHOLE_COLUMNS: &str = "id, name, group_id, published, total_depth, top_bedrock,
     lithology, lithostratigraphy, locked_by, locked_at, created_at, created_by";

pub fn map_borehole(row: &Row) -> Result<Borehole> {
    let locked_by: Option<i64> = row.get("locked_by")?;
    let locked_at = parse_opt_ts(row.get("locked_at")?)?;
    let lock = match (locked_by, locked_at) {
        (Some(holder), Some(acquired_at)) => Some(Lock {
            holder,
            acquired_at,
        }),
        _ => None,
    };

    let created_raw: String = row.get("created_at")?;

    Ok(Borehole {
        id: row.get("id")?,
        name: row.get("name")?,
        group_id: row.get("group_id")?,
        published: row.get("published")?,
        total_depth: row.get("total_depth")?,
        top_bedrock: row.get("top_bedrock")?,
        lithology: row.get("lithology")?,
        lithostratigraphy: row.get("lithostratigraphy")?,
        lock,
        created_at: parse_ts(&created_raw)?,
        created_by: row.get("created_by")?,
    })
}

pub fn insert_borehole(
    conn: &Connection,
    name: &str,
    group_id: i64,
    created_by: i64,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO boreholes (name, group_id, created_at, created_by)
         VALUES (?1, ?2, ?3, ?4)",
        params![name, group_id, ts_to_db(now), created_by],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_borehole(conn: &Connection, id: i64) -> AppResult<Borehole> {
    conn.query_row(
        &format!("SELECT {BOREHOLE_COLUMNS} FROM boreholes WHERE id = ?1"),
        [id],
        map_borehole,
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound(format!("borehole {id}")))
}

/// Boreholes matching an already-built filter, ordered by id.
pub fn list_boreholes(conn: &Connection, mut filter: QueryBuilder) -> AppResult<Vec<Borehole>> {
    filter.push_sql(" ORDER BY id ASC");
    let (sql, args) = filter.build();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), map_borehole)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn borehole_select() -> QueryBuilder {
    QueryBuilder::new(&format!("SELECT {BOREHOLE_COLUMNS} FROM boreholes"))
}

pub fn set_lock(conn: &Connection, borehole_id: i64, lock: Option<Lock>) -> AppResult<()> {
    conn.execute(
        "UPDATE boreholes SET locked_by = ?1, locked_at = ?2 WHERE id = ?3",
        params![
            lock.map(|l| l.holder),
            lock.map(|l| ts_to_db(l.acquired_at)),
            borehole_id
        ],
    )?;
    Ok(())
}

pub fn set_published(conn: &Connection, borehole_id: i64, published: bool) -> AppResult<()> {
    conn.execute(
        "UPDATE boreholes SET published = ?1 WHERE id = ?2",
        params![published, borehole_id],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Workflow log
// ---------------------------------------------------------------------------

pub fn map_workflow(row: &Row) -> Result<WorkflowEntry> {
    let raw: String = row.get("role")?;
    let role =
        Role::from_db_str(&raw).ok_or_else(|| conversion_error(0, AppError::InvalidRole(raw)))?;

    Ok(WorkflowEntry {
        id: row.get("id")?,
        borehole_id: row.get("borehole_id")?,
        role,
        started_at: parse_opt_ts(row.get("started_at")?)?,
        finished_at: parse_opt_ts(row.get("finished_at")?)?,
        user_id: row.get("user_id")?,
    })
}

pub fn insert_workflow(
    conn: &Connection,
    borehole_id: i64,
    role: Role,
    user_id: i64,
    finished_at: Option<DateTime<Utc>>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO workflows (borehole_id, role, started_at, finished_at, user_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            borehole_id,
            role.to_db_str(),
            finished_at.map(ts_to_db),
            finished_at.map(ts_to_db),
            user_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_workflow(conn: &Connection, id: i64) -> AppResult<WorkflowEntry> {
    conn.query_row(
        "SELECT id, borehole_id, role, started_at, finished_at, user_id
         FROM workflows WHERE id = ?1",
        [id],
        map_workflow,
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound(format!("workflow {id}")))
}

pub fn load_workflow_log(conn: &Connection, borehole_id: i64) -> AppResult<WorkflowLog> {
    let mut stmt = conn.prepare(
        "SELECT id, borehole_id, role, started_at, finished_at, user_id
         FROM workflows
         WHERE borehole_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([borehole_id], map_workflow)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(WorkflowLog::new(out))
}

pub fn finish_workflow(
    conn: &Connection,
    id: i64,
    user_id: i64,
    now: DateTime<Utc>,
) -> AppResult<()> {
    conn.execute(
        "UPDATE workflows
         SET finished_at = ?1, user_id = ?2, started_at = COALESCE(started_at, ?1)
         WHERE id = ?3",
        params![ts_to_db(now), user_id, id],
    )?;
    Ok(())
}

pub fn start_workflow_clock(conn: &Connection, id: i64, now: DateTime<Utc>) -> AppResult<()> {
    conn.execute(
        "UPDATE workflows SET started_at = ?1 WHERE id = ?2 AND started_at IS NULL",
        params![ts_to_db(now), id],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Stratigraphies (profiles)
// ---------------------------------------------------------------------------

pub fn map_profile(row: &Row) -> Result<Profile> {
    let raw: String = row.get("kind")?;
    let kind = ProfileKind::from_db_str(&raw)
        .ok_or_else(|| conversion_error(0, AppError::InvalidValue(format!("profile kind '{raw}'"))))?;

    Ok(Profile {
        id: row.get("id")?,
        borehole_id: row.get("borehole_id")?,
        kind,
        primary: row.get("is_primary")?,
        name: row.get("name")?,
    })
}

pub fn insert_profile(
    conn: &Connection,
    borehole_id: i64,
    kind: ProfileKind,
    primary: bool,
    name: Option<&str>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO stratigraphies (borehole_id, kind, is_primary, name)
         VALUES (?1, ?2, ?3, ?4)",
        params![borehole_id, kind.to_db_str(), primary, name],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_profile(conn: &Connection, id: i64) -> AppResult<Profile> {
    conn.query_row(
        "SELECT id, borehole_id, kind, is_primary, name FROM stratigraphies WHERE id = ?1",
        [id],
        map_profile,
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound(format!("profile {id}")))
}

pub fn load_profiles(conn: &Connection, borehole_id: i64) -> AppResult<Vec<Profile>> {
    let mut stmt = conn.prepare(
        "SELECT id, borehole_id, kind, is_primary, name FROM stratigraphies
         WHERE borehole_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([borehole_id], map_profile)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Make `profile_id` the only primary geology profile of its borehole.
pub fn set_primary_profile(conn: &Connection, borehole_id: i64, profile_id: i64) -> AppResult<()> {
    conn.execute(
        "UPDATE stratigraphies SET is_primary = 0
         WHERE borehole_id = ?1 AND kind = 'geology'",
        [borehole_id],
    )?;
    conn.execute(
        "UPDATE stratigraphies SET is_primary = 1 WHERE id = ?1",
        [profile_id],
    )?;
    Ok(())
}

pub fn delete_profile(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM layers WHERE stratigraphy_id = ?1", [id])?;
    conn.execute("DELETE FROM stratigraphies WHERE id = ?1", [id])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

const LAYER_COLUMNS: &str = "id, stratigraphy_id, depth_from, depth_to, lithology,
     lithostratigraphy, chronostratigraphy, description, notes, casing_id";

pub fn map_layer(row: &Row) -> Result<Layer> {
    Ok(Layer {
        id: row.get("id")?,
        profile_id: row.get("stratigraphy_id")?,
        depth_from: row.get("depth_from")?,
        depth_to: row.get("depth_to")?,
        lithology: row.get("lithology")?,
        lithostratigraphy: row.get("lithostratigraphy")?,
        chronostratigraphy: row.get("chronostratigraphy")?,
        description: row.get("description")?,
        notes: row.get("notes")?,
        casing_id: row.get("casing_id")?,
    })
}

pub fn insert_layer(conn: &Connection, layer: &Layer) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO layers (stratigraphy_id, depth_from, depth_to, lithology,
                             lithostratigraphy, chronostratigraphy, description, notes, casing_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            layer.profile_id,
            layer.depth_from,
            layer.depth_to,
            layer.lithology,
            layer.lithostratigraphy,
            layer.chronostratigraphy,
            layer.description,
            layer.notes,
            layer.casing_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_layer(conn: &Connection, id: i64) -> AppResult<Layer> {
    conn.query_row(
        &format!("SELECT {LAYER_COLUMNS} FROM layers WHERE id = ?1"),
        [id],
        map_layer,
    )
    .optional()?
    .ok_or_else(|| AppError::NotFound(format!("layer {id}")))
}

/// Layers of a profile in profile order (depth_from nulls last, then id).
pub fn load_layers(conn: &Connection, profile_id: i64) -> AppResult<Vec<Layer>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LAYER_COLUMNS} FROM layers
         WHERE stratigraphy_id = ?1
         ORDER BY depth_from IS NULL, depth_from ASC, id ASC"
    ))?;
    let rows = stmt.query_map([profile_id], map_layer)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_layer_depth_from(conn: &Connection, id: i64, value: Option<f64>) -> AppResult<()> {
    conn.execute(
        "UPDATE layers SET depth_from = ?1 WHERE id = ?2",
        params![value, id],
    )?;
    Ok(())
}

pub fn set_layer_depth_to(conn: &Connection, id: i64, value: Option<f64>) -> AppResult<()> {
    conn.execute(
        "UPDATE layers SET depth_to = ?1 WHERE id = ?2",
        params![value, id],
    )?;
    Ok(())
}

pub fn delete_layer(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM layers WHERE id = ?1", [id])?;
    Ok(())
}
