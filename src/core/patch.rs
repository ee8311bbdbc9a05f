//! Field patches: a static table from field name to storage column, value
//! kind and validator.

use crate::db::codelist::ensure_schema;
use crate::db::queries::{load_layer, load_profile};
use crate::errors::{AppError, AppResult};
use crate::models::profile::ProfileKind;
use rusqlite::{Connection, params};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Borehole,
    Layer,
}

impl Location {
    fn table(&self) -> &'static str {
        match self {
            Location::Borehole => "boreholes",
            Location::Layer => "layers",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    None,
    NonNegative,
    Required,
    /// Value must belong to the named codelist schema.
    Codelist(&'static str),
    /// Value must be a layer of a casing profile of the same borehole.
    CasingLayer,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub location: Location,
    pub column: &'static str,
    pub kind: ValueKind,
    pub validator: Validator,
}

const fn field(
    name: &'static str,
    location: Location,
    column: &'static str,
    kind: ValueKind,
    validator: Validator,
) -> FieldSpec {
    FieldSpec {
        name,
        location,
        column,
        kind,
        validator,
    }
}

pub static LAYER_FIELDS: &[FieldSpec] = &[
    field("depth_from", Location::Layer, "depth_from", ValueKind::Number, Validator::NonNegative),
    field("depth_to", Location::Layer, "depth_to", ValueKind::Number, Validator::NonNegative),
    field("lithology", Location::Layer, "lithology", ValueKind::Id, Validator::Codelist("lithology")),
    field(
        "lithostratigraphy",
        Location::Layer,
        "lithostratigraphy",
        ValueKind::Id,
        Validator::Codelist("lithostratigraphy"),
    ),
    field(
        "chronostratigraphy",
        Location::Layer,
        "chronostratigraphy",
        ValueKind::Id,
        Validator::Codelist("chronostratigraphy"),
    ),
    field("description", Location::Layer, "description", ValueKind::Text, Validator::None),
    field("notes", Location::Layer, "notes", ValueKind::Text, Validator::None),
    field("casing_id", Location::Layer, "casing_id", ValueKind::Id, Validator::CasingLayer),
];

pub static BOREHOLE_FIELDS: &[FieldSpec] = &[
    field("name", Location::Borehole, "name", ValueKind::Text, Validator::Required),
    field("total_depth", Location::Borehole, "total_depth", ValueKind::Number, Validator::NonNegative),
    field("top_bedrock", Location::Borehole, "top_bedrock", ValueKind::Number, Validator::NonNegative),
    field("lithology", Location::Borehole, "lithology", ValueKind::Id, Validator::Codelist("lithology")),
    field(
        "lithostratigraphy",
        Location::Borehole,
        "lithostratigraphy",
        ValueKind::Id,
        Validator::Codelist("lithostratigraphy"),
    ),
];

#[derive(Debug, Clone, PartialEq)]
pub enum PatchValue {
    Null,
    Number(f64),
    Text(String),
    Id(i64),
}

pub fn lookup(table: &'static [FieldSpec], name: &str) -> AppResult<&'static FieldSpec> {
    table
        .iter()
        .find(|f| f.name == name)
        .ok_or_else(|| AppError::PatchAttribute(name.to_string()))
}

impl FieldSpec {
    /// Parse CLI text into this field's kind. `null` (or empty) clears it.
    pub fn parse(&self, raw: &str) -> AppResult<PatchValue> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
            return Ok(PatchValue::Null);
        }

        let bad = || AppError::InvalidValue(format!("'{raw}' for field {}", self.name));
        match self.kind {
            ValueKind::Number => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(PatchValue::Number(n)),
                _ => Err(bad()),
            },
            ValueKind::Id => raw.parse::<i64>().map(PatchValue::Id).map_err(|_| bad()),
            ValueKind::Text => Ok(PatchValue::Text(raw.to_string())),
        }
    }

    /// `borehole_id` scopes reference checks.
    pub fn validate(&self, conn: &Connection, borehole_id: i64, value: &PatchValue) -> AppResult<()> {
        match (self.validator, value) {
            (Validator::Required, PatchValue::Null) => Err(AppError::InvalidValue(format!(
                "field {} cannot be empty",
                self.name
            ))),
            (_, PatchValue::Null) => Ok(()),
            (Validator::NonNegative, PatchValue::Number(n)) if *n < 0.0 => Err(
                AppError::InvalidValue(format!("field {} must not be negative", self.name)),
            ),
            (Validator::Codelist(schema), PatchValue::Id(id)) => ensure_schema(conn, *id, schema),
            (Validator::CasingLayer, PatchValue::Id(id)) => {
                let casing = load_layer(conn, *id)
                    .map_err(|_| AppError::NotFound(format!("casing layer {id}")))?;
                let profile = load_profile(conn, casing.profile_id)?;
                if profile.kind != ProfileKind::Casing || profile.borehole_id != borehole_id {
                    return Err(AppError::NotFound(format!(
                        "casing layer {id} in borehole {borehole_id}"
                    )));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn apply(&self, conn: &Connection, id: i64, value: &PatchValue) -> AppResult<()> {
        let sql = format!(
            "UPDATE {} SET {} = ?1 WHERE id = ?2",
            self.location.table(),
            self.column
        );
        let changed = match value {
            PatchValue::Null => conn.execute(&sql, params![Option::<i64>::None, id])?,
            PatchValue::Number(n) => conn.execute(&sql, params![n, id])?,
            PatchValue::Text(t) => conn.execute(&sql, params![t, id])?,
            PatchValue::Id(v) => conn.execute(&sql, params![v, id])?,
        };

        if changed == 0 {
            return Err(AppError::NotFound(format!("{} {id}", self.location.table())));
        }
        Ok(())
    }
}
