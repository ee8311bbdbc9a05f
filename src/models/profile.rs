use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ProfileKind {
    Geology,
    Geotechnical,
    Casing,
    Instrument,
    Filling,
}

impl ProfileKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ProfileKind::Geology => "geology",
            ProfileKind::Geotechnical => "geotechnical",
            ProfileKind::Casing => "casing",
            ProfileKind::Instrument => "instrument",
            ProfileKind::Filling => "filling",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "geology" => Some(ProfileKind::Geology),
            "geotechnical" => Some(ProfileKind::Geotechnical),
            "casing" => Some(ProfileKind::Casing),
            "instrument" => Some(ProfileKind::Instrument),
            "filling" => Some(ProfileKind::Filling),
            _ => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        ProfileKind::from_db_str(&code.trim().to_lowercase())
    }
}

/// A stratigraphy: one kinded collection of layers under a borehole.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i64,
    pub borehole_id: i64,
    pub kind: ProfileKind,
    pub primary: bool,
    pub name: Option<String>,
}
