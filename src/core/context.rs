use crate::config::Config;
use crate::errors::AppResult;
use crate::models::user::User;
use chrono::{DateTime, Duration, Utc};

/// Who is acting, and when. Every core entry point receives one.
#[derive(Debug, Clone)]
pub struct EditContext {
    pub user: User,
    pub now: DateTime<Utc>,
    pub lock_timeout: Duration,
    /// Lithology code used to tag layers that fill a gap.
    pub unknown_lithology_code: String,
}

impl EditContext {
    pub fn new(user: User, cfg: &Config) -> AppResult<Self> {
        Ok(Self {
            user,
            now: Utc::now(),
            lock_timeout: cfg.lock_timeout()?,
            unknown_lithology_code: cfg.unknown_lithology_code.clone(),
        })
    }

    /// Same caller at another instant.
    pub fn at(&self, now: DateTime<Utc>) -> Self {
        Self {
            now,
            ..self.clone()
        }
    }
}
