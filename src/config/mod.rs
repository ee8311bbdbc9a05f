use crate::errors::{AppError, AppResult};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Age after which an unrefreshed edit lock counts as abandoned.
    #[serde(default = "default_lock_timeout")]
    pub lock_timeout_minutes: i64,
    /// Lithology code tagging layers inserted to fill a gap.
    #[serde(default = "default_unknown_lithology")]
    pub unknown_lithology_code: String,
}

/// Upper bound for `lock_timeout_minutes` (thirty days).
pub const MAX_LOCK_TIMEOUT_MINUTES: i64 = 43_200;

fn default_lock_timeout() -> i64 {
    60
}
fn default_unknown_lithology() -> String {
    "unknown".to_string()
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            lock_timeout_minutes: default_lock_timeout(),
            unknown_lithology_code: default_unknown_lithology(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("boredit")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".boredit")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("boredit.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("boredit.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_yaml(&content).map_err(|e| match e {
                AppError::Config(msg) => AppError::Config(format!("{}: {}", path.display(), msg)),
                other => other,
            })
        } else {
            Ok(Config::default())
        }
    }

    /// Parse and validate a YAML configuration document.
    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config =
            serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
        cfg.lock_timeout()?;
        Ok(cfg)
    }

    /// Lock timeout as a duration; must lie in 1..=MAX_LOCK_TIMEOUT_MINUTES.
    pub fn lock_timeout(&self) -> AppResult<Duration> {
        let minutes = self.lock_timeout_minutes;
        if !(1..=MAX_LOCK_TIMEOUT_MINUTES).contains(&minutes) {
            return Err(AppError::Config(format!(
                "lock_timeout_minutes must be between 1 and {MAX_LOCK_TIMEOUT_MINUTES}, got {minutes}"
            )));
        }
        Duration::try_minutes(minutes)
            .ok_or_else(|| AppError::Config(format!("lock_timeout_minutes out of range: {minutes}")))
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = crate::utils::path::expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}
