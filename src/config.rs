use crate::database::DEFAULT_STORAGE_KEY;
use crate::error::{Result, SrsError};
use crate::models::review_session::DEFAULT_SESSION_LIMIT;
use crate::models::sm2::DEFAULT_DUE_LIMIT;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scheduler settings (srs.toml + SRS_* env overrides).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrsConfig {
    pub db_path: PathBuf,
    /// Key the whole review mapping is stored under; one per learner profile.
    pub storage_key: String,
    pub due_limit: usize,
    pub session_limit: usize,
}

impl Default for SrsConfig {
    fn default() -> Self {
        Self {
            db_path: srs_home().join("srs.db"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            due_limit: DEFAULT_DUE_LIMIT,
            session_limit: DEFAULT_SESSION_LIMIT,
        }
    }
}

impl SrsConfig {
    /// Defaults, then the TOML file (explicit path or ~/.srs/srs.toml), then SRS_* env vars.
    /// A missing file is not an error.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| srs_home().join("srs.toml"));

        Self::figment(&path)
            .merge(Env::prefixed("SRS_"))
            .extract()
            .map_err(|e| SrsError::Config(e.to_string()))
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(SrsConfig::default())).merge(Toml::file(path))
    }
}

fn srs_home() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".srs")
}
