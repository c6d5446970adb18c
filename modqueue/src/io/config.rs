//! modqueue configuration stored under `.modqueue/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// modqueue configuration (TOML).
///
/// This file is intended to be edited by humans. Missing fields default to
/// values that work against a local instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModqueueConfig {
    /// Base URL of the instance serving the report API.
    pub instance_url: String,

    /// Page size for every list request.
    pub fetch_limit: u32,

    /// Per-request timeout for the HTTP transport, in seconds.
    pub request_timeout_secs: u64,

    pub session: SessionConfig,
}

/// Who is looking at the reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Session token. Usually supplied via `--auth` / `MODQUEUE_AUTH` instead.
    pub auth: Option<String>,
    pub person_name: Option<String>,
    /// Admins also see private-message reports.
    pub admin: bool,
    /// Site name used in the document title.
    pub site_name: Option<String>,
}

impl Default for ModqueueConfig {
    fn default() -> Self {
        Self {
            instance_url: "http://localhost:8536".to_string(),
            fetch_limit: 20,
            request_timeout_secs: 30,
            session: SessionConfig::default(),
        }
    }
}

impl ModqueueConfig {
    pub fn validate(&self) -> Result<()> {
        if self.instance_url.trim().is_empty() {
            return Err(anyhow!("instance_url must be non-empty"));
        }
        if self.fetch_limit == 0 {
            return Err(anyhow!("fetch_limit must be > 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be > 0"));
        }
        Ok(())
    }

    /// Build the caller session, letting `auth_override` win over the file.
    pub fn caller_session(&self, auth_override: Option<String>) -> Session {
        let auth = auth_override
            .or_else(|| self.session.auth.clone())
            .filter(|token| !token.trim().is_empty());
        Session {
            auth,
            person_name: self.session.person_name.clone(),
            admin: self.session.admin,
        }
    }

    pub fn site_name(&self) -> &str {
        self.session.site_name.as_deref().unwrap_or("")
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ModqueueConfig::default()`.
pub fn load_config(path: &Path) -> Result<ModqueueConfig> {
    if !path.exists() {
        let cfg = ModqueueConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ModqueueConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ModqueueConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
