use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::BackoffPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of counted attempts per run (including the first).
    pub max_attempts: u32,
    /// Backoff after the first failure, in seconds.
    pub initial_backoff_secs: f64,
    /// Added to the backoff for each further failure, in seconds.
    pub backoff_step_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_secs: 5.0,
            backoff_step_secs: 20.0,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: self.max_attempts.max(1),
            initial: secs(self.initial_backoff_secs),
            step: secs(self.backoff_step_secs),
        }
    }
}

/// Pagination for sources that serve results in pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    pub total_items: u64,
    pub page_size: u64,
}

/// One external endpoint. Expands into one job per page (or a single job).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// URL template; `{start}` and `{count}` are substituted per page.
    pub url: String,
    /// JSON pointer (RFC 6901) to the array of records; empty = whole document.
    #[serde(default)]
    pub items_pointer: String,
    /// Minimum time between two runs of the same job.
    #[serde(default = "default_job_cooldown_secs")]
    pub job_cooldown_secs: f64,
    /// Overrides `[retry].max_attempts` for this source.
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Wait applied on 429/503 when the server sends no usable Retry-After.
    #[serde(default = "default_overload_delay_secs")]
    pub overload_delay_secs: u64,
    /// Treat an empty record array as malformed content.
    #[serde(default)]
    pub reject_empty: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Responses larger than this fail the attempt.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub pages: Option<PageConfig>,
}

/// A rate-limited group of sources sharing one cooldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    /// Minimum time between two selections from this group.
    #[serde(default = "default_group_delay_secs")]
    pub group_delay_secs: f64,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Global configuration loaded from `~/.config/pacer/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacerConfig {
    /// How often the scheduler re-scans while nothing is runnable.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// SQLite file for run records; defaults to `~/.local/state/pacer/runs.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

fn default_enabled() -> bool {
    true
}

fn default_job_cooldown_secs() -> f64 {
    4.0
}

fn default_overload_delay_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    crate::sources::DEFAULT_MAX_BODY_BYTES
}

fn default_group_delay_secs() -> f64 {
    2.0
}

fn default_poll_interval_ms() -> u64 {
    100
}

/// Seconds from config to Duration. Values too large to represent saturate,
/// so an oversized cooldown keeps pacing instead of disappearing.
/// `validate` rejects anything this would have to clamp.
fn secs(value: f64) -> Duration {
    match Duration::try_from_secs_f64(value) {
        Ok(d) => d,
        Err(_) if value > 0.0 => Duration::MAX,
        Err(_) => Duration::ZERO,
    }
}

/// A seconds value must be finite, non-negative and representable as a Duration.
fn check_secs(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        anyhow::bail!("{} must be a finite number >= 0, got {}", field, value);
    }
    Duration::try_from_secs_f64(value)
        .map_err(|_| anyhow::anyhow!("{} is out of range: {}", field, value))?;
    Ok(())
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            database_path: None,
            retry: None,
            groups: Vec::new(),
        }
    }
}

impl PacerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Effective retry settings (section or built-in defaults).
    pub fn retry(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }

    /// Backoff policy for one source, honouring its `max_attempts` override.
    pub fn policy_for(&self, source: &SourceConfig) -> BackoffPolicy {
        let policy = self.retry().policy();
        match source.max_attempts {
            Some(n) => policy.with_max_attempts(n),
            None => policy,
        }
    }

    /// Reject settings the scheduler or adapters cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be > 0");
        }
        let retry = self.retry();
        if retry.max_attempts == 0 {
            anyhow::bail!("[retry] max_attempts must be >= 1");
        }
        check_secs("[retry] initial_backoff_secs", retry.initial_backoff_secs)?;
        check_secs("[retry] backoff_step_secs", retry.backoff_step_secs)?;

        let mut names = HashSet::new();
        for group in &self.groups {
            check_secs("group_delay_secs", group.group_delay_secs)
                .with_context(|| format!("group '{}'", group.name))?;
            for source in &group.sources {
                if !names.insert(source.name.as_str()) {
                    anyhow::bail!("duplicate source name '{}'", source.name);
                }
                source
                    .validate()
                    .with_context(|| format!("source '{}' in group '{}'", source.name, group.name))?;
            }
        }
        Ok(())
    }
}

impl GroupConfig {
    pub fn group_delay(&self) -> Duration {
        secs(self.group_delay_secs)
    }
}

impl SourceConfig {
    pub fn job_cooldown(&self) -> Duration {
        secs(self.job_cooldown_secs)
    }

    pub fn overload_delay(&self) -> Duration {
        Duration::from_secs(self.overload_delay_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    fn validate(&self) -> Result<()> {
        if self.max_attempts == Some(0) {
            anyhow::bail!("max_attempts must be >= 1");
        }
        check_secs("job_cooldown_secs", self.job_cooldown_secs)?;
        if self.max_body_bytes == 0 {
            anyhow::bail!("max_body_bytes must be > 0");
        }
        if let Some(pages) = self.pages {
            if pages.page_size == 0 {
                anyhow::bail!("pages.page_size must be > 0");
            }
        }
        if !self.items_pointer.is_empty() && !self.items_pointer.starts_with('/') {
            anyhow::bail!("items_pointer must be empty or start with '/'");
        }
        let sample = self.url.replace("{start}", "0").replace("{count}", "1");
        url::Url::parse(&sample).with_context(|| format!("invalid url: {}", self.url))?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pacer")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Default SQLite location: `~/.local/state/pacer/runs.db`.
pub fn default_database_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pacer")?;
    Ok(xdg_dirs.place_state_file("runs.db")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PacerConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PacerConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<PacerConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: PacerConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config: {}", path.display()))?;
    tracing::debug!("loaded config file: {}", path.display());
    Ok(cfg)
}
