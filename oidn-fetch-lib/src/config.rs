use crate::fetch_settings::load_fetch_settings;
use crate::github::latest_release_url;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_OWNER: &str = "OpenImageDenoise";
pub const DEFAULT_REPO: &str = "oidn";
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the archive is downloaded to and extracted into
    pub work_dir: PathBuf,

    /// Owner of the GitHub repository whose releases are fetched
    pub owner: String,

    /// Name of the GitHub repository whose releases are fetched
    pub repo: String,

    /// Platform-specific operating system string.
    pub os: String,

    /// Base URL of the GitHub REST API.
    pub api_base_url: String,

    pub user_agent: String,

    /// Fail instead of extracting when fewer bytes arrive than advertised
    pub strict: bool,
}

/// Values given on the command line. `None` falls through to the
/// `oidn-fetch.toml` file, then to the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub strict: Option<bool>,
}

impl Config {
    pub fn new_for_dir(work_dir: &Path) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            os: std::env::consts::OS.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: format!("oidn-fetch/{}", env!("CARGO_PKG_VERSION")),
            strict: false,
        }
    }

    /// Builds a Config for the given working directory (current directory
    /// when `None`), layering `oidn-fetch.toml` and then `overrides` on top
    /// of the defaults. Nothing is written to disk.
    pub fn load(work_dir: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let work_dir = match work_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        let mut config = Self::new_for_dir(&work_dir);

        if let Some(settings) = load_fetch_settings(&work_dir)? {
            if let Some(owner) = settings.owner() {
                config.owner = owner.to_string();
            }
            if let Some(repo) = settings.repo() {
                config.repo = repo.to_string();
            }
            if let Some(strict) = settings.strict() {
                config.strict = strict;
            }
        }

        if let Some(owner) = overrides.owner {
            config.owner = owner;
        }
        if let Some(repo) = overrides.repo {
            config.repo = repo;
        }
        if let Some(strict) = overrides.strict {
            config.strict = strict;
        }

        Ok(config)
    }

    /// Like [Self::load], and makes sure the working directory exists.
    pub fn setup(work_dir: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let config = Self::load(work_dir, overrides)?;
        std::fs::create_dir_all(&config.work_dir).with_context(|| {
            format!(
                "Failed to create working directory {}",
                config.work_dir.display()
            )
        })?;

        Ok(config)
    }

    pub fn latest_release_url(&self) -> String {
        latest_release_url(&self.api_base_url, &self.owner, &self.repo)
    }
}
