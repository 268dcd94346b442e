use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const FETCH_SETTINGS_FILE_NAME: &str = "oidn-fetch.toml";

/// Layout of the `oidn-fetch.toml` file.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone)]
pub struct FetchSettingsToml {
    pub release: Option<SettingsRelease>,
    pub download: Option<SettingsDownload>,
}

/// `[release]` toml section.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone)]
pub struct SettingsRelease {
    pub owner: Option<String>,
    pub repo: Option<String>,
}

/// `[download]` toml section.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone)]
pub struct SettingsDownload {
    pub strict: Option<bool>,
}

impl FetchSettingsToml {
    pub fn owner(&self) -> Option<&str> {
        self.release.as_ref().and_then(|r| r.owner.as_deref())
    }

    pub fn repo(&self) -> Option<&str> {
        self.release.as_ref().and_then(|r| r.repo.as_deref())
    }

    pub fn strict(&self) -> Option<bool> {
        self.download.as_ref().and_then(|d| d.strict)
    }
}

pub fn fetch_settings_path(work_dir: &Path) -> PathBuf {
    work_dir.join(FETCH_SETTINGS_FILE_NAME)
}

/// Loads `oidn-fetch.toml` from `work_dir`. A missing file is not an error.
pub fn load_fetch_settings(work_dir: &Path) -> Result<Option<FetchSettingsToml>> {
    let path = fetch_settings_path(work_dir);
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let settings = toml::from_str::<FetchSettingsToml>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!("Loaded settings from {}", path.display());
    Ok(Some(settings))
}
