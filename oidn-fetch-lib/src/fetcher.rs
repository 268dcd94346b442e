use crate::archive::extract_archive;
use crate::config::Config;
use crate::download_client::{DownloadProgress, ReleaseClient};
use crate::error::FetchError;
use crate::github::{GitHubRelease, ReleaseAsset};
use crate::platform::PlatformTag;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;

const FOLDER_SUFFIX: &str = ".tar.gz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The target folder existed, nothing was downloaded
    AlreadyPresent,
    Downloaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub folder_name: String,
    pub status: FetchStatus,
    /// Top-level directories produced by extraction, empty when skipped.
    pub extracted_dirs: BTreeSet<String>,
    pub progress: Option<DownloadProgress>,
}

/// Name of the folder an asset is expected to unpack into.
pub fn folder_name_for(asset_name: &str) -> &str {
    asset_name.strip_suffix(FOLDER_SUFFIX).unwrap_or(asset_name)
}

/// Picks the asset for `os`, failing when the OS has no platform tag or the
/// release carries nothing for it.
pub fn select_asset<'a>(release: &'a GitHubRelease, os: &str) -> Result<&'a ReleaseAsset> {
    let tag =
        PlatformTag::from_os(os).ok_or_else(|| FetchError::UnsupportedPlatform(os.to_string()))?;
    release.find_platform_asset(tag).ok_or_else(|| {
        FetchError::NoPlatformAsset {
            tag: tag.to_string(),
            release: release.tag_name.clone(),
        }
        .into()
    })
}

/// Resolves the latest release, downloads the platform asset into the
/// working directory, unpacks it there and removes the archive.
pub async fn fetch_latest<C: ReleaseClient>(config: &Config, client: &C) -> Result<FetchOutcome> {
    // 1. Resolve release
    let release = client
        .latest_release(&config.owner, &config.repo)
        .await
        .with_context(|| format!("Failed to fetch {}", config.latest_release_url()))?;

    // 2. Pick asset
    let asset = select_asset(&release, &config.os)?;
    let folder_name = folder_name_for(&asset.name).to_string();
    tracing::debug!("Selected asset {} from {}", asset.name, release.tag_name);

    // 3. Skip when already unpacked
    if config.work_dir.join(&folder_name).is_dir() {
        tracing::info!("{} already exists, skipping download", folder_name);
        return Ok(FetchOutcome {
            folder_name,
            status: FetchStatus::AlreadyPresent,
            extracted_dirs: BTreeSet::new(),
            progress: None,
        });
    }

    // 4. Download
    let archive_path = config.work_dir.join(&asset.name);
    let progress = client.download_asset(asset, &archive_path).await?;
    if config.strict && !progress.is_complete() {
        return Err(FetchError::IncompleteDownload {
            file: archive_path,
            expected: progress.bytes_expected,
            received: progress.bytes_received,
        }
        .into());
    }

    // 5. Extract
    let extracted_dirs = extract_archive(&archive_path, &config.work_dir)?;

    // 6. Clean up
    fs::remove_file(&archive_path)
        .with_context(|| format!("Failed to remove {}", archive_path.display()))?;

    Ok(FetchOutcome {
        folder_name,
        status: FetchStatus::Downloaded,
        extracted_dirs,
        progress: Some(progress),
    })
}
