use crate::config::Config;
use crate::download_client::{DownloadProgress, ReleaseClient, write_stream_to_file};
use crate::error::FetchError;
use crate::logging::{progress_bar_style, spinner_style};
use crate::platform::PlatformTag;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// A GitHub release. Does not contain all fields.
///
/// See the GitHub [docs](https://docs.github.com/en/rest/releases/releases#get-the-latest-release)
/// for the full response.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub assets: Vec<ReleaseAsset>,
}

/// A release's asset. Does not contain all fields.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

impl GitHubRelease {
    /// First asset, in listing order, whose name contains the platform tag.
    pub fn find_platform_asset(&self, tag: PlatformTag) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|asset| tag.matches(&asset.name))
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.tag_name)
    }
}

pub fn latest_release_url(api_base_url: &str, owner: &str, repo: &str) -> String {
    format!(
        "{}/repos/{}/{}/releases/latest",
        api_base_url.trim_end_matches('/'),
        owner,
        repo
    )
}

pub struct GitHubClient {
    config: Config,
    client: Client,
}

impl ReleaseClient for GitHubClient {
    #[instrument(skip(self))]
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<GitHubRelease> {
        let current_span = tracing::Span::current();
        current_span.pb_set_style(&spinner_style("{msg}")?);
        current_span.pb_set_message(&format!("Fetching latest release of {owner}/{repo}..."));
        current_span.pb_set_finish_message(&format!(
            "Fetching latest release of {owner}/{repo}... Done"
        ));

        let url = latest_release_url(&self.config.api_base_url, owner, repo);
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .with_context(|| format!("Failed to reach {url}"))?;

        if !response.status().is_success() {
            return Err(FetchError::ApiStatus {
                url,
                status: response.status(),
            }
            .into());
        }

        let release: GitHubRelease = response
            .json()
            .await
            .context("Failed to parse release from GitHub API response")?;
        tracing::debug!(
            "Latest release {} has {} assets",
            release.tag_name,
            release.assets.len()
        );
        Ok(release)
    }

    #[instrument(skip_all)]
    async fn download_asset(&self, asset: &ReleaseAsset, path: &Path) -> Result<DownloadProgress> {
        let current_span = tracing::Span::current();
        current_span.pb_set_style(&progress_bar_style()?);
        current_span.pb_set_message(&format!("Downloading {}...", asset.name));
        current_span.pb_set_finish_message(&format!("Downloading {}... Complete!", asset.name));

        let response = self
            .client
            .get(&asset.browser_download_url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", asset.browser_download_url))?;

        if !response.status().is_success() {
            return Err(FetchError::DownloadStatus {
                url: asset.browser_download_url.clone(),
                status: response.status(),
            }
            .into());
        }

        let bytes_expected = response.content_length().unwrap_or(0);
        current_span.pb_set_length(if bytes_expected > 0 {
            bytes_expected
        } else {
            asset.size
        });

        write_stream_to_file(response.bytes_stream(), bytes_expected, path).await
    }
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            config: config.clone(),
            client,
        })
    }
}
