use crate::download_client::{DownloadProgress, ReleaseClient, write_stream_to_file};
use crate::github::{GitHubRelease, ReleaseAsset};
use crate::test_helpers::archive_builder::{TarEntry, tar_gz_bytes};
use futures_util::stream;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves a canned release and an in-memory `.tar.gz` for every asset.
pub struct MockReleaseClient {
    pub release: GitHubRelease,
    pub archive: Vec<u8>,
    /// Content length to advertise instead of the real archive size
    pub advertised_len: Option<u64>,
    downloads: AtomicUsize,
}

impl MockReleaseClient {
    pub fn new(release: GitHubRelease, archive: Vec<u8>) -> Self {
        Self {
            release,
            archive,
            advertised_len: None,
            downloads: AtomicUsize::new(0),
        }
    }

    /// A release with one asset per platform. Every download serves an
    /// archive holding the single folder `oidn-{version}.x86_64.{platform}`.
    pub fn oidn(version: &str, platform: &str) -> anyhow::Result<Self> {
        let folder = format!("oidn-{version}.x86_64.{platform}");
        let archive = tar_gz_bytes(&[
            TarEntry::dir(&format!("{folder}/")),
            TarEntry::dir(&format!("{folder}/lib/")),
            TarEntry::file(&format!("{folder}/lib/libOpenImageDenoise.so"), b"elf"),
            TarEntry::file(&format!("{folder}/README.md"), b"# Open Image Denoise"),
        ])?;
        Ok(Self::new(oidn_release(version), archive))
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

pub fn oidn_release(version: &str) -> GitHubRelease {
    let asset = |platform: &str, ext: &str| ReleaseAsset {
        name: format!("oidn-{version}.x86_64.{platform}.{ext}"),
        browser_download_url: format!("https://example.com/{platform}"),
        size: 1000,
    };
    GitHubRelease {
        tag_name: format!("v{version}"),
        name: Some(format!("Open Image Denoise {version}")),
        published_at: None,
        assets: vec![
            asset("windows", "zip"),
            asset("macos", "tar.gz"),
            asset("linux", "tar.gz"),
        ],
    }
}

impl ReleaseClient for MockReleaseClient {
    async fn latest_release(&self, _owner: &str, _repo: &str) -> anyhow::Result<GitHubRelease> {
        Ok(self.release.clone())
    }

    async fn download_asset(
        &self,
        _asset: &ReleaseAsset,
        output_path: &Path,
    ) -> anyhow::Result<DownloadProgress> {
        self.downloads.fetch_add(1, Ordering::SeqCst);

        let expected = self.advertised_len.unwrap_or(self.archive.len() as u64);
        let chunks = self
            .archive
            .chunks(1024)
            .map(|c| Ok::<_, std::io::Error>(c.to_vec()))
            .collect::<Vec<_>>();
        write_stream_to_file(stream::iter(chunks), expected, output_path).await
    }
}
