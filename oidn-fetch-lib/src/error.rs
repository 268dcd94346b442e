use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("GitHub API request to {url} failed: {status}")]
    ApiStatus { url: String, status: StatusCode },

    #[error("Download of {url} failed: {status}")]
    DownloadStatus { url: String, status: StatusCode },

    #[error("Operating system '{0}' has no platform tag (expected windows, macos or linux)")]
    UnsupportedPlatform(String),

    #[error("Release {release} has no asset for platform '{tag}'")]
    NoPlatformAsset { tag: String, release: String },

    #[error("Archive member '{}' would be extracted outside the destination", .0.display())]
    UnsafeArchivePath(PathBuf),

    #[error(
        "Download of {} is incomplete: expected {expected} bytes, received {received}",
        .file.display()
    )]
    IncompleteDownload {
        file: PathBuf,
        expected: u64,
        received: u64,
    },
}
