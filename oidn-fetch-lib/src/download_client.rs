use crate::github::{GitHubRelease, ReleaseAsset};
use anyhow::{Context, Result};
use futures_util::{Stream, StreamExt};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing_indicatif::span_ext::IndicatifSpanExt;

pub trait ReleaseClient {
    fn latest_release(
        &self,
        owner: &str,
        repo: &str,
    ) -> impl Future<Output = Result<GitHubRelease>> + Send;

    fn download_asset(
        &self,
        asset: &ReleaseAsset,
        output_path: &Path,
    ) -> impl Future<Output = Result<DownloadProgress>> + Send;
}

/// Byte counters for a single download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Advertised content length, 0 when the server did not send one
    pub bytes_expected: u64,
    pub bytes_received: u64,
}

impl DownloadProgress {
    pub fn new(bytes_expected: u64) -> Self {
        Self {
            bytes_expected,
            bytes_received: 0,
        }
    }

    pub fn record(&mut self, len: usize) {
        self.bytes_received += len as u64;
    }

    /// True when the expected size is unknown or every byte arrived.
    pub fn is_complete(&self) -> bool {
        self.bytes_expected == 0 || self.bytes_received == self.bytes_expected
    }
}

/// Writes every chunk of `stream` to a new file at `path`, advancing the
/// progress bar of the current span. A size mismatch is only logged; the
/// file is kept either way.
pub async fn write_stream_to_file<S, B, E>(
    stream: S,
    bytes_expected: u64,
    path: &Path,
) -> Result<DownloadProgress>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut stream = std::pin::pin!(stream);
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut progress = DownloadProgress::new(bytes_expected);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Failed to read response body")?;
        let chunk = chunk.as_ref();
        file.write_all(chunk).await?;
        progress.record(chunk.len());

        tracing::Span::current().pb_set_position(progress.bytes_received);
    }

    file.flush().await?;
    drop(file);

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    if progress.is_complete() {
        tracing::info!("Download completed: {}", file_name);
    } else {
        tracing::warn!(
            "Download of {} looks incomplete: expected {} bytes but received {}",
            file_name,
            progress.bytes_expected,
            progress.bytes_received
        );
    }

    Ok(progress)
}
