use crate::error::FetchError;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::{Component, Path};
use tar::Archive;

/// Tar-family formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Tar,
    TarGz,
}

impl ArchiveKind {
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar") {
            Some(Self::Tar)
        } else {
            None
        }
    }
}

/// Extracts a `.tar`, `.tar.gz` or `.tgz` archive into `destination` and
/// returns the distinct top-level names of its directory members.
///
/// Any other file name is reported and yields an empty set without touching
/// the filesystem. Members that would land outside `destination` abort the
/// extraction with [FetchError::UnsafeArchivePath].
pub fn extract_archive(archive_path: &Path, destination: &Path) -> Result<BTreeSet<String>> {
    let file_name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Some(kind) = ArchiveKind::from_file_name(&file_name) else {
        tracing::info!("The file is not a .tar, .tar.gz, or .tgz file and cannot be extracted.");
        return Ok(BTreeSet::new());
    };

    let file = fs::File::open(archive_path)
        .with_context(|| format!("Failed to open archive {}", archive_path.display()))?;
    let reader: Box<dyn Read> = match kind {
        ArchiveKind::Tar => Box::new(file),
        ArchiveKind::TarGz => Box::new(GzDecoder::new(file)),
    };

    fs::create_dir_all(destination)?;
    let folders = unpack_entries(Archive::new(reader), destination)
        .with_context(|| format!("Failed to extract {file_name}"))?;

    tracing::info!(
        "Extracted {} into folders: {}",
        file_name,
        folders.iter().cloned().collect::<Vec<_>>().join(", ")
    );
    Ok(folders)
}

fn unpack_entries<R: Read>(
    mut archive: Archive<R>,
    destination: &Path,
) -> Result<BTreeSet<String>> {
    let mut folders = BTreeSet::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();

        if !is_enclosed(&path) {
            return Err(FetchError::UnsafeArchivePath(path).into());
        }

        // `unpack_in` also refuses to write through links pointing outside.
        if !entry.unpack_in(destination)? {
            return Err(FetchError::UnsafeArchivePath(path).into());
        }

        if entry.header().entry_type().is_dir()
            && let Some(top_level) = top_level_name(&path)
        {
            folders.insert(top_level);
        }
    }

    Ok(folders)
}

/// A member path is enclosed when it is relative and never steps upward.
fn is_enclosed(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn top_level_name(path: &Path) -> Option<String> {
    path.components().find_map(|c| match c {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    })
}
