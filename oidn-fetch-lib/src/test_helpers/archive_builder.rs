use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use tar::{Builder, EntryType, Header};

/// One member of an in-memory test archive.
pub enum TarEntry {
    Dir(String),
    File(String, Vec<u8>),
    /// Written into the header verbatim, skipping the path checks
    /// `tar::Builder` applies, so hostile names can be produced.
    RawFile(String, Vec<u8>),
}

impl TarEntry {
    pub fn dir(path: &str) -> Self {
        Self::Dir(path.to_string())
    }

    pub fn file(path: &str, data: &[u8]) -> Self {
        Self::File(path.to_string(), data.to_vec())
    }

    pub fn raw_file(path: &str, data: &[u8]) -> Self {
        Self::RawFile(path.to_string(), data.to_vec())
    }
}

pub fn tar_bytes(entries: &[TarEntry]) -> Result<Vec<u8>> {
    let mut builder = Builder::new(Vec::new());
    append_entries(&mut builder, entries)?;
    Ok(builder.into_inner()?)
}

pub fn tar_gz_bytes(entries: &[TarEntry]) -> Result<Vec<u8>> {
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    append_entries(&mut builder, entries)?;
    Ok(builder.into_inner()?.finish()?)
}

fn append_entries<W: Write>(builder: &mut Builder<W>, entries: &[TarEntry]) -> Result<()> {
    for entry in entries {
        match entry {
            TarEntry::Dir(path) => {
                let mut header = Header::new_gnu();
                header.set_entry_type(EntryType::Directory);
                header.set_mode(0o755);
                header.set_size(0);
                builder.append_data(&mut header, path, std::io::empty())?;
            }
            TarEntry::File(path, data) => {
                let mut header = Header::new_gnu();
                header.set_entry_type(EntryType::Regular);
                header.set_mode(0o644);
                header.set_size(data.len() as u64);
                builder.append_data(&mut header, path, data.as_slice())?;
            }
            TarEntry::RawFile(path, data) => {
                let mut header = Header::new_old();
                header.set_entry_type(EntryType::Regular);
                header.set_mode(0o644);
                header.set_size(data.len() as u64);
                header.as_old_mut().name[..path.len()].copy_from_slice(path.as_bytes());
                header.set_cksum();
                builder.append(&header, data.as_slice())?;
            }
        }
    }
    Ok(())
}
