//! Unpack the downloaded archive into the raw-data directory.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tar::Archive;

use crate::dirs::reset_dir;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Unpack every member of the tar archive at `archive_path` into `dest_dir`,
/// which is emptied first. Gzip compression is detected from the header
/// bytes, not the file extension.
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    reset_dir(dest_dir)?;

    log::info!(
        "Extracting [{}] into [{}]",
        archive_path.display(),
        dest_dir.display()
    );

    let mut file = File::open(archive_path)
        .with_context(|| format!("opening archive {}", archive_path.display()))?;
    let gzipped = is_gzip(&mut file)?;
    let reader = BufReader::new(file);

    let unpacked = if gzipped {
        Archive::new(GzDecoder::new(reader)).unpack(dest_dir)
    } else {
        Archive::new(reader).unpack(dest_dir)
    };
    unpacked.with_context(|| format!("unpacking {}", archive_path.display()))?;

    log::info!("Extraction completed");
    Ok(())
}

/// Peek at the first two bytes and rewind.
fn is_gzip(file: &mut File) -> Result<bool> {
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic).context("reading archive header")?;
    file.seek(SeekFrom::Start(0)).context("rewinding archive")?;
    Ok(n == 2 && magic == GZIP_MAGIC)
}
