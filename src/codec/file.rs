//! Reading and writing artifacts on disk.

use std::fs::File;
use std::path::{Path, PathBuf};

use super::{decode, encode, DataFormat};
use crate::core::TrackCollection;
use crate::util::{Error, Result};

/// Destination path for `filename` in `dir`, with `.json`/`.bin` appended
/// unless the name already ends with it (case-sensitive suffix match).
pub fn artifact_path(dir: impl AsRef<Path>, filename: &str, format: DataFormat) -> PathBuf {
    let suffix = format!(".{}", format.extension());
    if filename.ends_with(&suffix) {
        dir.as_ref().join(filename)
    } else {
        dir.as_ref().join(format!("{filename}{suffix}"))
    }
}

/// Encode and write `collection` to `dir/filename.{json|bin}`.
///
/// The whole artifact is encoded in memory and written in one call;
/// an existing file is overwritten.
pub fn save_to_file(
    collection: &TrackCollection,
    dir: impl AsRef<Path>,
    filename: &str,
    format: DataFormat,
) -> Result<PathBuf> {
    let path = artifact_path(dir, filename, format);
    let bytes = encode(collection, format)?;
    std::fs::write(&path, &bytes)?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// Read an artifact, inferring its format from the extension.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<TrackCollection> {
    let path = path.as_ref();
    let format = DataFormat::from_path(path)?;
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;
    let size = file.metadata()?.len();
    tracing::debug!("Reading {} ({} bytes, {:?})", path.display(), size, format);
    read_contents(file, size, format)
}

#[cfg(feature = "mmap")]
fn read_contents(file: File, size: u64, format: DataFormat) -> Result<TrackCollection> {
    if size == 0 {
        // empty files cannot be mapped
        return decode(&[], format);
    }
    // Safety: the file is opened read-only and only borrowed for this call
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| Error::MmapFailed(e.to_string()))?;
    decode(&mmap, format)
}

#[cfg(not(feature = "mmap"))]
fn read_contents(mut file: File, size: u64, format: DataFormat) -> Result<TrackCollection> {
    use std::io::Read;
    let mut bytes = Vec::with_capacity(size as usize);
    file.read_to_end(&mut bytes)?;
    decode(&bytes, format)
}
