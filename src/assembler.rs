//! Writes fetched segments to their destination file.
//!
//! Bytes go to a `<name>.part` file next to the destination, which is only
//! renamed into place once every segment has been written, flushed and
//! synced. A failed write never leaves a file at the destination path.
use crate::error::{DownloadError, Result};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{info, warn};

const WRITE_BUFFER: usize = 512 * 1024;

/// Path of the temporary file a destination is assembled in.
pub fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Concatenates `buffers` in order into `destination`, overwriting it.
///
/// Returns the number of bytes written.
pub async fn assemble(buffers: Vec<Vec<u8>>, destination: &Path) -> Result<u64> {
    let temp = part_path(destination);

    match write_all(&buffers, destination, &temp).await {
        Ok(written) => {
            info!(path = %destination.display(), bytes = written, "assembled output");
            Ok(written)
        }
        Err(source) => {
            warn!(path = %temp.display(), error = %source, "assembly failed, removing partial file");
            let _ = fs::remove_file(&temp).await;
            Err(DownloadError::AssemblyWriteFailed {
                path: destination.display().to_string(),
                source,
            })
        }
    }
}

async fn write_all(buffers: &[Vec<u8>], destination: &Path, temp: &Path) -> std::io::Result<u64> {
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await?;
    }

    let file = File::create(temp).await?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER, file);
    let mut written = 0u64;

    for buffer in buffers {
        writer.write_all(buffer).await?;
        written += buffer.len() as u64;
    }

    // Ensure all bytes are flushed to disk before the file becomes visible
    writer.flush().await?;
    writer.get_mut().sync_all().await?;
    drop(writer);

    fs::rename(temp, destination).await?;
    Ok(written)
}
