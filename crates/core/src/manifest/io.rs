use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use super::types::FileDescriptor;
use crate::error::TaskError;

/// Reads the descriptor batch from `dir/file_name`.
pub async fn read_file_descs(dir: &Path, file_name: &str) -> Result<Vec<FileDescriptor>, TaskError> {
    let path = dir.join(file_name);
    let bytes = fs::read(&path).await.map_err(|e| TaskError::io(&path, e))?;

    let descs: Vec<FileDescriptor> =
        serde_json::from_slice(&bytes).map_err(|e| TaskError::manifest(&path, e))?;

    debug!(path = %path.display(), count = descs.len(), "Read CAR file descriptors");
    Ok(descs)
}

/// Writes the batch as pretty-printed JSON and returns the file path.
pub async fn write_json(
    descs: &[FileDescriptor],
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, TaskError> {
    let path = dir.join(file_name);
    let json = serde_json::to_vec_pretty(descs).map_err(|e| TaskError::manifest(&path, e))?;
    fs::write(&path, json).await.map_err(|e| TaskError::io(&path, e))?;

    info!(path = %path.display(), "Wrote JSON manifest");
    Ok(path)
}

/// Writes the batch as CSV with a header row and returns the file path.
pub async fn write_csv(
    descs: &[FileDescriptor],
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, TaskError> {
    let path = dir.join(file_name);

    let mut writer = csv::Writer::from_writer(Vec::new());
    for desc in descs {
        writer
            .serialize(desc)
            .map_err(|e| TaskError::manifest(&path, e))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TaskError::manifest(&path, e.error()))?;

    fs::write(&path, bytes).await.map_err(|e| TaskError::io(&path, e))?;

    info!(path = %path.display(), "Wrote CSV manifest");
    Ok(path)
}

/// Writes the JSON manifest, then the CSV manifest.
///
/// A JSON file that was written before the CSV write failed is left in
/// place.
pub async fn write_file_descs(
    descs: &[FileDescriptor],
    dir: &Path,
    json_file_name: &str,
    csv_file_name: &str,
) -> Result<PathBuf, TaskError> {
    let json_path = write_json(descs, dir, json_file_name).await?;
    write_csv(descs, dir, csv_file_name).await?;
    Ok(json_path)
}
