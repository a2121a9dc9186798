use std::path::Path;

use tokio::fs;
use tracing::info;

use crate::error::TaskError;

/// Checks that the input directory exists and can be listed.
pub async fn check_input_dir(dir: &Path) -> Result<(), TaskError> {
    let meta = fs::metadata(dir)
        .await
        .map_err(|e| TaskError::io(dir, e))?;

    if !meta.is_dir() {
        return Err(TaskError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        ));
    }

    let mut entries = fs::read_dir(dir).await.map_err(|e| TaskError::io(dir, e))?;
    entries
        .next_entry()
        .await
        .map_err(|e| TaskError::io(dir, e))?;
    Ok(())
}

/// Creates the output directory (and parents) if it does not exist yet.
pub async fn create_output_dir(dir: &Path) -> Result<(), TaskError> {
    if fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false) {
        return Ok(());
    }

    fs::create_dir_all(dir)
        .await
        .map_err(|e| TaskError::io(dir, e))?;
    info!(path = %dir.display(), "Created output directory");
    Ok(())
}
