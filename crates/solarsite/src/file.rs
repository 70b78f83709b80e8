use std::fs;
use std::path::{Path, PathBuf};

use crate::prelude::*;

/// Write downloaded bytes to `dir/filename`, creating `dir` if needed
///
/// Returns the path of the written file.
pub fn download_file(bytes: &[u8], dir: &Path, filename: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let path = dir.join(filename);
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}
