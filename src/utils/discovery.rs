use crate::error::{ProcessingError, Result};
use crate::utils::constants::EXPORT_FILE_PATTERN;
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// Find all `*.csv` exports directly inside `dir`, sorted by file name.
pub fn discover_exports(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ProcessingError::Config(format!(
            "Data directory not found: {}",
            dir.display()
        )));
    }

    let dir_str = dir.to_str().ok_or_else(|| {
        ProcessingError::InvalidFormat(format!("Non UTF-8 directory path: {}", dir.display()))
    })?;
    let pattern = format!("{}/{}", Pattern::escape(dir_str), EXPORT_FILE_PATTERN);

    let mut files = Vec::new();
    for entry in glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
