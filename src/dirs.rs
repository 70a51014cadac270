use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Make `dir` an empty directory, removing whatever was there before.
pub fn reset_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        fs::remove_dir_all(dir).with_context(|| format!("removing {}", dir.display()))?;
    } else if dir.exists() {
        fs::remove_file(dir).with_context(|| format!("removing {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))
}
