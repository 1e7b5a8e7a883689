use std::path::Path;

use anyhow::{Context, Result};
use diagnostics::log_info;
use verbosefs::{CopyOption, FileSystemProvider};

fn copy_options(force: bool) -> Vec<CopyOption> {
    if force {
        vec![CopyOption::ReplaceExisting]
    } else {
        Vec::new()
    }
}

/// Copy `source` to `dest`; `force` replaces an existing target
pub fn copy_command<P: FileSystemProvider>(
    fs: &P,
    source: &Path,
    dest: &Path,
    force: bool,
) -> Result<()> {
    fs.copy(source, dest, &copy_options(force))
        .with_context(|| format!("cp {} {}", source.display(), dest.display()))?;

    let (source, dest) = (source.display().to_string(), dest.display().to_string());
    log_info!("Copied {source} to {dest}", source: source.as_str(), dest: dest.as_str());
    Ok(())
}

/// Move or rename `source` to `dest`; `force` replaces an existing target
pub fn move_command<P: FileSystemProvider>(
    fs: &P,
    source: &Path,
    dest: &Path,
    force: bool,
) -> Result<()> {
    fs.move_path(source, dest, &copy_options(force))
        .with_context(|| format!("mv {} {}", source.display(), dest.display()))?;

    let (source, dest) = (source.display().to_string(), dest.display().to_string());
    log_info!("Moved {source} to {dest}", source: source.as_str(), dest: dest.as_str());
    Ok(())
}
