use std::path::Path;

use anyhow::{Context, Result};
use diagnostics::log_info;
use verbosefs::FileSystemProvider;

/// Delete a file, link or empty directory.
///
/// Returns whether something was deleted; only `if_exists` can make it false.
pub fn remove_command<P: FileSystemProvider>(fs: &P, path: &Path, if_exists: bool) -> Result<bool> {
    let display = path.display().to_string();
    let existed = if if_exists {
        fs.delete_if_exists(path)
            .with_context(|| format!("rm {display}"))?
    } else {
        fs.delete(path).with_context(|| format!("rm {display}"))?;
        true
    };

    log_info!("Removed {path}: {existed}", path: display.as_str(), existed: existed);
    Ok(existed)
}
