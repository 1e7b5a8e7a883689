use std::path::Path;

use anyhow::{Context, Result};
use diagnostics::{log_debug, log_info};
use verbosefs::FileSystemProvider;

/// Create a directory; with `parents`, missing ancestors are created first
pub fn mkdir_command<P: FileSystemProvider>(fs: &P, path: &Path, parents: bool) -> Result<()> {
    let display = path.display().to_string();
    log_debug!("Creating directory: {path}", path: display.as_str());

    if parents {
        let mut missing = Vec::new();
        let mut current = Some(path);
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() || fs.read_attributes(dir, &[]).is_ok() {
                break;
            }
            missing.push(dir);
            current = dir.parent();
        }
        for dir in missing.into_iter().rev() {
            fs.create_directory(dir, &[])
                .with_context(|| format!("mkdir {}", dir.display()))?;
        }
    } else {
        fs.create_directory(path, &[])
            .with_context(|| format!("mkdir {display}"))?;
    }

    log_info!("Directory created successfully: {path}", path: display.as_str());
    Ok(())
}
