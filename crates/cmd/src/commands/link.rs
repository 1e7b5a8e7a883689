use std::path::Path;

use anyhow::{Context, Result};
use diagnostics::log_info;
use verbosefs::FileSystemProvider;

/// Create `link` pointing at `target`, symbolic or hard
pub fn link_command<P: FileSystemProvider>(
    fs: &P,
    target: &Path,
    link: &Path,
    symbolic: bool,
) -> Result<()> {
    let outcome = if symbolic {
        fs.create_symbolic_link(link, target, &[])
    } else {
        fs.create_link(link, target)
    };
    outcome.with_context(|| format!("ln {} {}", target.display(), link.display()))?;

    let (link, target) = (link.display().to_string(), target.display().to_string());
    log_info!("Linked {link} -> {target}", link: link.as_str(), target: target.as_str());
    Ok(())
}
