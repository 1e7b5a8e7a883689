use std::path::Path;

use anyhow::{Context, Result};
use verbosefs::{AttributeValue, FileSystemProvider};

use crate::common::parse_mode;

/// Set POSIX permission bits from an octal string
pub fn chmod_command<P: FileSystemProvider>(fs: &P, mode: &str, path: &Path) -> Result<()> {
    let bits = parse_mode(mode)?;
    fs.set_attribute(path, "posix:permissions", &AttributeValue::Permissions(bits), &[])
        .with_context(|| format!("chmod {mode} {}", path.display()))
}
