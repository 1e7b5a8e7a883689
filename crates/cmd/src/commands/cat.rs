use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use verbosefs::FileSystemProvider;

/// Copy a file's content to `out`. Reading is never recorded.
pub fn cat_command<P: FileSystemProvider>(fs: &P, path: &Path, out: &mut dyn Write) -> Result<u64> {
    let mut input = fs
        .new_input_stream(path, &[])
        .with_context(|| format!("cat {}", path.display()))?;
    Ok(std::io::copy(&mut input, out)?)
}
