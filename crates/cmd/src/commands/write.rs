use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use diagnostics::log_debug;
use verbosefs::{FileSystemProvider, OpenOption};

/// Write everything from `input` to `path` through an output stream.
///
/// Creates the file when missing; truncates it unless `append`.
pub fn write_command<P: FileSystemProvider>(
    fs: &P,
    path: &Path,
    append: bool,
    input: &mut dyn Read,
) -> Result<u64> {
    let options: &[OpenOption] = if append {
        &[OpenOption::Create, OpenOption::Append]
    } else {
        &[OpenOption::Create, OpenOption::TruncateExisting, OpenOption::Write]
    };

    let display = path.display().to_string();
    let mut out = fs
        .new_output_stream(path, options)
        .with_context(|| format!("open {display} for writing"))?;
    let written = std::io::copy(input, &mut out).with_context(|| format!("write {display}"))?;
    out.flush().with_context(|| format!("flush {display}"))?;

    log_debug!("Wrote {written} bytes to {path}", written: written, path: display.as_str());
    Ok(written)
}
