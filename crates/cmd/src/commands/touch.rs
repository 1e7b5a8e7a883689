use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use diagnostics::log_debug;
use verbosefs::{AttributeValue, FileSystemProvider, OpenOption, OpenOptions};

/// Set the modification time to now, creating an empty file when missing
pub fn touch_command<P: FileSystemProvider>(fs: &P, path: &Path) -> Result<()> {
    let display = path.display().to_string();

    match fs.read_attributes(path, &[]) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log_debug!("Creating {path}", path: display.as_str());
            let options = OpenOptions::from([OpenOption::Write, OpenOption::Create]);
            drop(
                fs.new_byte_channel(path, &options, &[])
                    .with_context(|| format!("touch {display}"))?,
            );
        }
        Err(e) => return Err(e).with_context(|| format!("touch {display}")),
    }

    fs.set_attribute(
        path,
        "lastModifiedTime",
        &AttributeValue::Time(SystemTime::now()),
        &[],
    )
    .with_context(|| format!("touch {display}"))
}
