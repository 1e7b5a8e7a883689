use std::path::Path;

use anyhow::{Context, Result};
use verbosefs::{EntryKind, FileSystemProvider};

use crate::common::entry_name;

/// List a directory, one formatted line per entry, sorted by name.
///
/// Each line is `<kind> <size> <name>`, kind being one of `d`, `-`, `l`, `?`.
pub fn list_command<P, F>(fs: &P, dir: &Path, mut handler: F) -> Result<()>
where
    P: FileSystemProvider,
    F: FnMut(String),
{
    let mut entries = fs
        .new_directory_stream(dir)
        .with_context(|| format!("ls {}", dir.display()))?;
    entries.sort();

    for entry in entries {
        let attrs = fs
            .read_attributes(&entry, &[verbosefs::LinkOption::NoFollowLinks])
            .with_context(|| format!("stat {}", entry.display()))?;
        let kind = match attrs.kind {
            EntryKind::Directory => 'd',
            EntryKind::File => '-',
            EntryKind::Symlink => 'l',
            EntryKind::Other => '?',
        };
        handler(format!("{kind} {:>10} {}", attrs.size, entry_name(&entry)));
    }
    Ok(())
}
