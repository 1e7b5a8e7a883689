//! Host filesystem as a `FileSystemProvider`
//!
//! Backed directly by `std::fs`. This is the provider `VerboseFs::wrap_host`
//! wraps; paths are used exactly as given, relative paths resolving against
//! the process working directory.

use crate::options::{
    AccessMode, AttributeValue, CopyOption, FileAttribute, LinkOption, OpenOption, OpenOptions,
};
use crate::provider::{
    ByteChannel, EntryKind, FileAttributes, FileSystemProvider, InputStream, OutputStream,
};
use std::fs;
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};

/// Provider for the local host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostFileSystem;

impl HostFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Open a file the way a byte channel is opened.
    ///
    /// Reads unless writing was requested; creation and truncation only
    /// apply when writing.
    fn open(path: &Path, options: &OpenOptions, attrs: &[FileAttribute]) -> Result<fs::File> {
        let append = options.contains(OpenOption::Append);
        let write = append || options.contains(OpenOption::Write);
        let read = options.contains(OpenOption::Read) || !write;

        if append && options.contains(OpenOption::Read) {
            return Err(invalid("READ + APPEND not allowed"));
        }
        if append && options.contains(OpenOption::TruncateExisting) {
            return Err(invalid("APPEND + TRUNCATE_EXISTING not allowed"));
        }
        if options.contains(OpenOption::NoFollowLinks) && is_symlink(path) {
            return Err(Error::other(format!(
                "{}: refusing to follow symbolic link",
                path.display()
            )));
        }

        let mut std_options = fs::OpenOptions::new();
        let _ = std_options.read(read).write(write).append(append);
        if write {
            let _ = std_options
                .create(options.contains(OpenOption::Create))
                .create_new(options.contains(OpenOption::CreateNew))
                .truncate(options.contains(OpenOption::TruncateExisting) && !append);
        }
        apply_open_attrs(&mut std_options, attrs)?;

        let file = std_options.open(path)?;

        if options.contains(OpenOption::DeleteOnClose) {
            delete_on_close(path)?;
        }
        Ok(file)
    }

    fn copy_entry(source: &Path, target: &Path, follow: bool) -> Result<()> {
        let meta = if follow {
            fs::metadata(source)?
        } else {
            fs::symlink_metadata(source)?
        };

        if meta.is_dir() {
            fs::create_dir(target)
        } else if meta.file_type().is_symlink() {
            let link_target = fs::read_link(source)?;
            symlink(&link_target, target)
        } else {
            fs::copy(source, target).map(|_| ())
        }
    }

    fn copy_times(source: &Path, target: &Path) -> Result<()> {
        let meta = fs::metadata(source)?;
        let mut times = fs::FileTimes::new();
        if let Ok(modified) = meta.modified() {
            times = times.set_modified(modified);
        }
        if let Ok(accessed) = meta.accessed() {
            times = times.set_accessed(accessed);
        }
        fs::File::open(target)?.set_times(times)
    }
}

impl FileSystemProvider for HostFileSystem {
    fn scheme(&self) -> &str {
        "file"
    }

    fn create_directory(&self, dir: &Path, attrs: &[FileAttribute]) -> Result<()> {
        let mut builder = fs::DirBuilder::new();
        for attr in attrs {
            match attr {
                #[cfg(unix)]
                FileAttribute::Permissions(mode) => {
                    use std::os::unix::fs::DirBuilderExt;
                    let _ = builder.mode(*mode);
                }
                #[cfg(not(unix))]
                FileAttribute::Permissions(_) => {
                    return Err(unsupported("permission attributes"));
                }
            }
        }
        builder.create(dir)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        if fs::symlink_metadata(path)?.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        }
    }

    fn delete_if_exists(&self, path: &Path) -> Result<bool> {
        match self.delete(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn copy(&self, source: &Path, target: &Path, options: &[CopyOption]) -> Result<()> {
        if options.contains(&CopyOption::AtomicMove) {
            return Err(unsupported("ATOMIC_MOVE for copy"));
        }
        let follow = !options.contains(&CopyOption::NoFollowLinks);

        if exists_no_follow(target) {
            if !options.contains(&CopyOption::ReplaceExisting) {
                return Err(already_exists(target));
            }
            if self.is_same_file(source, target)? {
                return Ok(());
            }
            self.delete(target)?;
        }

        Self::copy_entry(source, target, follow)?;

        if options.contains(&CopyOption::CopyAttributes) && !is_symlink(target) {
            Self::copy_times(source, target)?;
        }
        Ok(())
    }

    fn move_path(&self, source: &Path, target: &Path, options: &[CopyOption]) -> Result<()> {
        let atomic = options.contains(&CopyOption::AtomicMove);
        if !atomic && !options.contains(&CopyOption::ReplaceExisting) && exists_no_follow(target)
        {
            return Err(already_exists(target));
        }

        match fs::rename(source, target) {
            Err(e) if e.kind() == ErrorKind::CrossesDevices && !atomic => {
                // Directories would need a recursive copy; like rename, refuse.
                if fs::symlink_metadata(source)?.is_dir() {
                    return Err(e);
                }
                Self::copy_entry(source, target, false)?;
                self.delete(source)
            }
            other => other,
        }
    }

    fn set_attribute(
        &self,
        path: &Path,
        attribute: &str,
        value: &AttributeValue,
        options: &[LinkOption],
    ) -> Result<()> {
        if options.contains(&LinkOption::NoFollowLinks) && is_symlink(path) {
            return Err(unsupported("setting attributes on a symbolic link"));
        }

        let name = attribute
            .split_once(':')
            .map_or(attribute, |(_view, name)| name);

        match (name, value) {
            ("lastModifiedTime", AttributeValue::Time(t)) => fs::File::open(path)?.set_modified(*t),
            ("lastAccessTime", AttributeValue::Time(t)) => {
                fs::File::open(path)?.set_times(fs::FileTimes::new().set_accessed(*t))
            }
            ("readonly", AttributeValue::Bool(readonly)) => {
                let mut perms = fs::metadata(path)?.permissions();
                perms.set_readonly(*readonly);
                fs::set_permissions(path, perms)
            }
            #[cfg(unix)]
            ("permissions" | "mode", AttributeValue::Permissions(mode)) => {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(path, fs::Permissions::from_mode(*mode))
            }
            ("lastModifiedTime" | "lastAccessTime" | "readonly" | "permissions" | "mode", _) => {
                Err(invalid(&format!("{attribute}: value {value} has the wrong type")))
            }
            _ => Err(unsupported(&format!("attribute '{attribute}'"))),
        }
    }

    fn create_symbolic_link(
        &self,
        link: &Path,
        target: &Path,
        attrs: &[FileAttribute],
    ) -> Result<()> {
        if !attrs.is_empty() {
            return Err(unsupported("attributes on symbolic links"));
        }
        symlink(target, link)
    }

    fn create_link(&self, link: &Path, existing: &Path) -> Result<()> {
        fs::hard_link(existing, link)
    }

    fn new_output_stream(&self, path: &Path, options: &[OpenOption]) -> Result<OutputStream> {
        let mut opts = OpenOptions::from(options);
        if opts.contains(OpenOption::Read) {
            return Err(invalid("READ not allowed for an output stream"));
        }
        if opts.is_empty() {
            opts = OpenOptions::from([
                OpenOption::Create,
                OpenOption::TruncateExisting,
                OpenOption::Write,
            ]);
        } else {
            opts = opts.with(OpenOption::Write);
        }
        Ok(Box::new(Self::open(path, &opts, &[])?))
    }

    fn new_byte_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> Result<ByteChannel> {
        Ok(Box::new(Self::open(path, options, attrs)?))
    }

    fn new_file_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> Result<fs::File> {
        Self::open(path, options, attrs)
    }

    fn new_async_file_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> Result<tokio::fs::File> {
        Self::open(path, options, attrs).map(tokio::fs::File::from_std)
    }

    fn new_input_stream(&self, path: &Path, options: &[OpenOption]) -> Result<InputStream> {
        let opts = OpenOptions::from(options);
        if opts.contains(OpenOption::Write) || opts.contains(OpenOption::Append) {
            return Err(invalid("WRITE and APPEND not allowed for an input stream"));
        }
        Ok(Box::new(Self::open(path, &opts, &[])?))
    }

    fn new_directory_stream(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    fn read_attributes(&self, path: &Path, options: &[LinkOption]) -> Result<FileAttributes> {
        let meta = if options.contains(&LinkOption::NoFollowLinks) {
            fs::symlink_metadata(path)?
        } else {
            fs::metadata(path)?
        };

        let file_type = meta.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        Ok(FileAttributes {
            kind,
            size: meta.len(),
            modified: meta.modified().ok(),
            accessed: meta.accessed().ok(),
            readonly: meta.permissions().readonly(),
        })
    }

    fn check_access(&self, path: &Path, modes: &[AccessMode]) -> Result<()> {
        let meta = fs::metadata(path)?;
        for mode in modes {
            match mode {
                AccessMode::Read => {
                    if meta.is_dir() {
                        let _ = fs::read_dir(path)?;
                    } else {
                        let _ = fs::File::open(path)?;
                    }
                }
                AccessMode::Write => {
                    if meta.permissions().readonly() {
                        return Err(Error::new(
                            ErrorKind::PermissionDenied,
                            format!("{}: not writable", path.display()),
                        ));
                    }
                }
                AccessMode::Execute => {
                    #[cfg(unix)]
                    {
                        use std::os::unix::fs::PermissionsExt;
                        if meta.permissions().mode() & 0o111 == 0 {
                            return Err(Error::new(
                                ErrorKind::PermissionDenied,
                                format!("{}: not executable", path.display()),
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn is_same_file(&self, a: &Path, b: &Path) -> Result<bool> {
        if a == b {
            return Ok(true);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            let (ma, mb) = (fs::metadata(a)?, fs::metadata(b)?);
            Ok(ma.dev() == mb.dev() && ma.ino() == mb.ino())
        }
        #[cfg(not(unix))]
        {
            Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
        }
    }

    fn is_hidden(&self, path: &Path) -> Result<bool> {
        Ok(path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.')))
    }

    fn read_symbolic_link(&self, link: &Path) -> Result<PathBuf> {
        fs::read_link(link)
    }
}

fn invalid(msg: &str) -> Error {
    Error::new(ErrorKind::InvalidInput, msg.to_string())
}

fn unsupported(what: &str) -> Error {
    Error::new(ErrorKind::Unsupported, format!("{what} not supported"))
}

fn already_exists(path: &Path) -> Error {
    Error::new(ErrorKind::AlreadyExists, path.display().to_string())
}

fn exists_no_follow(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(_target: &Path, _link: &Path) -> Result<()> {
    Err(unsupported("symbolic links"))
}

#[cfg(unix)]
fn apply_open_attrs(options: &mut fs::OpenOptions, attrs: &[FileAttribute]) -> Result<()> {
    use std::os::unix::fs::OpenOptionsExt;
    for attr in attrs {
        match attr {
            FileAttribute::Permissions(mode) => {
                let _ = options.mode(*mode);
            }
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_open_attrs(_options: &mut fs::OpenOptions, attrs: &[FileAttribute]) -> Result<()> {
    if attrs.is_empty() {
        Ok(())
    } else {
        Err(unsupported("permission attributes"))
    }
}

// The open descriptor keeps the data alive; the name goes away now.
#[cfg(unix)]
fn delete_on_close(path: &Path) -> Result<()> {
    let _ = fs::remove_file(path);
    Ok(())
}

#[cfg(not(unix))]
fn delete_on_close(_path: &Path) -> Result<()> {
    Err(unsupported("DELETE_ON_CLOSE"))
}
