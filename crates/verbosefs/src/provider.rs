use crate::options::{
    AccessMode, AttributeValue, CopyOption, FileAttribute, LinkOption, OpenOption, OpenOptions,
};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A channel supporting positioned reads and writes
pub trait SeekableByteChannel: Read + Write + Seek + Send {}

impl<T: Read + Write + Seek + Send> SeekableByteChannel for T {}

pub type ByteChannel = Box<dyn SeekableByteChannel>;
pub type InputStream = Box<dyn Read + Send>;
pub type OutputStream = Box<dyn Write + Send>;

/// Kind of filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

/// Basic attributes returned by `read_attributes`
#[derive(Debug, Clone, PartialEq)]
pub struct FileAttributes {
    pub kind: EntryKind,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
    pub readonly: bool,
}

impl FileAttributes {
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }
}

/// Path-based filesystem capability.
///
/// Implementations perform the real I/O; decorators such as
/// [`crate::VerboseFs`] wrap another implementation and forward to it.
/// Every failure is reported as the implementation's own `std::io::Error`.
pub trait FileSystemProvider: Send + Sync {
    /// URI scheme served by this provider, e.g. `file`
    fn scheme(&self) -> &str;

    // Destructive operations

    fn create_directory(&self, dir: &Path, attrs: &[FileAttribute]) -> std::io::Result<()>;

    fn delete(&self, path: &Path) -> std::io::Result<()>;

    /// Returns false when there was nothing to delete
    fn delete_if_exists(&self, path: &Path) -> std::io::Result<bool>;

    fn copy(&self, source: &Path, target: &Path, options: &[CopyOption]) -> std::io::Result<()>;

    fn move_path(&self, source: &Path, target: &Path, options: &[CopyOption])
    -> std::io::Result<()>;

    fn set_attribute(
        &self,
        path: &Path,
        attribute: &str,
        value: &AttributeValue,
        options: &[LinkOption],
    ) -> std::io::Result<()>;

    fn create_symbolic_link(
        &self,
        link: &Path,
        target: &Path,
        attrs: &[FileAttribute],
    ) -> std::io::Result<()>;

    fn create_link(&self, link: &Path, existing: &Path) -> std::io::Result<()>;

    // Opens; destructive only for some option sets

    fn new_output_stream(&self, path: &Path, options: &[OpenOption])
    -> std::io::Result<OutputStream>;

    fn new_byte_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> std::io::Result<ByteChannel>;

    fn new_file_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> std::io::Result<std::fs::File>;

    fn new_async_file_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> std::io::Result<tokio::fs::File>;

    // Reads and metadata

    fn new_input_stream(&self, path: &Path, options: &[OpenOption])
    -> std::io::Result<InputStream>;

    /// Entries of a directory, as full paths
    fn new_directory_stream(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>>;

    fn read_attributes(
        &self,
        path: &Path,
        options: &[LinkOption],
    ) -> std::io::Result<FileAttributes>;

    fn check_access(&self, path: &Path, modes: &[AccessMode]) -> std::io::Result<()>;

    fn is_same_file(&self, a: &Path, b: &Path) -> std::io::Result<bool>;

    fn is_hidden(&self, path: &Path) -> std::io::Result<bool>;

    fn read_symbolic_link(&self, link: &Path) -> std::io::Result<PathBuf>;
}
