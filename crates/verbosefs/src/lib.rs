//! VerboseFS: audit logging for filesystem providers
//!
//! [`VerboseFs`] wraps any [`FileSystemProvider`] and writes one record per
//! destructive call to an [`InfoStream`], tagged `FS` and followed by the
//! caller's stack with the logging machinery filtered out. Everything else
//! passes straight through to the wrapped provider.
//!
//! ```no_run
//! use verbosefs::{FileSystemProvider, VerboseFs};
//! use std::path::Path;
//!
//! let fs = VerboseFs::wrap_host()?;
//! fs.create_directory(Path::new("/tmp/scratch"), &[])?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod info_stream;
pub mod options;
pub mod path;
pub mod provider;
pub mod stack;
pub mod testing;
pub mod verbose;

pub use config::{LOGFILE_ENV, VerboseFsConfig};
pub use error::{Error, Result};
pub use host::HostFileSystem;
pub use info_stream::{InfoStream, NoOutputInfoStream, PrintStreamInfoStream, Sink};
pub use options::{
    AccessMode, AttributeValue, CopyOption, FileAttribute, LinkOption, OpenOption, OpenOptions,
};
pub use provider::{
    ByteChannel, EntryKind, FileAttributes, FileSystemProvider, InputStream, OutputStream,
};
pub use stack::{FrameFilter, FrameRule, StackFrame};
pub use verbose::VerboseFs;
