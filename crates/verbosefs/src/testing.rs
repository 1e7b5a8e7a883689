//! Test utilities for VerboseFS
//!
//! Shared by the unit tests, the integration tests and the CLI tests:
//! an in-memory sink that can be read back, a sink that always fails, and a
//! provider wrapper that injects failures into the next call.

use crate::options::{
    AccessMode, AttributeValue, CopyOption, FileAttribute, LinkOption, OpenOption, OpenOptions,
};
use crate::provider::{ByteChannel, FileAttributes, FileSystemProvider, InputStream, OutputStream};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable in-memory writer; all clones share one buffer
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Header lines, one per record
    #[must_use]
    pub fn records(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| !line.starts_with('\t'))
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Writer whose every write fails
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(ErrorKind::StorageFull, "sink is full"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Error carried inside injected `io::Error`s, so tests can check identity
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct InjectedFailure {
    pub message: String,
    #[source]
    pub cause: Option<std::io::Error>,
}

/// Wraps a provider; the next call fails with a scripted error
pub struct FaultyProvider<P> {
    inner: P,
    pending: Mutex<Option<(ErrorKind, String, Option<String>)>>,
    calls: Mutex<Vec<&'static str>>,
}

impl<P: FileSystemProvider> FaultyProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            pending: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make the next call fail with `kind` and `message`
    pub fn fail_next(&self, kind: ErrorKind, message: &str) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((kind, message.to_string(), None));
    }

    /// Like `fail_next`, with an underlying cause attached
    pub fn fail_next_with_cause(&self, kind: ErrorKind, message: &str, cause: &str) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((kind, message.to_string(), Some(cause.to_string())));
    }

    /// Names of the provider methods called so far
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn enter(&self, call: &'static str) -> std::io::Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match pending {
            None => Ok(()),
            Some((kind, message, cause)) => Err(std::io::Error::new(
                kind,
                InjectedFailure {
                    message,
                    cause: cause.map(std::io::Error::other),
                },
            )),
        }
    }
}

impl<P: FileSystemProvider> FileSystemProvider for FaultyProvider<P> {
    fn scheme(&self) -> &str {
        self.inner.scheme()
    }

    fn create_directory(&self, dir: &Path, attrs: &[FileAttribute]) -> std::io::Result<()> {
        self.enter("create_directory")?;
        self.inner.create_directory(dir, attrs)
    }

    fn delete(&self, path: &Path) -> std::io::Result<()> {
        self.enter("delete")?;
        self.inner.delete(path)
    }

    fn delete_if_exists(&self, path: &Path) -> std::io::Result<bool> {
        self.enter("delete_if_exists")?;
        self.inner.delete_if_exists(path)
    }

    fn copy(&self, source: &Path, target: &Path, options: &[CopyOption]) -> std::io::Result<()> {
        self.enter("copy")?;
        self.inner.copy(source, target, options)
    }

    fn move_path(
        &self,
        source: &Path,
        target: &Path,
        options: &[CopyOption],
    ) -> std::io::Result<()> {
        self.enter("move_path")?;
        self.inner.move_path(source, target, options)
    }

    fn set_attribute(
        &self,
        path: &Path,
        attribute: &str,
        value: &AttributeValue,
        options: &[LinkOption],
    ) -> std::io::Result<()> {
        self.enter("set_attribute")?;
        self.inner.set_attribute(path, attribute, value, options)
    }

    fn create_symbolic_link(
        &self,
        link: &Path,
        target: &Path,
        attrs: &[FileAttribute],
    ) -> std::io::Result<()> {
        self.enter("create_symbolic_link")?;
        self.inner.create_symbolic_link(link, target, attrs)
    }

    fn create_link(&self, link: &Path, existing: &Path) -> std::io::Result<()> {
        self.enter("create_link")?;
        self.inner.create_link(link, existing)
    }

    fn new_output_stream(
        &self,
        path: &Path,
        options: &[OpenOption],
    ) -> std::io::Result<OutputStream> {
        self.enter("new_output_stream")?;
        self.inner.new_output_stream(path, options)
    }

    fn new_byte_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> std::io::Result<ByteChannel> {
        self.enter("new_byte_channel")?;
        self.inner.new_byte_channel(path, options, attrs)
    }

    fn new_file_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> std::io::Result<std::fs::File> {
        self.enter("new_file_channel")?;
        self.inner.new_file_channel(path, options, attrs)
    }

    fn new_async_file_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> std::io::Result<tokio::fs::File> {
        self.enter("new_async_file_channel")?;
        self.inner.new_async_file_channel(path, options, attrs)
    }

    fn new_input_stream(
        &self,
        path: &Path,
        options: &[OpenOption],
    ) -> std::io::Result<InputStream> {
        self.enter("new_input_stream")?;
        self.inner.new_input_stream(path, options)
    }

    fn new_directory_stream(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        self.enter("new_directory_stream")?;
        self.inner.new_directory_stream(dir)
    }

    fn read_attributes(
        &self,
        path: &Path,
        options: &[LinkOption],
    ) -> std::io::Result<FileAttributes> {
        self.enter("read_attributes")?;
        self.inner.read_attributes(path, options)
    }

    fn check_access(&self, path: &Path, modes: &[AccessMode]) -> std::io::Result<()> {
        self.enter("check_access")?;
        self.inner.check_access(path, modes)
    }

    fn is_same_file(&self, a: &Path, b: &Path) -> std::io::Result<bool> {
        self.enter("is_same_file")?;
        self.inner.is_same_file(a, b)
    }

    fn is_hidden(&self, path: &Path) -> std::io::Result<bool> {
        self.enter("is_hidden")?;
        self.inner.is_hidden(path)
    }

    fn read_symbolic_link(&self, link: &Path) -> std::io::Result<PathBuf> {
        self.enter("read_symbolic_link")?;
        self.inner.read_symbolic_link(link)
    }
}
