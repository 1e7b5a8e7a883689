//! VerboseFs: a provider decorator that records destructive activity
//!
//! Every call is forwarded to the wrapped provider. Destructive calls
//! (create, delete, copy, move, attribute changes, link creation, and opens
//! that write, append or delete on close) additionally produce one record on
//! the info stream under the `FS` component. The provider's result, success
//! or failure, reaches the caller as the very value the provider returned.

use crate::config::VerboseFsConfig;
use crate::error::Result;
use crate::host::HostFileSystem;
use crate::info_stream::InfoStream;
use crate::options::{
    AccessMode, AttributeValue, CopyOption, FileAttribute, LinkOption, OpenOption, OpenOptions,
    OptionList,
};
use crate::path::display;
use crate::provider::{ByteChannel, FileAttributes, FileSystemProvider, InputStream, OutputStream};
use crate::stack::FrameRule;
use diagnostics::{log_debug, log_info, log_warn};
use std::path::{Path, PathBuf};

/// Component tag of every record
pub const COMPONENT: &str = "FS";

/// Frames of the decorator itself never appear in records
pub const FRAME_RULE: FrameRule = FrameRule::member(module_path!(), "VerboseFs");

/// Records major destructive filesystem activity of a wrapped provider.
pub struct VerboseFs<P> {
    delegate: P,
    info_stream: Box<dyn InfoStream>,
}

impl<P: FileSystemProvider> VerboseFs<P> {
    /// Wrap `delegate`, sending records to `info_stream`
    pub fn new(delegate: P, info_stream: Box<dyn InfoStream>) -> Self {
        Self {
            delegate,
            info_stream,
        }
    }

    /// Wrap `delegate` with the destination named by `VERBOSEFS_LOGFILE`
    pub fn wrap(delegate: P) -> Result<Self> {
        Self::with_config(delegate, &VerboseFsConfig::from_env())
    }

    pub fn with_config(delegate: P, config: &VerboseFsConfig) -> Result<Self> {
        let info_stream = config.open_info_stream(&delegate)?;
        Ok(Self::new(delegate, info_stream))
    }

    #[must_use]
    pub fn delegate(&self) -> &P {
        &self.delegate
    }

    #[must_use]
    pub fn info_stream(&self) -> &dyn InfoStream {
        self.info_stream.as_ref()
    }

    /// Close the info stream (stdout and stderr stay open)
    pub fn close(&self) -> Result<()> {
        self.info_stream.close()
    }

    /// Record the outcome of a destructive call and hand it back unchanged.
    ///
    /// A failed call wins over a failed record: the record failure is only
    /// reported through diagnostics.
    fn sop<T>(
        &self,
        outcome: std::io::Result<T>,
        describe: impl FnOnce() -> String,
    ) -> std::io::Result<T> {
        match outcome {
            Ok(value) => {
                if self.info_stream.is_enabled(COMPONENT) {
                    self.info_stream.message(COMPONENT, &describe())?;
                }
                Ok(value)
            }
            Err(err) => {
                if self.info_stream.is_enabled(COMPONENT) {
                    let text = format!("{} (FAILED: {})", describe(), err);
                    if let Err(record_err) = self.info_stream.message(COMPONENT, &text) {
                        let reason = record_err.to_string();
                        log_warn!(
                            "audit record lost: {record}: {reason}",
                            record: text.as_str(),
                            reason: reason.as_str()
                        );
                    }
                }
                Err(err)
            }
        }
    }

    /// `sop` for opens, which are only recorded with a destructive option
    fn sop_open<T>(
        &self,
        outcome: std::io::Result<T>,
        options: &OpenOptions,
        describe: impl FnOnce() -> String,
    ) -> std::io::Result<T> {
        if options.contains_destructive() {
            self.sop(outcome, describe)
        } else {
            outcome
        }
    }
}

impl VerboseFs<HostFileSystem> {
    /// Wrap the host filesystem, configured from the environment
    pub fn wrap_host() -> Result<Self> {
        let config = VerboseFsConfig::from_env();
        let destination = config
            .log_file
            .as_ref()
            .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
        log_info!(
            "VerboseFS wrapping host filesystem, recording to {destination}",
            destination: destination.as_str()
        );
        Self::with_config(HostFileSystem::new(), &config)
    }
}

impl<P: FileSystemProvider> FileSystemProvider for VerboseFs<P> {
    fn scheme(&self) -> &str {
        self.delegate.scheme()
    }

    fn create_directory(&self, dir: &Path, attrs: &[FileAttribute]) -> std::io::Result<()> {
        let outcome = self.delegate.create_directory(dir, attrs);
        self.sop(outcome, || format!("createDirectory: {}", display(dir)))
    }

    fn delete(&self, path: &Path) -> std::io::Result<()> {
        let outcome = self.delegate.delete(path);
        self.sop(outcome, || format!("delete: {}", display(path)))
    }

    fn delete_if_exists(&self, path: &Path) -> std::io::Result<bool> {
        let outcome = self.delegate.delete_if_exists(path);
        self.sop(outcome, || format!("deleteIfExists: {}", display(path)))
    }

    fn copy(&self, source: &Path, target: &Path, options: &[CopyOption]) -> std::io::Result<()> {
        let outcome = self.delegate.copy(source, target, options);
        self.sop(outcome, || {
            format!(
                "copy{}: {} -> {}",
                OptionList(options),
                display(source),
                display(target)
            )
        })
    }

    fn move_path(
        &self,
        source: &Path,
        target: &Path,
        options: &[CopyOption],
    ) -> std::io::Result<()> {
        let outcome = self.delegate.move_path(source, target, options);
        self.sop(outcome, || {
            format!(
                "move{}: {} -> {}",
                OptionList(options),
                display(source),
                display(target)
            )
        })
    }

    fn set_attribute(
        &self,
        path: &Path,
        attribute: &str,
        value: &AttributeValue,
        options: &[LinkOption],
    ) -> std::io::Result<()> {
        let outcome = self.delegate.set_attribute(path, attribute, value, options);
        self.sop(outcome, || {
            format!("setAttribute[{}={}]: {}", attribute, value, display(path))
        })
    }

    fn create_symbolic_link(
        &self,
        link: &Path,
        target: &Path,
        attrs: &[FileAttribute],
    ) -> std::io::Result<()> {
        let outcome = self.delegate.create_symbolic_link(link, target, attrs);
        self.sop(outcome, || {
            format!("createSymbolicLink: {} -> {}", display(link), display(target))
        })
    }

    fn create_link(&self, link: &Path, existing: &Path) -> std::io::Result<()> {
        let outcome = self.delegate.create_link(link, existing);
        self.sop(outcome, || {
            format!("createLink: {} -> {}", display(link), display(existing))
        })
    }

    fn new_output_stream(
        &self,
        path: &Path,
        options: &[OpenOption],
    ) -> std::io::Result<OutputStream> {
        let outcome = self.delegate.new_output_stream(path, options);
        self.sop(outcome, || {
            format!("newOutputStream{}: {}", OptionList(options), display(path))
        })
    }

    fn new_byte_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> std::io::Result<ByteChannel> {
        let outcome = self.delegate.new_byte_channel(path, options, attrs);
        self.sop_open(outcome, options, || {
            format!("newByteChannel{}: {}", options, display(path))
        })
    }

    fn new_file_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> std::io::Result<std::fs::File> {
        let outcome = self.delegate.new_file_channel(path, options, attrs);
        self.sop_open(outcome, options, || {
            format!("newFileChannel{}: {}", options, display(path))
        })
    }

    fn new_async_file_channel(
        &self,
        path: &Path,
        options: &OpenOptions,
        attrs: &[FileAttribute],
    ) -> std::io::Result<tokio::fs::File> {
        let outcome = self.delegate.new_async_file_channel(path, options, attrs);
        self.sop_open(outcome, options, || {
            format!("newAsynchronousFileChannel{}: {}", options, display(path))
        })
    }

    fn new_input_stream(
        &self,
        path: &Path,
        options: &[OpenOption],
    ) -> std::io::Result<InputStream> {
        self.delegate.new_input_stream(path, options)
    }

    fn new_directory_stream(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        self.delegate.new_directory_stream(dir)
    }

    fn read_attributes(
        &self,
        path: &Path,
        options: &[LinkOption],
    ) -> std::io::Result<FileAttributes> {
        self.delegate.read_attributes(path, options)
    }

    fn check_access(&self, path: &Path, modes: &[AccessMode]) -> std::io::Result<()> {
        self.delegate.check_access(path, modes)
    }

    fn is_same_file(&self, a: &Path, b: &Path) -> std::io::Result<bool> {
        self.delegate.is_same_file(a, b)
    }

    fn is_hidden(&self, path: &Path) -> std::io::Result<bool> {
        self.delegate.is_hidden(path)
    }

    fn read_symbolic_link(&self, link: &Path) -> std::io::Result<PathBuf> {
        self.delegate.read_symbolic_link(link)
    }
}

impl<P> Drop for VerboseFs<P> {
    fn drop(&mut self) {
        if let Err(e) = self.info_stream.close() {
            let reason = e.to_string();
            log_debug!("closing info stream on drop failed: {reason}", reason: reason.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::info_stream::{NoOutputInfoStream, PrintStreamInfoStream, Sink};
    use crate::path::absolute_normalized;
    use crate::testing::{FailingWriter, FaultyProvider, InjectedFailure, SharedBuffer};
    use std::io::{ErrorKind, Write};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    type TestFs = VerboseFs<FaultyProvider<HostFileSystem>>;

    fn fixture() -> (TempDir, SharedBuffer, TestFs) {
        let dir = TempDir::new().expect("create temp dir");
        std::fs::write(dir.path().join("hello.txt"), b"Hello, World!").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        let buffer = SharedBuffer::new();
        let stream = PrintStreamInfoStream::new(Sink::Writer(Box::new(buffer.clone())));
        let fs = VerboseFs::new(FaultyProvider::new(HostFileSystem::new()), Box::new(stream));
        (dir, buffer, fs)
    }

    /// Messages of all records, in order
    fn messages(buffer: &SharedBuffer) -> Vec<String> {
        buffer
            .records()
            .iter()
            .map(|h| {
                assert!(h.starts_with("FS "), "{h}");
                h.split_once("]: ").map(|(_, m)| m.to_string()).unwrap()
            })
            .collect()
    }

    fn p(path: &Path) -> String {
        absolute_normalized(path).display().to_string()
    }

    #[test]
    fn test_each_destructive_operation_logs_once() {
        let (dir, buffer, fs) = fixture();
        let root = dir.path();
        let hello = root.join("hello.txt");

        fs.create_directory(&root.join("made"), &[]).unwrap();
        fs.copy(&hello, &root.join("copy.txt"), &[CopyOption::ReplaceExisting])
            .unwrap();
        fs.move_path(&root.join("copy.txt"), &root.join("moved.txt"), &[])
            .unwrap();
        fs.set_attribute(&hello, "readonly", &AttributeValue::Bool(false), &[])
            .unwrap();
        fs.create_link(&root.join("hard"), &hello).unwrap();
        fs.delete(&root.join("hard")).unwrap();
        assert!(fs.delete_if_exists(&root.join("moved.txt")).unwrap());

        assert_eq!(
            messages(&buffer),
            vec![
                format!("createDirectory: {}", p(&root.join("made"))),
                format!(
                    "copy[REPLACE_EXISTING]: {} -> {}",
                    p(&hello),
                    p(&root.join("copy.txt"))
                ),
                format!(
                    "move[]: {} -> {}",
                    p(&root.join("copy.txt")),
                    p(&root.join("moved.txt"))
                ),
                format!("setAttribute[readonly=false]: {}", p(&hello)),
                format!("createLink: {} -> {}", p(&root.join("hard")), p(&hello)),
                format!("delete: {}", p(&root.join("hard"))),
                format!("deleteIfExists: {}", p(&root.join("moved.txt"))),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symbolic_link_logged() {
        let (dir, buffer, fs) = fixture();
        let link = dir.path().join("link");
        let target = dir.path().join("hello.txt");
        fs.create_symbolic_link(&link, &target, &[]).unwrap();
        assert_eq!(
            messages(&buffer),
            vec![format!("createSymbolicLink: {} -> {}", p(&link), p(&target))]
        );
    }

    #[test]
    fn test_delete_if_exists_missing_file() {
        let (dir, buffer, fs) = fixture();
        let missing = dir.path().join("nonexistent");

        let existed = fs.delete_if_exists(&missing).unwrap();

        assert!(!existed);
        assert_eq!(messages(&buffer), vec![format!("deleteIfExists: {}", p(&missing))]);
    }

    #[test]
    fn test_failed_write_open_is_logged_and_rethrown() {
        let (dir, buffer, fs) = fixture();
        let path = dir.path().join("locked.txt");
        fs.delegate()
            .fail_next(ErrorKind::PermissionDenied, "locked.txt: Permission denied");

        let err = fs
            .new_byte_channel(&path, &OpenOptions::from([OpenOption::Write]), &[])
            .err()
            .unwrap();

        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(err.to_string(), "locked.txt: Permission denied");
        assert!(err.get_ref().unwrap().downcast_ref::<InjectedFailure>().is_some());
        assert_eq!(
            messages(&buffer),
            vec![format!(
                "newByteChannel[WRITE]: {} (FAILED: locked.txt: Permission denied)",
                p(&path)
            )]
        );
    }

    #[test]
    fn test_failure_keeps_cause_chain() {
        let (dir, buffer, fs) = fixture();
        fs.delegate()
            .fail_next_with_cause(ErrorKind::Other, "delete failed", "disk on fire");

        let err = fs.delete(&dir.path().join("hello.txt")).unwrap_err();

        let injected = err
            .get_ref()
            .and_then(|e| e.downcast_ref::<InjectedFailure>())
            .unwrap();
        let cause = std::error::Error::source(injected).unwrap();
        assert_eq!(cause.to_string(), "disk on fire");
        assert!(dir.path().join("hello.txt").exists());
        assert_eq!(buffer.records().len(), 1);
        assert!(messages(&buffer)[0].ends_with("(FAILED: delete failed)"));
    }

    #[test]
    fn test_outcomes_match_unwrapped_provider() {
        let (dir, _buffer, fs) = fixture();
        let bare = HostFileSystem::new();
        let missing = dir.path().join("missing");

        let wrapped = fs.delete(&missing).unwrap_err();
        let direct = bare.delete(&missing).unwrap_err();
        assert_eq!(wrapped.kind(), direct.kind());
        assert_eq!(wrapped.to_string(), direct.to_string());
        assert_eq!(wrapped.raw_os_error(), direct.raw_os_error());

        let wrapped = fs.create_directory(&dir.path().join("subdir"), &[]).unwrap_err();
        let direct = bare.create_directory(&dir.path().join("subdir"), &[]).unwrap_err();
        assert_eq!(wrapped.kind(), direct.kind());
        assert_eq!(wrapped.raw_os_error(), direct.raw_os_error());

        assert_eq!(
            fs.delete_if_exists(&missing).unwrap(),
            bare.delete_if_exists(&missing).unwrap()
        );
    }

    #[test]
    fn test_open_logging_depends_on_options() {
        let (dir, buffer, fs) = fixture();
        let path = dir.path().join("hello.txt");

        drop(fs.new_byte_channel(&path, &OpenOptions::from([OpenOption::Read]), &[]).unwrap());
        drop(fs.new_file_channel(&path, &OpenOptions::from([OpenOption::Read]), &[]).unwrap());
        assert!(buffer.records().is_empty());

        drop(fs.new_byte_channel(&path, &OpenOptions::from([OpenOption::Write]), &[]).unwrap());
        drop(fs.new_file_channel(&path, &OpenOptions::from([OpenOption::Append]), &[]).unwrap());
        drop(fs.new_file_channel(
            &dir.path().join("scratch"),
            &OpenOptions::from([OpenOption::Write, OpenOption::Create, OpenOption::DeleteOnClose]),
            &[],
        )
        .unwrap());

        assert_eq!(
            messages(&buffer),
            vec![
                format!("newByteChannel[WRITE]: {}", p(&path)),
                format!("newFileChannel[APPEND]: {}", p(&path)),
                format!(
                    "newFileChannel[WRITE, CREATE, DELETE_ON_CLOSE]: {}",
                    p(&dir.path().join("scratch"))
                ),
            ]
        );
    }

    #[test]
    fn test_failed_read_open_passes_through_silently() {
        let (dir, buffer, fs) = fixture();
        let err = fs
            .new_byte_channel(&dir.path().join("absent"), &OpenOptions::from([OpenOption::Read]), &[])
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(buffer.records().is_empty());
    }

    #[test]
    fn test_output_stream_always_logged() {
        let (dir, buffer, fs) = fixture();
        let path = dir.path().join("out.txt");
        let mut out = fs.new_output_stream(&path, &[]).unwrap();
        out.write_all(b"data").unwrap();
        drop(out);

        assert_eq!(messages(&buffer), vec![format!("newOutputStream[]: {}", p(&path))]);
    }

    #[tokio::test]
    async fn test_async_channel_logged() {
        use tokio::io::AsyncWriteExt;
        let (dir, buffer, fs) = fixture();
        let path = dir.path().join("async.txt");
        let opts = OpenOptions::from([OpenOption::Write, OpenOption::Create]);

        let mut file = fs.new_async_file_channel(&path, &opts, &[]).unwrap();
        file.write_all(b"x").await.unwrap();

        assert_eq!(
            messages(&buffer),
            vec![format!("newAsynchronousFileChannel[WRITE, CREATE]: {}", p(&path))]
        );
    }

    #[test]
    fn test_reads_and_metadata_produce_no_records() {
        let (dir, buffer, fs) = fixture();
        let hello = dir.path().join("hello.txt");

        let mut text = String::new();
        std::io::Read::read_to_string(&mut fs.new_input_stream(&hello, &[]).unwrap(), &mut text)
            .unwrap();
        assert_eq!(text, "Hello, World!");
        assert_eq!(fs.new_directory_stream(dir.path()).unwrap().len(), 2);
        assert!(fs.read_attributes(&hello, &[]).unwrap().is_file());
        fs.check_access(&hello, &[AccessMode::Read]).unwrap();
        assert!(fs.is_same_file(&hello, &hello).unwrap());
        assert!(!fs.is_hidden(&hello).unwrap());
        assert_eq!(fs.scheme(), "file");

        assert!(buffer.records().is_empty());
    }

    /// Counts every call the decorator makes on its stream
    #[derive(Default)]
    struct CountingStream {
        enabled_calls: AtomicUsize,
        messages: AtomicUsize,
    }

    impl InfoStream for Arc<CountingStream> {
        fn is_enabled(&self, _component: &str) -> bool {
            let _ = self.enabled_calls.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn message(&self, _component: &str, _message: &str) -> Result<()> {
            let _ = self.messages.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_non_destructive_open_never_consults_stream() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("f"), b"x").unwrap();
        let counter = Arc::new(CountingStream::default());
        let fs = VerboseFs::new(HostFileSystem::new(), Box::new(counter.clone()));

        drop(fs.new_byte_channel(&dir.path().join("f"), &OpenOptions::from([OpenOption::Read]), &[])
            .unwrap());
        assert_eq!(counter.enabled_calls.load(Ordering::SeqCst), 0);

        fs.delete(&dir.path().join("f")).unwrap();
        assert_eq!(counter.enabled_calls.load(Ordering::SeqCst), 1);
        assert_eq!(counter.messages.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disabled_stream_records_nothing() {
        let dir = TempDir::new().unwrap();
        let fs = VerboseFs::new(HostFileSystem::new(), Box::new(NoOutputInfoStream));
        fs.create_directory(&dir.path().join("d"), &[]).unwrap();
        assert!(dir.path().join("d").is_dir());
    }

    #[test]
    fn test_record_failure_after_success_is_reported() {
        let dir = TempDir::new().unwrap();
        let stream = PrintStreamInfoStream::to_writer(FailingWriter);
        let fs = VerboseFs::new(HostFileSystem::new(), Box::new(stream));

        let err = fs.create_directory(&dir.path().join("d"), &[]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Other);
        let inner = err.get_ref().and_then(|e| e.downcast_ref::<Error>()).unwrap();
        assert!(matches!(inner, Error::Io(_)));
    }

    #[test]
    fn test_provider_failure_wins_over_record_failure() {
        let dir = TempDir::new().unwrap();
        let stream = PrintStreamInfoStream::to_writer(FailingWriter);
        let fs = VerboseFs::new(HostFileSystem::new(), Box::new(stream));

        let err = fs.delete(&dir.path().join("missing")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.get_ref().is_none());
    }

    #[test]
    fn test_relative_spellings_log_identical_paths() {
        let (_dir, buffer, fs) = fixture();

        assert!(!fs.delete_if_exists(Path::new("no-such-dir/file.txt")).unwrap());
        assert!(
            !fs.delete_if_exists(Path::new("./no-such-dir/../no-such-dir/./file.txt"))
                .unwrap()
        );

        let logged = messages(&buffer);
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[0], logged[1]);
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            logged[0],
            format!("deleteIfExists: {}", cwd.join("no-such-dir/file.txt").display())
        );
    }

    #[inline(never)]
    fn remove_worker_file(fs: &TestFs, path: &Path) {
        fs.delete(path).unwrap();
    }

    #[test]
    fn test_concurrent_operations_produce_whole_records() {
        const THREADS: usize = 12;
        let (dir, buffer, fs) = fixture();
        let fs = Arc::new(fs);
        for i in 0..THREADS {
            std::fs::write(dir.path().join(format!("f{i}")), b"x").unwrap();
        }

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let fs = fs.clone();
                let path = dir.path().join(format!("f{i}"));
                std::thread::Builder::new()
                    .name(format!("worker-{i}"))
                    .spawn(move || remove_worker_file(&fs, &path))
                    .unwrap()
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // Split into records: a header followed by its own frame lines
        let contents = buffer.contents();
        let mut records: Vec<(&str, Vec<&str>)> = Vec::new();
        for line in contents.lines() {
            if line.starts_with("FS ") {
                records.push((line, Vec::new()));
            } else {
                assert!(line.starts_with("\tat "), "torn line: {line:?}");
                records.last_mut().expect("frame before any header").1.push(line);
            }
        }
        assert_eq!(records.len(), THREADS);

        let mut seen: Vec<usize> = Vec::new();
        for (header, frames) in &records {
            let i: usize = header
                .split("; worker-")
                .nth(1)
                .and_then(|rest| rest.split(']').next())
                .and_then(|n| n.parse().ok())
                .unwrap_or_else(|| panic!("no worker thread in {header}"));
            assert!(
                header.ends_with(&format!("]: delete: {}", p(&dir.path().join(format!("f{i}"))))),
                "{header}"
            );
            assert!(
                frames.first().is_some_and(|f| f.contains("remove_worker_file")),
                "{header}: {frames:?}"
            );
            seen.push(i);
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..THREADS).collect::<Vec<_>>());
    }

    #[test]
    fn test_time_beyond_calendar_range_keeps_outcome() {
        let (dir, buffer, fs) = fixture();
        let far = std::time::UNIX_EPOCH + std::time::Duration::from_secs(1 << 45);
        let hello = dir.path().join("hello.txt");
        let value = AttributeValue::Time(far);

        let direct = HostFileSystem::new().set_attribute(&hello, "lastModifiedTime", &value, &[]);
        let wrapped = fs.set_attribute(&hello, "lastModifiedTime", &value, &[]);

        assert_eq!(wrapped.is_ok(), direct.is_ok());
        let logged = messages(&buffer);
        assert_eq!(logged.len(), 1);
        assert!(
            logged[0].starts_with(&format!("setAttribute[lastModifiedTime={far:?}]: {}", p(&hello))),
            "{}",
            logged[0]
        );
    }

    #[test]
    fn test_empty_path_logged_as_working_directory() {
        let (_dir, buffer, fs) = fixture();
        let cwd = std::env::current_dir().unwrap();

        let _ = fs.delete_if_exists(Path::new(""));

        let logged = messages(&buffer);
        assert_eq!(logged.len(), 1);
        assert!(
            logged[0].starts_with(&format!("deleteIfExists: {}", p(&cwd))),
            "{}",
            logged[0]
        );
        assert!(Path::new(logged[0].trim_start_matches("deleteIfExists: ")).is_absolute());
    }

    #[test]
    fn test_record_stack_starts_at_caller() {
        let (dir, buffer, fs) = fixture();
        fs.delete(&dir.path().join("hello.txt")).unwrap();

        let contents = buffer.contents();
        let frames: Vec<&str> = contents.lines().skip(1).collect();
        assert!(
            frames[0].contains("test_record_stack_starts_at_caller"),
            "first frame: {:?}",
            frames.first()
        );
        for frame in frames {
            assert!(!frame.starts_with("\tat <verbosefs::verbose::VerboseFs"), "{frame}");
            assert!(!frame.starts_with("\tat verbosefs::verbose::VerboseFs"), "{frame}");
            assert!(!frame.starts_with("\tat verbosefs::info_stream::"), "{frame}");
            assert!(!frame.starts_with("\tat std::backtrace"), "{frame}");
        }
    }
}
