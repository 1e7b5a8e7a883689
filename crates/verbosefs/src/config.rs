use crate::error::{Error, Result};
use crate::info_stream::{InfoStream, PrintStreamInfoStream, Sink};
use crate::options::OpenOption;
use crate::provider::FileSystemProvider;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the audit log file
pub const LOGFILE_ENV: &str = "VERBOSEFS_LOGFILE";

/// Where VerboseFS sends its records
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerboseFsConfig {
    /// Append records to this file; stdout when absent
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl VerboseFsConfig {
    /// Read `VERBOSEFS_LOGFILE`; unset or empty means stdout
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            log_file: std::env::var_os(LOGFILE_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(text)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }

    #[must_use]
    pub fn with_log_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Build the info stream this configuration describes.
    ///
    /// The log file is opened through `provider` for create+append. Failing
    /// to open it is an error; there is no fallback to stdout.
    pub fn open_info_stream<P: FileSystemProvider>(
        &self,
        provider: &P,
    ) -> Result<Box<dyn InfoStream>> {
        match &self.log_file {
            None => Ok(Box::new(PrintStreamInfoStream::stdout())),
            Some(path) => {
                let out = provider
                    .new_output_stream(path, &[OpenOption::Create, OpenOption::Append])
                    .map_err(|e| Error::log_file(path, e))?;
                Ok(Box::new(PrintStreamInfoStream::new(Sink::Writer(out))))
            }
        }
    }
}
