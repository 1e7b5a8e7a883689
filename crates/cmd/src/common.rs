use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use diagnostics::log_debug;
use verbosefs::{HostFileSystem, VerboseFs, VerboseFsConfig};

/// Settings shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct FsContext {
    /// Overrides the log file from the config file or environment
    pub log_file: Option<PathBuf>,
    /// YAML config file; the environment is used when absent
    pub config: Option<PathBuf>,
}

impl FsContext {
    #[must_use]
    pub fn new(log_file: Option<PathBuf>, config: Option<PathBuf>) -> Self {
        Self { log_file, config }
    }

    /// Resolve the effective configuration: file or environment, then overrides
    pub fn resolve_config(&self) -> Result<VerboseFsConfig> {
        let config = match &self.config {
            Some(path) => VerboseFsConfig::from_yaml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => VerboseFsConfig::from_env(),
        };
        Ok(match &self.log_file {
            Some(path) => config.with_log_file(path),
            None => config,
        })
    }

    /// Wrap the host filesystem with the resolved configuration
    pub fn open_fs(&self) -> Result<VerboseFs<HostFileSystem>> {
        let config = self.resolve_config()?;
        let destination = config
            .log_file
            .as_deref()
            .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
        log_debug!("Recording filesystem activity to {destination}", destination: destination.as_str());

        VerboseFs::with_config(HostFileSystem::new(), &config)
            .with_context(|| format!("opening audit log {destination}"))
    }
}

/// Parse an octal permission string such as `644` or `0o755`
pub fn parse_mode(text: &str) -> Result<u32> {
    let digits = text.trim_start_matches("0o");
    u32::from_str_radix(digits, 8)
        .ok()
        .filter(|mode| *mode <= 0o7777)
        .with_context(|| format!("invalid mode '{text}', expected octal like 644"))
}

/// Final path component for listings
#[must_use]
pub fn entry_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
