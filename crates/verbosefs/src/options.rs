//! Option and attribute types accepted by provider operations
//!
//! Names render in upper snake case (`WRITE`, `REPLACE_EXISTING`) and lists
//! render as `[A, B]`, which is the form that appears in audit messages.

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// How a file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpenOption {
    Read,
    Write,
    Append,
    TruncateExisting,
    Create,
    CreateNew,
    DeleteOnClose,
    Sparse,
    Sync,
    Dsync,
    NoFollowLinks,
}

/// Open options that make a channel-opening call destructive
pub const DESTRUCTIVE_OPTIONS: [OpenOption; 3] = [
    OpenOption::Append,
    OpenOption::Write,
    OpenOption::DeleteOnClose,
];

impl OpenOption {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            OpenOption::Read => "READ",
            OpenOption::Write => "WRITE",
            OpenOption::Append => "APPEND",
            OpenOption::TruncateExisting => "TRUNCATE_EXISTING",
            OpenOption::Create => "CREATE",
            OpenOption::CreateNew => "CREATE_NEW",
            OpenOption::DeleteOnClose => "DELETE_ON_CLOSE",
            OpenOption::Sparse => "SPARSE",
            OpenOption::Sync => "SYNC",
            OpenOption::Dsync => "DSYNC",
            OpenOption::NoFollowLinks => "NOFOLLOW_LINKS",
        }
    }

    #[must_use]
    pub fn is_destructive(self) -> bool {
        DESTRUCTIVE_OPTIONS.contains(&self)
    }
}

impl fmt::Display for OpenOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How copy and move treat the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CopyOption {
    ReplaceExisting,
    CopyAttributes,
    AtomicMove,
    NoFollowLinks,
}

impl fmt::Display for CopyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CopyOption::ReplaceExisting => "REPLACE_EXISTING",
            CopyOption::CopyAttributes => "COPY_ATTRIBUTES",
            CopyOption::AtomicMove => "ATOMIC_MOVE",
            CopyOption::NoFollowLinks => "NOFOLLOW_LINKS",
        })
    }
}

/// Whether symbolic links are followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LinkOption {
    NoFollowLinks,
}

impl fmt::Display for LinkOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NOFOLLOW_LINKS")
    }
}

/// Requested access for `check_access`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    Execute,
}

/// Attribute applied atomically when a file, directory or link is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAttribute {
    /// Unix permission bits, e.g. `0o640`
    Permissions(u32),
}

/// Value passed to `set_attribute`
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Time(SystemTime),
    Permissions(u32),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Time(t) => match utc_time(*t) {
                Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
                None => write!(f, "{t:?}"),
            },
            AttributeValue::Permissions(mode) => write!(f, "{mode:o}"),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

/// `t` as a UTC date-time, `None` when chrono cannot represent it
fn utc_time(t: SystemTime) -> Option<DateTime<Utc>> {
    let (secs, nanos) = match t.duration_since(UNIX_EPOCH) {
        Ok(after) => (i64::try_from(after.as_secs()).ok()?, after.subsec_nanos()),
        Err(before) => {
            let before = before.duration();
            let secs = i64::try_from(before.as_secs()).ok()?;
            match before.subsec_nanos() {
                0 => (secs.checked_neg()?, 0),
                n => (secs.checked_neg()?.checked_sub(1)?, 1_000_000_000 - n),
            }
        }
    };
    DateTime::from_timestamp(secs, nanos)
}

/// Ordered set of open options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenOptions(BTreeSet<OpenOption>);

impl OpenOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, option: OpenOption) -> Self {
        _ = self.0.insert(option);
        self
    }

    #[must_use]
    pub fn contains(&self, option: OpenOption) -> bool {
        self.0.contains(&option)
    }

    /// True when any option in the set is one of `DESTRUCTIVE_OPTIONS`
    #[must_use]
    pub fn contains_destructive(&self) -> bool {
        self.0.iter().any(|o| o.is_destructive())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = OpenOption> + '_ {
        self.0.iter().copied()
    }
}

impl<const N: usize> From<[OpenOption; N]> for OpenOptions {
    fn from(options: [OpenOption; N]) -> Self {
        Self(options.into_iter().collect())
    }
}

impl From<&[OpenOption]> for OpenOptions {
    fn from(options: &[OpenOption]) -> Self {
        Self(options.iter().copied().collect())
    }
}

impl FromIterator<OpenOption> for OpenOptions {
    fn from_iter<I: IntoIterator<Item = OpenOption>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for OpenOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", OptionList(&self.0.iter().copied().collect::<Vec<_>>()))
    }
}

/// Renders a slice of options as `[A, B]`
pub struct OptionList<'a, T>(pub &'a [T]);

impl<T: fmt::Display> fmt::Display for OptionList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, option) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{option}")?;
        }
        f.write_str("]")
    }
}
