//! Store target and runtime configuration.
//!
//! # Responsibility
//! - Parse the single store target string into a typed location.
//! - Resolve defaults and environment overrides for callers.
//!
//! # Invariants
//! - Only the `sqlite` engine is accepted; unknown schemes are rejected.
//! - Repository code never sees the raw target string.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Target used when nothing else is configured.
pub const DEFAULT_STORE_TARGET: &str = "sqlite:address-book.sqlite3";
/// Environment variable overriding the store target.
pub const STORE_TARGET_ENV: &str = "ADDRESS_BOOK_STORE";
/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "ADDRESS_BOOK_LOG_LEVEL";
/// Environment variable enabling file logs in the given absolute directory.
pub const LOG_DIR_ENV: &str = "ADDRESS_BOOK_LOG_DIR";

const SQLITE_SCHEME: &str = "sqlite";
const MEMORY_LOCATION: &str = ":memory:";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyTarget,
    UnsupportedEngine(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTarget => write!(f, "store target cannot be empty"),
            Self::UnsupportedEngine(engine) => write!(
                f,
                "unsupported store engine `{engine}`; expected `{SQLITE_SCHEME}`"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Parsed store location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// File-backed SQLite database.
    SqliteFile(PathBuf),
    /// Private in-memory SQLite database, dropped with the connection.
    SqliteMemory,
}

impl StoreTarget {
    /// Parses `sqlite:<path>`, `sqlite::memory:` or a bare file path.
    ///
    /// # Errors
    /// - `EmptyTarget` for blank input.
    /// - `UnsupportedEngine` for any scheme other than `sqlite`.
    pub fn parse(target: &str) -> ConfigResult<Self> {
        let trimmed = target.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyTarget);
        }

        let location = match split_scheme(trimmed) {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case(SQLITE_SCHEME) => rest,
            Some((scheme, _)) => return Err(ConfigError::UnsupportedEngine(scheme.to_string())),
            None => trimmed,
        };

        let location = location.trim();
        if location.is_empty() {
            return Err(ConfigError::EmptyTarget);
        }
        if location == MEMORY_LOCATION {
            return Ok(Self::SqliteMemory);
        }
        Ok(Self::SqliteFile(PathBuf::from(location)))
    }

    /// Builds a file target from an already-resolved path.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::SqliteFile(path.as_ref().to_path_buf())
    }

    /// Short label used in log lines (`file` or `memory`).
    pub fn mode(&self) -> &'static str {
        match self {
            Self::SqliteFile(_) => "file",
            Self::SqliteMemory => "memory",
        }
    }
}

impl Default for StoreTarget {
    fn default() -> Self {
        Self::SqliteFile(PathBuf::from("address-book.sqlite3"))
    }
}

impl Display for StoreTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SqliteFile(path) => write!(f, "{SQLITE_SCHEME}:{}", path.display()),
            Self::SqliteMemory => write!(f, "{SQLITE_SCHEME}:{MEMORY_LOCATION}"),
        }
    }
}

/// Resolved runtime configuration for the address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub target: StoreTarget,
    pub log_level: String,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            target: StoreTarget::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Reads overrides from the process environment.
    ///
    /// Unset variables fall back to defaults; a set but invalid target is an
    /// error rather than a silent fallback.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let target = match lookup(STORE_TARGET_ENV) {
            Some(raw) => StoreTarget::parse(&raw)?,
            None => StoreTarget::parse(DEFAULT_STORE_TARGET)?,
        };
        let log_level = lookup(LOG_LEVEL_ENV)
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| default_log_level().to_string());
        let log_dir = lookup(LOG_DIR_ENV)
            .map(|dir| dir.trim().to_string())
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            target,
            log_level,
            log_dir,
        })
    }
}

fn split_scheme(target: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = target.split_once(':')?;
    // Windows drive letters (`C:\...`) are paths, not schemes.
    if scheme.len() < 2 || !scheme.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some((scheme, rest))
}
