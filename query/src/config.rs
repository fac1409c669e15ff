//! Configuration for running `update-alternatives --query`.
//!
//! Loaded from a YAML file or built in code. Every field has a default, so a
//! file only needs the settings it changes.
//!
//! # Example YAML
//!
//! ```yaml
//! program: /usr/bin/update-alternatives
//! admin_dir: /srv/chroot/var/lib/dpkg/alternatives
//! alt_dir: /srv/chroot/etc/alternatives
//! timeout_ms: 2000
//! ```

use std::ffi::OsString;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Program run when no other is configured.
pub const DEFAULT_PROGRAM: &str = "update-alternatives";

/// Wall-clock limit for one query (milliseconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Settings controlling how the query program is invoked.
///
/// # Examples
///
/// ```
/// use query_alternatives::QueryConfig;
///
/// let config: QueryConfig = serde_yaml::from_str("timeout_ms: 250").unwrap();
/// assert_eq!(config.program, "update-alternatives");
/// assert_eq!(config.timeout_ms, Some(250));
/// assert_eq!(
///     config.command_args("java"),
///     ["--query", "java"].map(std::ffi::OsString::from)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Executable to run, looked up on `$PATH` when not a path.
    pub program: String,
    /// Administrative directory, passed as `--admindir`.
    pub admin_dir: Option<PathBuf>,
    /// Alternatives symlink directory, passed as `--altdir`.
    pub alt_dir: Option<PathBuf>,
    /// Time limit for one query. `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            admin_dir: None,
            alt_dir: None,
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl QueryConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::QueryError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::QueryError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::QueryError::Io) if the file cannot be written,
    /// or [`Yaml`](crate::QueryError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Builds the argument list for querying group `name`.
    ///
    /// Directory options come first; `update-alternatives` requires them
    /// before the action.
    pub fn command_args(&self, name: &str) -> Vec<OsString> {
        let mut args = Vec::new();
        if let Some(dir) = &self.admin_dir {
            args.push(OsString::from("--admindir"));
            args.push(dir.clone().into_os_string());
        }
        if let Some(dir) = &self.alt_dir {
            args.push(OsString::from("--altdir"));
            args.push(dir.clone().into_os_string());
        }
        args.push(OsString::from("--query"));
        args.push(OsString::from(name));
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
program: /usr/sbin/update-alternatives
admin_dir: /srv/root/var/lib/dpkg/alternatives
alt_dir: /srv/root/etc/alternatives
timeout_ms: 1500
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: QueryConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.program, "/usr/sbin/update-alternatives");
        assert_eq!(
            config.admin_dir.as_deref(),
            Some(Path::new("/srv/root/var/lib/dpkg/alternatives"))
        );
        assert_eq!(
            config.alt_dir.as_deref(),
            Some(Path::new("/srv/root/etc/alternatives"))
        );
        assert_eq!(config.timeout_ms, Some(1500));
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: QueryConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, QueryConfig::default());
        assert_eq!(config.timeout_ms, Some(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_null_timeout_disables_limit() {
        let config: QueryConfig = serde_yaml::from_str("timeout_ms: null").unwrap();
        assert_eq!(config.timeout_ms, None);
    }

    #[test]
    fn test_command_args_default() {
        let args = QueryConfig::default().command_args("java");
        assert_eq!(args, [OsString::from("--query"), OsString::from("java")]);
    }

    #[test]
    fn test_command_args_puts_directories_first() {
        let config: QueryConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let args = config.command_args("editor");
        assert_eq!(
            args,
            [
                "--admindir",
                "/srv/root/var/lib/dpkg/alternatives",
                "--altdir",
                "/srv/root/etc/alternatives",
                "--query",
                "editor",
            ]
            .map(OsString::from)
        );
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.yml");

        let original: QueryConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = QueryConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = QueryConfig::load(dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, crate::QueryError::Io(_)));
    }
}
