//! World configuration.
//!
//! [`EcsConfig`] is built once by the host, either in code with the `with_*`
//! builder methods or from a JSON document, and cloned into the [`World`]
//! at construction. Mutating the host's copy afterwards has no effect on a
//! running world.
//!
//! ```json
//! {
//!     "use_caching": true,
//!     "logging_enabled": true,
//!     "logs": "SYSTEM_ADDED | UNEXPECTED_CACHE_MISS"
//! }
//! ```
//!
//! [`World`]: crate::World

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fallback::Unhandled;

bitflags! {
    /// Diagnostics that can be individually switched on or off.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Logs: u32 {
        /// A system was added to the world.
        const SYSTEM_ADDED = 1;
        /// A system was removed from the world.
        const SYSTEM_REMOVED = 1 << 1;
        /// A cached query was built for a different entity type and had to
        /// be rebuilt.
        const UNEXPECTED_CACHE_MISS = 1 << 2;
    }
}

/// User fallback for systems no built-in capability could execute.
///
/// Returns `true` if it handled the system.
pub type SystemResolver = Rc<dyn Fn(&mut Unhandled<'_>) -> bool>;

/// Configuration applied to a [`World`](crate::World).
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EcsConfig {
    use_caching: bool,
    logging_enabled: bool,
    logs: Logs,
    #[serde(skip)]
    system_resolver: Option<SystemResolver>,
}

impl EcsConfig {
    /// Parse a configuration from a JSON string. Missing keys take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Enable or disable query caching.
    #[must_use]
    pub fn with_caching(mut self, use_caching: bool) -> Self {
        self.use_caching = use_caching;
        self
    }

    /// Enable or disable all diagnostics.
    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Select which optional diagnostics are emitted.
    #[must_use]
    pub fn with_logs(mut self, logs: Logs) -> Self {
        self.logs = logs;
        self
    }

    /// Set the fallback for systems without a built-in capability.
    #[must_use]
    pub fn with_system_resolver(
        mut self,
        resolver: impl Fn(&mut Unhandled<'_>) -> bool + 'static,
    ) -> Self {
        self.system_resolver = Some(Rc::new(resolver));
        self
    }

    /// Whether query caching is enabled.
    #[must_use]
    pub fn use_caching(&self) -> bool {
        self.use_caching
    }

    /// Whether diagnostics are enabled at all.
    #[must_use]
    pub fn logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    /// The selected optional diagnostics.
    #[must_use]
    pub fn logs(&self) -> Logs {
        self.logs
    }

    /// The fallback resolver, if one is set.
    #[must_use]
    pub fn system_resolver(&self) -> Option<&SystemResolver> {
        self.system_resolver.as_ref()
    }

    /// Returns `true` if every diagnostic in `logs` should be emitted.
    #[must_use]
    pub fn is_logger_enabled(&self, logs: Logs) -> bool {
        self.logging_enabled && self.logs.contains(logs)
    }
}

impl Default for EcsConfig {
    fn default() -> Self {
        Self {
            use_caching: true,
            logging_enabled: true,
            logs: Logs::all(),
            system_resolver: None,
        }
    }
}

impl fmt::Debug for EcsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcsConfig")
            .field("use_caching", &self.use_caching)
            .field("logging_enabled", &self.logging_enabled)
            .field("logs", &self.logs)
            .field("system_resolver", &self.system_resolver.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EcsConfig::default();
        assert!(config.use_caching());
        assert!(config.logging_enabled());
        assert_eq!(config.logs(), Logs::all());
        assert!(config.system_resolver().is_none());
    }

    #[test]
    fn test_logger_gate() {
        let config = EcsConfig::default().with_logs(Logs::SYSTEM_ADDED);
        assert!(config.is_logger_enabled(Logs::SYSTEM_ADDED));
        assert!(!config.is_logger_enabled(Logs::UNEXPECTED_CACHE_MISS));

        let silent = config.with_logging(false);
        assert!(!silent.is_logger_enabled(Logs::SYSTEM_ADDED));
    }

    #[test]
    fn test_from_json_partial() {
        let config = EcsConfig::from_json_str(r#"{ "use_caching": false }"#).unwrap();
        assert!(!config.use_caching());
        assert!(config.logging_enabled());
        assert_eq!(config.logs(), Logs::all());
    }

    #[test]
    fn test_from_json_log_mask() {
        let config = EcsConfig::from_json_str(
            r#"{ "logging_enabled": true, "logs": "SYSTEM_ADDED | UNEXPECTED_CACHE_MISS" }"#,
        )
        .unwrap();
        assert_eq!(
            config.logs(),
            Logs::SYSTEM_ADDED | Logs::UNEXPECTED_CACHE_MISS
        );
    }

    #[test]
    fn test_from_json_invalid() {
        let err = EcsConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = EcsConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecs.json");
        std::fs::write(
            &path,
            r#"{ "use_caching": false, "logging_enabled": false, "logs": "SYSTEM_REMOVED" }"#,
        )
        .unwrap();

        let config = EcsConfig::from_json_file(&path).unwrap();
        assert!(!config.use_caching());
        assert!(!config.logging_enabled());
        assert_eq!(config.logs(), Logs::SYSTEM_REMOVED);
        assert!(config.system_resolver().is_none());
    }

    #[test]
    fn test_from_json_file_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecs.json");
        std::fs::write(&path, "use_caching = false").unwrap();

        let err = EcsConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = EcsConfig::default();
        let copy = original.clone();
        let changed = original.with_caching(false).with_system_resolver(|_| true);
        assert!(copy.use_caching());
        assert!(copy.system_resolver().is_none());
        assert!(changed.system_resolver().is_some());
    }
}
