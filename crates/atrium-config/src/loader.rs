//! Layered configuration loading.
//!
//! Layers apply in order, each replacing what came before: built-in defaults
//! or a preset, then a TOML or JSON file, then `PREFIX__SECTION__KEY`
//! environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use atrium_telemetry::LogFormat;

use crate::{AtriumConfig, ConfigError, VerifierKind};

/// Configuration loader with layered approach.
///
/// # Example
///
/// ```no_run
/// use atrium_config::ConfigLoader;
///
/// # fn main() -> Result<(), atrium_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("atrium.toml")?
///     .with_env_prefix("ATRIUM")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: AtriumConfig,
    env_prefix: Option<String>,
    file_loaded: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: AtriumConfig::default(),
            env_prefix: None,
            file_loaded: false,
        }
    }

    /// Reset to default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = AtriumConfig::default();
        self
    }

    /// Start with the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use atrium_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = AtriumConfig::development();
        self
    }

    /// Start with the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = AtriumConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format follows the extension: `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed,
    /// or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        self.config = Self::parse_file(&content, path)?;
        self.file_loaded = true;

        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`toml` or `json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    ///
    /// # Example
    ///
    /// ```
    /// use atrium_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [server]
    ///     http_addr = "127.0.0.1:3000"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => return Err(ConfigError::UnsupportedFormat(format.to_string())),
        };
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// With prefix `ATRIUM`, `ATRIUM__SERVER__HTTP_ADDR=127.0.0.1:9000`
    /// overrides `server.http_addr`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file from the current directory or its parents.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if the file exists but is malformed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns `true` if a configuration file was loaded.
    #[must_use]
    pub const fn file_loaded(&self) -> bool {
        self.file_loaded
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override cannot be parsed or the final
    /// configuration is invalid.
    pub fn load(mut self) -> Result<AtriumConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Finalize without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> AtriumConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<AtriumConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let mut vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
        else {
            // Shares the prefix but not the separator, e.g. ATRIUM_CONFIG.
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => {
                self.config.server.http_addr = value.to_string();
            }
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                self.config.server.shutdown_timeout_secs = parse_int(key, value)?;
            }
            ["SERVER", "REQUEST_TIMEOUT_MS"] => {
                self.config.server.request_timeout_ms = parse_int(key, value)?;
            }
            ["SERVER", "MAX_BODY_BYTES"] => {
                self.config.server.max_body_bytes = value
                    .parse()
                    .map_err(|_| ConfigError::env(key, "expected integer"))?;
            }

            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool_var(key, value)?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = value
                    .parse::<LogFormat>()
                    .map_err(|_| ConfigError::env(key, "expected 'json' or 'pretty'"))?;
            }
            ["LOGGING", "ANSI_ENABLED"] => {
                self.config.logging.ansi_enabled = parse_bool_var(key, value)?;
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                self.config.logging.include_location = parse_bool_var(key, value)?;
            }

            ["ACCESS", "REALM"] => {
                self.config.access.realm = value.to_string();
            }
            ["ACCESS", "VERIFIER"] => {
                self.config.access.verifier = match value.to_lowercase().as_str() {
                    "presence" => VerifierKind::Presence,
                    "static" => VerifierKind::Static,
                    _ => return Err(ConfigError::UnknownVerifier(value.to_string())),
                };
            }

            ["VIEW", "TITLE"] => {
                self.config.view.title = non_empty(value);
            }
            ["VIEW", "LAYOUT_PATH"] => {
                self.config.view.layout_path = non_empty(value).map(PathBuf::from);
            }

            ["STORE", "SEED_PATH"] => {
                self.config.store.seed_path = non_empty(value).map(PathBuf::from);
            }

            _ => {
                tracing::debug!(var = key, "ignoring unknown configuration override");
            }
        }

        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_int(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env(key, "expected integer"))
}

fn parse_bool_var(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env(key, "expected boolean"))
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::Role;
    use std::io::Write;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.server.http_addr, "0.0.0.0:8080");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.logging.ansi_enabled);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"server": {"http_addr": "127.0.0.1:3000"}}"#;
        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_loader_rejects_unknown_format() {
        assert!(ConfigLoader::new().with_string("", "yaml").is_err());
    }

    #[test]
    fn test_loader_rejects_unknown_fields() {
        let toml = r#"
            [server]
            http_port = 8080
        "#;
        assert!(matches!(
            ConfigLoader::new().with_string(toml, "toml"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/atrium.toml");
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let loader = ConfigLoader::new()
            .with_optional_file("/nonexistent/atrium.toml")
            .unwrap();
        assert!(!loader.file_loaded());
        assert_eq!(loader.load().unwrap().server.http_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [access]
            realm = "Staff"

            [[routes]]
            pattern = "/users/:user-id"
            view = "user-profile"
            roles = ["logged-in"]
            "#
        )
        .unwrap();

        let loader = ConfigLoader::new().with_file(file.path()).unwrap();
        assert!(loader.file_loaded());

        let config = loader.load().unwrap();
        assert_eq!(config.access.realm, "Staff");
        assert_eq!(config.routes.len(), 1);
        assert!(config.routes[0].roles.contains(Role::LoggedIn));
    }

    #[test]
    fn test_loader_with_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(ConfigLoader::new().with_file(file.path()).is_err());
    }

    #[test]
    fn test_load_validates() {
        let toml = r#"
            [[routes]]
            pattern = "/users"
            roles = ["anyone"]
        "#;
        let loader = ConfigLoader::new().with_string(toml, "toml").unwrap();
        assert!(loader.load().is_err());
    }

    #[test]
    fn test_loader_load_unvalidated() {
        let mut config = ConfigLoader::new().load_unvalidated();
        config.server.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    // Overrides are applied through apply_env_var directly since mutating the
    // process environment needs unsafe code, which this workspace forbids.

    #[test]
    fn test_apply_env_var_server() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__SERVER__HTTP_ADDR", "192.168.1.1:9000", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__SERVER__REQUEST_TIMEOUT_MS", "500", "TEST")
            .unwrap();
        assert_eq!(loader.config.server.http_addr, "192.168.1.1:9000");
        assert_eq!(loader.config.server.request_timeout_ms, 500);

        loader
            .apply_env_var("TEST__SERVER__MAX_BODY_BYTES", "4096", "TEST")
            .unwrap();
        assert_eq!(loader.config.server.max_body_bytes, 4096);
        assert!(loader
            .apply_env_var("TEST__SERVER__MAX_BODY_BYTES", "-1", "TEST")
            .is_err());
    }

    #[test]
    fn test_apply_env_var_invalid_integer() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__SERVER__SHUTDOWN_TIMEOUT_SECS", "soon", "TEST");
        assert!(matches!(result, Err(ConfigError::Env { .. })));
    }

    #[test]
    fn test_apply_env_var_logging() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__LOGGING__LEVEL", "debug", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__FORMAT", "pretty", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__ANSI_ENABLED", "yes", "TEST").unwrap();
        assert_eq!(loader.config.logging.level, "debug");
        assert_eq!(loader.config.logging.format, LogFormat::Pretty);
        assert!(loader.config.logging.ansi_enabled);

        assert!(loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST").is_err());
    }

    #[test]
    fn test_apply_env_var_access() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__ACCESS__REALM", "Staff", "TEST").unwrap();
        loader.apply_env_var("TEST__ACCESS__VERIFIER", "static", "TEST").unwrap();
        assert_eq!(loader.config.access.realm, "Staff");
        assert_eq!(loader.config.access.verifier, VerifierKind::Static);

        let result = loader.apply_env_var("TEST__ACCESS__VERIFIER", "ldap", "TEST");
        assert!(matches!(result, Err(ConfigError::UnknownVerifier(ref v)) if v == "ldap"));
    }

    #[test]
    fn test_apply_env_var_paths() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__STORE__SEED_PATH", "/srv/users.json", "TEST").unwrap();
        loader.apply_env_var("TEST__VIEW__TITLE", "", "TEST").unwrap();
        assert_eq!(
            loader.config.store.seed_path,
            Some(PathBuf::from("/srv/users.json"))
        );
        assert_eq!(loader.config.view.title, None);
    }

    #[test]
    fn test_apply_env_var_ignores_unrelated_keys() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST_CONFIG", "atrium.toml", "TEST").unwrap();
        loader.apply_env_var("TEST__UNKNOWN__KEY", "x", "TEST").unwrap();
        assert_eq!(loader.config, AtriumConfig::default());
    }
}
