//! Configuration for the access policy.

/// Realm used when none is configured.
pub const DEFAULT_REALM: &str = "Atrium";

/// Configuration for the [`AccessPolicy`](crate::AccessPolicy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Realm announced in the `WWW-Authenticate` challenge.
    pub realm: String,
    /// Whether to log every decision at debug level.
    pub log_decisions: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            realm: DEFAULT_REALM.to_string(),
            log_decisions: false,
        }
    }
}

impl PolicyConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the realm.
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    /// Enable or disable decision logging.
    pub fn with_log_decisions(mut self, enabled: bool) -> Self {
        self.log_decisions = enabled;
        self
    }

    /// Create a development configuration.
    pub fn development() -> Self {
        Self {
            log_decisions: true,
            ..Self::default()
        }
    }

    /// Create a production configuration.
    pub fn production() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PolicyConfig::default();
        assert_eq!(config.realm, "Atrium");
        assert!(!config.log_decisions);
    }

    #[test]
    fn test_builder_pattern() {
        let config = PolicyConfig::new()
            .with_realm("User Directory")
            .with_log_decisions(true);
        assert_eq!(config.realm, "User Directory");
        assert!(config.log_decisions);
    }

    #[test]
    fn test_presets() {
        assert!(PolicyConfig::development().log_decisions);
        assert!(!PolicyConfig::production().log_decisions);
    }
}
