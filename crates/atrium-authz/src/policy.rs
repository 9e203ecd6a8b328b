//! Role-based access decisions.

use std::fmt;
use std::sync::Arc;

use atrium_core::{Credentials, Role, RoleSet};
use http::HeaderValue;

use crate::config::PolicyConfig;
use crate::error::{AuthzError, AuthzResult};
use crate::verifier::{CredentialVerifier, PresenceOnly};

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The route permits no roles at all.
    NoPermittedRoles,
    /// The route requires login and no usable credentials were presented.
    MissingCredentials,
    /// Credentials were presented but the verifier rejected them.
    RejectedCredentials,
}

impl DenyReason {
    /// Returns a short machine-readable name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoPermittedRoles => "no_permitted_roles",
            Self::MissingCredentials => "missing_credentials",
            Self::RejectedCredentials => "rejected_credentials",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The caller may proceed.
    Allow,
    /// The caller must be challenged.
    Deny(DenyReason),
}

impl Decision {
    /// Returns `true` for [`Decision::Allow`].
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Evaluates a route's permitted roles against the caller's credentials.
///
/// The rules, in order:
///
/// 1. [`Role::Anyone`] in the set allows unconditionally.
/// 2. [`Role::LoggedIn`] in the set allows iff credentials with a non-empty
///    username are presented and accepted by the verifier.
/// 3. Everything else is denied, so an empty role set always denies.
///
/// # Example
///
/// ```
/// use atrium_authz::{AccessPolicy, Decision};
/// use atrium_core::{Credentials, RoleSet};
///
/// let policy = AccessPolicy::default();
/// let dave = Credentials::new("dave", "");
///
/// assert!(policy.authorize(None, &RoleSet::anyone()).is_allowed());
/// assert!(policy.authorize(Some(&dave), &RoleSet::logged_in()).is_allowed());
/// assert!(!policy.authorize(None, &RoleSet::logged_in()).is_allowed());
/// assert!(!policy.authorize(Some(&dave), &RoleSet::empty()).is_allowed());
/// ```
#[derive(Clone)]
pub struct AccessPolicy {
    config: PolicyConfig,
    verifier: Arc<dyn CredentialVerifier>,
    challenge: HeaderValue,
}

impl AccessPolicy {
    /// Creates a policy with the presence-only verifier.
    pub fn new(config: PolicyConfig) -> AuthzResult<Self> {
        Self::with_verifier(config, Arc::new(PresenceOnly))
    }

    /// Creates a policy with a custom verifier.
    ///
    /// Fails if the realm cannot be carried in a header.
    pub fn with_verifier(
        config: PolicyConfig,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> AuthzResult<Self> {
        let challenge = challenge_value(&config.realm)?;
        Ok(Self {
            config,
            verifier,
            challenge,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Returns the realm.
    pub fn realm(&self) -> &str {
        &self.config.realm
    }

    /// Returns the `WWW-Authenticate` value sent on denial.
    pub fn challenge(&self) -> &HeaderValue {
        &self.challenge
    }

    /// Decides whether a caller may reach a route permitting `roles`.
    pub fn authorize(&self, credentials: Option<&Credentials>, roles: &RoleSet) -> Decision {
        let decision = self.evaluate(credentials, roles);

        if self.config.log_decisions {
            tracing::debug!(
                roles = %roles,
                caller = %credentials.map_or_else(|| "anonymous".to_string(), Credentials::log_id),
                decision = ?decision,
                "access decision"
            );
        }

        decision
    }

    /// Returns `true` when non-empty credentials pass the configured verifier.
    pub fn verify(&self, credentials: Option<&Credentials>) -> bool {
        credentials.is_some_and(|c| c.is_present() && self.verifier.verify(c))
    }

    fn evaluate(&self, credentials: Option<&Credentials>, roles: &RoleSet) -> Decision {
        if roles.contains(Role::Anyone) {
            return Decision::Allow;
        }
        if !roles.contains(Role::LoggedIn) {
            return Decision::Deny(DenyReason::NoPermittedRoles);
        }

        match credentials.filter(|c| c.is_present()) {
            None => Decision::Deny(DenyReason::MissingCredentials),
            Some(c) if self.verifier.verify(c) => Decision::Allow,
            Some(_) => Decision::Deny(DenyReason::RejectedCredentials),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            config: PolicyConfig::default(),
            verifier: Arc::new(PresenceOnly),
            challenge: HeaderValue::from_static("Basic realm=\"Atrium\""),
        }
    }
}

impl fmt::Debug for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessPolicy")
            .field("config", &self.config)
            .field("verifier", &self.verifier)
            .finish()
    }
}

fn challenge_value(realm: &str) -> AuthzResult<HeaderValue> {
    if realm.contains('"') || realm.contains('\\') {
        return Err(AuthzError::invalid_realm(realm, "quotes and backslashes are not allowed"));
    }
    HeaderValue::from_str(&format!("Basic realm=\"{realm}\""))
        .map_err(|_| AuthzError::invalid_realm(realm, "not a valid header value"))
}
