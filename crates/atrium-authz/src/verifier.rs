//! Credential verification.

use std::collections::HashMap;
use std::fmt;

use atrium_core::Credentials;

/// Decides whether presented credentials identify a logged-in caller.
///
/// Only consulted for credentials with a non-empty username.
pub trait CredentialVerifier: Send + Sync + fmt::Debug {
    /// Returns `true` if the credentials are accepted.
    fn verify(&self, credentials: &Credentials) -> bool;
}

/// Accepts any credentials with a non-empty username.
///
/// The password is not checked. This is a placeholder for demos and tests,
/// not a security mechanism.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceOnly;

impl CredentialVerifier for PresenceOnly {
    fn verify(&self, credentials: &Credentials) -> bool {
        credentials.is_present()
    }
}

/// Verifies credentials against a fixed username/password table.
#[derive(Clone, Default)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    /// Creates an empty table that rejects everyone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user.
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }

    /// Returns the number of known users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no users are configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<U, P> FromIterator<(U, P)> for StaticCredentials
where
    U: Into<String>,
    P: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (U, P)>>(iter: I) -> Self {
        Self {
            users: iter
                .into_iter()
                .map(|(u, p)| (u.into(), p.into()))
                .collect(),
        }
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.users.keys().collect();
        names.sort();
        f.debug_struct("StaticCredentials")
            .field("users", &names)
            .finish()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, credentials: &Credentials) -> bool {
        credentials.is_present()
            && self
                .users
                .get(credentials.username())
                .is_some_and(|expected| expected == credentials.password())
    }
}
