//! Caller credentials.

use std::fmt;

/// Credentials presented by a caller.
///
/// Resolved once per request from the `Authorization` header and handed to
/// the access policy. The password never appears in `Debug` output or logs.
///
/// # Example
///
/// ```
/// use atrium_core::Credentials;
///
/// let creds = Credentials::new("dave", "hunter2");
/// assert!(creds.is_present());
/// assert!(!format!("{creds:?}").contains("hunter2"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates credentials from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns `true` when a non-empty username was presented.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.username.is_empty()
    }

    /// Returns a string identifier suitable for logging.
    #[must_use]
    pub fn log_id(&self) -> String {
        format!("user:{}", self.username)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present() {
        assert!(Credentials::new("x", "").is_present());
        assert!(!Credentials::new("", "secret").is_present());
    }

    #[test]
    fn test_log_id() {
        assert_eq!(Credentials::new("dave", "pw").log_id(), "user:dave");
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("dave", "hunter2"));
        assert!(debug.contains("dave"));
        assert!(!debug.contains("hunter2"));
    }
}
