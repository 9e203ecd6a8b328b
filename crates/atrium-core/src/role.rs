//! Roles attached to routes.
//!
//! Roles are a closed enumeration compared by value. A route carries a
//! [`RoleSet`]; an empty set means nobody can reach the route.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A role a route may permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Universal access: any caller, with or without credentials.
    Anyone,
    /// Any caller that presented credentials.
    LoggedIn,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 2] = [Role::Anyone, Role::LoggedIn];

    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Anyone => "anyone",
            Self::LoggedIn => "logged-in",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Anyone => 0b01,
            Self::LoggedIn => 0b10,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}', expected 'anyone' or 'logged-in'")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anyone" => Ok(Self::Anyone),
            "logged-in" => Ok(Self::LoggedIn),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// A small set of roles.
///
/// # Example
///
/// ```
/// use atrium_core::{Role, RoleSet};
///
/// let roles = RoleSet::from([Role::LoggedIn]);
/// assert!(roles.contains(Role::LoggedIn));
/// assert!(!roles.contains(Role::Anyone));
/// assert!(RoleSet::empty().is_empty());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    /// Returns the empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns the set containing only [`Role::Anyone`].
    #[must_use]
    pub const fn anyone() -> Self {
        Self(Role::Anyone.bit())
    }

    /// Returns the set containing only [`Role::LoggedIn`].
    #[must_use]
    pub const fn logged_in() -> Self {
        Self(Role::LoggedIn.bit())
    }

    /// Adds a role to the set.
    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    /// Returns a new set with the role added.
    #[must_use]
    pub const fn with(self, role: Role) -> Self {
        Self(self.0 | role.bit())
    }

    /// Returns `true` if the set contains the role.
    #[must_use]
    pub const fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    /// Returns `true` if the set holds no roles.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the number of roles in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the roles in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|r| self.contains(*r))
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|r| r.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = Self::empty();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    fn from(roles: [Role; N]) -> Self {
        roles.into_iter().collect()
    }
}

impl From<Role> for RoleSet {
    fn from(role: Role) -> Self {
        Self(role.bit())
    }
}

impl Serialize for RoleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let roles = Vec::<Role>::deserialize(deserializer)?;
        Ok(roles.into_iter().collect())
    }
}
