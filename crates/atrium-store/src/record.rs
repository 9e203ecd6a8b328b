//! Record types.

use serde::{Deserialize, Serialize};

/// Free-text detail block, returned only when a single record is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordDetails {
    /// Short biography.
    pub bio: String,
    /// Where the person is based.
    pub location: String,
}

/// A directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Optional detail block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<RecordDetails>,
}

impl Record {
    /// Creates a record without details.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            details: None,
        }
    }

    /// Attaches a detail block.
    pub fn with_details(mut self, bio: impl Into<String>, location: impl Into<String>) -> Self {
        self.details = Some(RecordDetails {
            bio: bio.into(),
            location: location.into(),
        });
        self
    }

    /// Returns a copy with the detail block removed.
    pub fn summary(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            details: None,
        }
    }
}
