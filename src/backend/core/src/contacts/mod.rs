//! The contact resource that authorization checks target.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::rbac::UserId;

/// Strongly-typed contact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactId(pub Uuid);

impl ContactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review status of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Submitted,
    Approved,
    Rejected,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub email: Option<String>,
    pub status: ContactStatus,
    /// Identity of the user that owns this contact.
    pub owner_id: UserId,
}

impl Contact {
    /// Create a submitted contact owned by `owner_id`.
    pub fn new(name: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            id: ContactId::new(),
            name: name.into(),
            address: None,
            city: None,
            state: None,
            zip: None,
            email: None,
            status: ContactStatus::Submitted,
            owner_id,
        }
    }

    pub fn with_address(
        mut self,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        self.address = Some(address.into());
        self.city = Some(city.into());
        self.state = Some(state.into());
        self.zip = Some(zip.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_status(mut self, status: ContactStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_contact_is_submitted() {
        let contact = Contact::new("Meru Sangroula", UserId::new("owner"));
        assert_eq!(contact.status, ContactStatus::Submitted);
        assert!(contact.is_owned_by(&UserId::new("owner")));
        assert!(!contact.is_owned_by(&UserId::new("other")));
    }

    #[test]
    fn test_builder() {
        let contact = Contact::new("Irem Kaymakcilar", UserId::new("owner"))
            .with_address("334 Street", "Toronto", "ON", "1355")
            .with_email("irem@example.com")
            .with_status(ContactStatus::Approved);
        assert_eq!(contact.city.as_deref(), Some("Toronto"));
        assert_eq!(contact.zip.as_deref(), Some("1355"));
        assert_eq!(contact.status, ContactStatus::Approved);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ContactStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }
}
