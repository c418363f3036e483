//! Identity models: user ids, stored accounts and the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use super::roles::ContactRole;

// ═══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════════════

/// Strongly-typed user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Normalize a user name for lookups (upper-case invariant, trimmed).
pub fn normalize_user_name(user_name: &str) -> String {
    user_name.trim().to_uppercase()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Stored Accounts
// ═══════════════════════════════════════════════════════════════════════════════

/// A stored user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: UserId,
    pub user_name: String,
    pub normalized_user_name: String,
    pub email: Option<String>,
    pub email_confirmed: bool,
    /// PHC-formatted password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Account data supplied when creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub user_name: String,
    pub email: Option<String>,
    pub email_confirmed: bool,
}

impl NewIdentity {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            email: None,
            email_confirmed: false,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Mark the email address as already confirmed.
    pub fn confirmed(mut self) -> Self {
        self.email_confirmed = true;
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Principal
// ═══════════════════════════════════════════════════════════════════════════════

/// The caller an authorization check is made for.
///
/// An anonymous principal has no user id and no roles. Handlers receive the
/// principal as `Option<&Principal>`; an absent principal and an anonymous one
/// both end in `NotDetermined`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Option<UserId>,
    pub user_name: Option<String>,
    pub roles: HashSet<ContactRole>,
}

impl Principal {
    /// A caller without an identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated caller without roles.
    pub fn authenticated(user_id: UserId, user_name: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            user_name: Some(user_name.into()),
            roles: HashSet::new(),
        }
    }

    pub fn with_role(mut self, role: ContactRole) -> Self {
        self.roles.insert(role);
        self
    }

    /// Add every persisted role name that maps to a known role.
    pub fn with_role_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.roles
            .extend(names.into_iter().filter_map(|n| ContactRole::from_name(n.as_ref())));
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Role membership only counts for authenticated principals.
    pub fn is_in_role(&self, role: ContactRole) -> bool {
        self.is_authenticated() && self.roles.contains(&role)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.user_name, &self.user_id) {
            (Some(name), _) => write!(f, "{}", name),
            (None, Some(id)) => write!(f, "{}", id),
            (None, None) => write!(f, "anonymous"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_has_no_roles() {
        let principal = Principal::anonymous().with_role(ContactRole::Administrator);
        assert!(!principal.is_authenticated());
        assert!(!principal.is_in_role(ContactRole::Administrator));
    }

    #[test]
    fn test_role_membership() {
        let principal = Principal::authenticated(UserId::new("u1"), "manager@bigdata.com")
            .with_role(ContactRole::Manager);
        assert!(principal.is_in_role(ContactRole::Manager));
        assert!(!principal.is_in_role(ContactRole::Administrator));
    }

    #[test]
    fn test_unknown_role_names_ignored() {
        let principal = Principal::authenticated(UserId::new("u1"), "someone")
            .with_role_names(["ContactManagers", "Auditors"]);
        assert_eq!(principal.roles.len(), 1);
        assert!(principal.is_in_role(ContactRole::Manager));
    }

    #[test]
    fn test_normalize_user_name() {
        assert_eq!(normalize_user_name(" Admin@BigData.com "), "ADMIN@BIGDATA.COM");
    }

    #[test]
    fn test_generated_ids_unique() {
        assert_ne!(UserId::generate(), UserId::generate());
        assert!(UserId::new("  ").is_empty());
    }

    #[test]
    fn test_new_identity_builder() {
        let identity = NewIdentity::new("admin@bigdata.com")
            .with_email("admin@bigdata.com")
            .confirmed();
        assert!(identity.email_confirmed);
        assert_eq!(identity.email.as_deref(), Some("admin@bigdata.com"));
    }
}
