//! Contact-manager roles.
//!
//! | Role          | Persisted name          | Authority                              |
//! |---------------|-------------------------|----------------------------------------|
//! | Administrator | `ContactAdministrators` | Every operation on every contact       |
//! | Manager       | `ContactManagers`       | Approve or reject a concrete contact   |
//!
//! Role names are stored as strings by the identity store; the enum is the
//! only way the rest of the crate refers to them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted name of the administrator role.
pub const CONTACT_ADMINISTRATORS_ROLE: &str = "ContactAdministrators";

/// Persisted name of the manager role.
pub const CONTACT_MANAGERS_ROLE: &str = "ContactManagers";

/// Roles known to the contact manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactRole {
    Administrator,
    Manager,
}

impl ContactRole {
    /// Name under which the role is persisted.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Administrator => CONTACT_ADMINISTRATORS_ROLE,
            Self::Manager => CONTACT_MANAGERS_ROLE,
        }
    }

    /// Map a persisted role name back to a role. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            CONTACT_ADMINISTRATORS_ROLE => Some(Self::Administrator),
            CONTACT_MANAGERS_ROLE => Some(Self::Manager),
            _ => None,
        }
    }

    /// Return all roles.
    pub fn all() -> Vec<ContactRole> {
        vec![Self::Administrator, Self::Manager]
    }
}

impl fmt::Display for ContactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(ContactRole::Administrator.name(), "ContactAdministrators");
        assert_eq!(ContactRole::Manager.name(), "ContactManagers");
    }

    #[test]
    fn test_from_name_roundtrip() {
        for role in ContactRole::all() {
            assert_eq!(ContactRole::from_name(role.name()), Some(role));
        }
    }

    #[test]
    fn test_from_name_is_exact() {
        assert_eq!(ContactRole::from_name("contactadministrators"), None);
        assert_eq!(ContactRole::from_name("Admin"), None);
        assert_eq!(ContactRole::from_name(""), None);
    }
}
