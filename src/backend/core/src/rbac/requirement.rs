//! Operation requirements checked against a contact.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const CREATE_OPERATION_NAME: &str = "Create";
pub const READ_OPERATION_NAME: &str = "Read";
pub const UPDATE_OPERATION_NAME: &str = "Update";
pub const DELETE_OPERATION_NAME: &str = "Delete";
pub const APPROVE_OPERATION_NAME: &str = "Approve";
pub const REJECT_OPERATION_NAME: &str = "Reject";

/// A named operation being authorized.
///
/// Any name is accepted; handlers that do not recognize it abstain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationRequirement {
    name: String,
}

impl OperationRequirement {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is one of the status-transition operations.
    pub fn is_status_transition(&self) -> bool {
        self.name == APPROVE_OPERATION_NAME || self.name == REJECT_OPERATION_NAME
    }

    /// Whether this is one of the CRUD operations.
    pub fn is_crud(&self) -> bool {
        matches!(
            self.name.as_str(),
            CREATE_OPERATION_NAME
                | READ_OPERATION_NAME
                | UPDATE_OPERATION_NAME
                | DELETE_OPERATION_NAME
        )
    }
}

impl fmt::Display for OperationRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The operations the contact manager authorizes.
pub struct ContactOperations;

impl ContactOperations {
    pub fn create() -> OperationRequirement {
        OperationRequirement::new(CREATE_OPERATION_NAME)
    }

    pub fn read() -> OperationRequirement {
        OperationRequirement::new(READ_OPERATION_NAME)
    }

    pub fn update() -> OperationRequirement {
        OperationRequirement::new(UPDATE_OPERATION_NAME)
    }

    pub fn delete() -> OperationRequirement {
        OperationRequirement::new(DELETE_OPERATION_NAME)
    }

    pub fn approve() -> OperationRequirement {
        OperationRequirement::new(APPROVE_OPERATION_NAME)
    }

    pub fn reject() -> OperationRequirement {
        OperationRequirement::new(REJECT_OPERATION_NAME)
    }

    pub fn all() -> Vec<OperationRequirement> {
        vec![
            Self::create(),
            Self::read(),
            Self::update(),
            Self::delete(),
            Self::approve(),
            Self::reject(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(ContactOperations::approve().is_status_transition());
        assert!(ContactOperations::reject().is_status_transition());
        assert!(!ContactOperations::delete().is_status_transition());
        assert!(!OperationRequirement::new("approve").is_status_transition());
    }

    #[test]
    fn test_crud() {
        let crud: Vec<_> = ContactOperations::all()
            .into_iter()
            .filter(|op| op.is_crud())
            .collect();
        assert_eq!(crud.len(), 4);
        assert!(!OperationRequirement::new("Archive").is_crud());
    }
}
