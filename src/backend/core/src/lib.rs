#![allow(clippy::result_large_err)]
//! # Contacts Core
//!
//! Role-based authorization and first-run seeding for a contact manager.
//!
//! ## Architecture
//!
//! - **RBAC**: Contact roles, operation requirements and the authorization
//!   handlers that decide whether a principal may act on a contact
//! - **Contacts**: The contact record and its approval status
//! - **Store**: Identity, role and contact store interfaces with in-memory
//!   implementations
//! - **Seed**: Idempotent creation of the administrator and manager accounts,
//!   their roles and a sample contact set
//! - **Telemetry**: Structured logging and metric descriptions
//! - **Config**: Environment and file based configuration

pub mod config;
pub mod contacts;
pub mod error;
pub mod rbac;
pub mod seed;
pub mod store;
pub mod telemetry;

pub use error::{ContactsError, ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::contacts::{Contact, ContactId, ContactStatus};
    pub use crate::error::{
        ContactsError, ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity, Result,
    };
    pub use crate::rbac::{
        AdministratorsAuthorizationHandler, AuthorizationDecision, AuthorizationHandler,
        AuthorizationResult, AuthorizationService, ContactIsOwnerAuthorizationHandler,
        ContactOperations, ContactRole, ManagerAuthorizationHandler, OperationRequirement,
        Principal, UserId,
    };
    pub use crate::seed::{SeedCredentials, SeedData, SeedReport};
    pub use crate::store::{
        resolve_principal, ContactStore, IdentityStore, InMemoryContactStore,
        InMemoryIdentityStore, InMemoryRoleStore, RoleStore,
    };
}
