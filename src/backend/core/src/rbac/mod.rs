//! Role-based access control for contacts.
//!
//! This module provides:
//! - **Roles**: Administrator and Manager, persisted as `ContactAdministrators` / `ContactManagers`
//! - **Models**: user ids, stored accounts and the principal handed to handlers
//! - **Requirements**: named operations (Create, Read, Update, Delete, Approve, Reject)
//! - **Handlers**: independent rules that succeed or abstain
//! - **Policy**: the pipeline that ORs handler decisions into allow/deny
//!
//! # Usage
//!
//! ```rust
//! use contacts_core::rbac::{
//!     AuthorizationService, ContactOperations, ContactRole, Principal, UserId,
//! };
//! use contacts_core::contacts::Contact;
//!
//! let service = AuthorizationService::contacts_default();
//! let manager = Principal::authenticated(UserId::new("m-1"), "manager@bigdata.com")
//!     .with_role(ContactRole::Manager);
//! let contact = Contact::new("Meru Sangroula", UserId::new("a-1"));
//!
//! assert!(service
//!     .authorize(Some(&manager), &ContactOperations::approve(), Some(&contact))
//!     .is_allowed());
//! assert!(service
//!     .authorize(Some(&manager), &ContactOperations::delete(), Some(&contact))
//!     .is_denied());
//! ```

pub mod handlers;
pub mod models;
pub mod policy;
pub mod requirement;
pub mod roles;

pub use handlers::{
    AdministratorsAuthorizationHandler, AuthorizationDecision, AuthorizationHandler,
    ContactIsOwnerAuthorizationHandler, ManagerAuthorizationHandler,
};
pub use models::{normalize_user_name, IdentityUser, NewIdentity, Principal, UserId};
pub use policy::{AuthorizationResult, AuthorizationService};
pub use requirement::{
    ContactOperations, OperationRequirement, APPROVE_OPERATION_NAME, CREATE_OPERATION_NAME,
    DELETE_OPERATION_NAME, READ_OPERATION_NAME, REJECT_OPERATION_NAME, UPDATE_OPERATION_NAME,
};
pub use roles::{ContactRole, CONTACT_ADMINISTRATORS_ROLE, CONTACT_MANAGERS_ROLE};
