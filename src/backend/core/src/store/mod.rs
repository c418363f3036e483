//! Store interfaces the core depends on.
//!
//! Identity, role and contact persistence are owned by the host. This module
//! defines the operations the seeding routine and the authorization pipeline
//! need from them:
//! - **IdentityStore**: look up and create user accounts
//! - **RoleStore**: create roles and bind them to users
//! - **ContactStore**: check for, stage and commit contact records
//!
//! `memory` provides thread-safe in-memory implementations.

pub mod memory;
pub mod password;

use async_trait::async_trait;

use crate::contacts::Contact;
use crate::error::Result;
use crate::rbac::{IdentityUser, NewIdentity, Principal, UserId};

pub use memory::{InMemoryContactStore, InMemoryIdentityStore, InMemoryRoleStore};
pub use password::PasswordPolicy;

/// User account persistence.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find a user by name. Matching is case-insensitive.
    async fn find_by_username(&self, user_name: &str) -> Result<Option<IdentityUser>>;

    /// Find a user by id.
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<IdentityUser>>;

    /// Create a user with the given password.
    async fn create(&self, identity: NewIdentity, password: &str) -> Result<IdentityUser>;

    /// Number of stored users.
    async fn count(&self) -> Result<usize>;
}

/// Role persistence and user-role bindings.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn role_exists(&self, role: &str) -> Result<bool>;

    /// Create a role. Fails if it already exists.
    async fn create_role(&self, role: &str) -> Result<()>;

    /// Bind `role` to `user_id`. Binding an already-held role is a no-op.
    async fn assign_role(&self, user_id: &UserId, role: &str) -> Result<()>;

    /// Names of the roles bound to `user_id`.
    async fn roles_for(&self, user_id: &UserId) -> Result<Vec<String>>;
}

/// Contact persistence with an explicit commit step.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Whether any committed contact exists.
    async fn any(&self) -> Result<bool>;

    /// Stage contacts for insertion.
    async fn add_range(&self, contacts: Vec<Contact>) -> Result<()>;

    /// Commit staged contacts. Returns how many were committed.
    async fn save(&self) -> Result<usize>;

    /// All committed contacts in insertion order.
    async fn all(&self) -> Result<Vec<Contact>>;

    /// First committed contact with exactly this name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Contact>>;
}

/// Build the principal a host would authenticate for `user_id`.
///
/// Returns `None` when the user does not exist.
pub async fn resolve_principal(
    identities: &dyn IdentityStore,
    roles: &dyn RoleStore,
    user_id: &UserId,
) -> Result<Option<Principal>> {
    let Some(user) = identities.find_by_id(user_id).await? else {
        return Ok(None);
    };

    let role_names = roles.roles_for(&user.id).await?;
    Ok(Some(
        Principal::authenticated(user.id, user.user_name).with_role_names(role_names),
    ))
}
