//! In-memory store implementations.
//!
//! - **InMemoryIdentityStore**: users keyed by id with a normalized-name index
//! - **InMemoryRoleStore**: role set plus user → roles bindings
//! - **InMemoryContactStore**: committed contacts plus a staging buffer
//!
//! All three are cheap to clone; clones share state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use super::password::{self, PasswordPolicy};
use super::{ContactStore, IdentityStore, RoleStore};
use crate::contacts::Contact;
use crate::error::{ContactsError, ErrorCode, ErrorContext, Result};
use crate::rbac::{normalize_user_name, IdentityUser, NewIdentity, UserId};

// ═══════════════════════════════════════════════════════════════════════════════
// Identity Store
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory user accounts.
#[derive(Debug, Clone)]
pub struct InMemoryIdentityStore {
    users: Arc<DashMap<UserId, IdentityUser>>,
    by_name: Arc<DashMap<String, UserId>>,
    policy: PasswordPolicy,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::with_policy(PasswordPolicy::default())
    }

    pub fn with_policy(policy: PasswordPolicy) -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            by_name: Arc::new(DashMap::new()),
            policy,
        }
    }

    /// Check a sign-in attempt. Unknown users yield `false`.
    pub async fn check_password(&self, user_name: &str, password: &str) -> Result<bool> {
        let Some(user) = self.find_by_username(user_name).await? else {
            return Ok(false);
        };
        let plain = password.to_string();
        tokio::task::spawn_blocking(move || password::verify_password(&plain, &user.password_hash))
            .await
            .context("Password verification task failed")?
    }
}

impl Default for InMemoryIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_username(&self, user_name: &str) -> Result<Option<IdentityUser>> {
        let normalized = normalize_user_name(user_name);
        let Some(id) = self.by_name.get(&normalized).map(|r| r.value().clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<IdentityUser>> {
        Ok(self.users.get(user_id).map(|u| u.clone()))
    }

    async fn create(&self, identity: NewIdentity, password: &str) -> Result<IdentityUser> {
        let normalized = normalize_user_name(&identity.user_name);
        if normalized.is_empty() {
            return Err(ContactsError::creation_failed(
                identity.user_name,
                "user name must not be empty",
            ));
        }
        if self.by_name.contains_key(&normalized) {
            return Err(ContactsError::duplicate_user(identity.user_name));
        }

        self.policy.validate(password)?;

        let plain = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
            .await
            .context("Password hashing task failed")??;

        let user = IdentityUser {
            id: UserId::generate(),
            user_name: identity.user_name,
            normalized_user_name: normalized.clone(),
            email: identity.email,
            email_confirmed: identity.email_confirmed,
            password_hash,
            created_at: Utc::now(),
        };

        // Re-checked under the entry lock; another caller may have won the race
        // while the hash was computed.
        match self.by_name.entry(normalized) {
            Entry::Occupied(_) => Err(ContactsError::duplicate_user(user.user_name)),
            Entry::Vacant(slot) => {
                slot.insert(user.id.clone());
                self.users.insert(user.id.clone(), user.clone());
                info!(user_id = %user.id, user_name = %user.user_name, "User created");
                Ok(user)
            }
        }
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.users.len())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Role Store
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory roles and bindings.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoleStore {
    /// Role name → creation time.
    roles: Arc<DashMap<String, DateTime<Utc>>>,
    bindings: Arc<DashMap<UserId, HashSet<String>>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of defined roles.
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn role_exists(&self, role: &str) -> Result<bool> {
        Ok(self.roles.contains_key(role))
    }

    async fn create_role(&self, role: &str) -> Result<()> {
        if role.trim().is_empty() {
            return Err(ContactsError::new(
                ErrorCode::RoleCreationFailed,
                "Role name must not be empty",
            ));
        }
        match self.roles.entry(role.to_string()) {
            Entry::Occupied(_) => Err(ContactsError::duplicate_role(role)),
            Entry::Vacant(slot) => {
                slot.insert(Utc::now());
                info!(role = role, "Role created");
                Ok(())
            }
        }
    }

    async fn assign_role(&self, user_id: &UserId, role: &str) -> Result<()> {
        if !self.roles.contains_key(role) {
            return Err(ContactsError::role_not_found(role));
        }

        let inserted = self
            .bindings
            .entry(user_id.clone())
            .or_insert_with(HashSet::new)
            .insert(role.to_string());

        if inserted {
            info!(user_id = %user_id, role = role, "Role assigned");
        } else {
            debug!(user_id = %user_id, role = role, "Role already assigned");
        }
        Ok(())
    }

    async fn roles_for(&self, user_id: &UserId) -> Result<Vec<String>> {
        let mut roles: Vec<String> = self
            .bindings
            .get(user_id)
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default();
        roles.sort();
        Ok(roles)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Contact Store
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct ContactTables {
    committed: Vec<Contact>,
    pending: Vec<Contact>,
}

/// In-memory contacts with a unit-of-work staging buffer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactStore {
    tables: Arc<Mutex<ContactTables>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of staged, uncommitted contacts.
    pub fn pending_count(&self) -> usize {
        self.tables.lock().pending.len()
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn any(&self) -> Result<bool> {
        Ok(!self.tables.lock().committed.is_empty())
    }

    async fn add_range(&self, contacts: Vec<Contact>) -> Result<()> {
        self.tables.lock().pending.extend(contacts);
        Ok(())
    }

    async fn save(&self) -> Result<usize> {
        let mut tables = self.tables.lock();
        let pending = std::mem::take(&mut tables.pending);
        let committed = pending.len();
        tables.committed.extend(pending);
        debug!(committed, total = tables.committed.len(), "Contacts saved");
        Ok(committed)
    }

    async fn all(&self) -> Result<Vec<Contact>> {
        Ok(self.tables.lock().committed.clone())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Contact>> {
        Ok(self
            .tables
            .lock()
            .committed
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
