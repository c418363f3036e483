//! Startup seeding of accounts, roles and sample contacts.
//!
//! Seeding is safe to run on every start:
//! 1. ensure the admin account exists and holds `ContactAdministrators`
//! 2. ensure the manager account exists and holds `ContactManagers`
//! 3. insert the sample contacts, unless any contact already exists
//!
//! Identities and roles are always handled before contacts, so every seeded
//! contact references an existing owner. Any failure aborts seeding.
//!
//! # Usage
//!
//! ```rust
//! # tokio_test::block_on(async {
//! use contacts_core::seed::{SeedCredentials, SeedData};
//! use contacts_core::store::{InMemoryContactStore, InMemoryIdentityStore, InMemoryRoleStore};
//!
//! let seed = SeedData::builder()
//!     .identities(InMemoryIdentityStore::new())
//!     .roles(InMemoryRoleStore::new())
//!     .contacts(InMemoryContactStore::new())
//!     .build()
//!     .unwrap();
//!
//! let report = seed.initialize(&SeedCredentials::default()).await.unwrap();
//! assert_eq!(report.contacts_inserted, 3);
//! # });
//! ```

use metrics::counter;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::SeedConfig;
use crate::contacts::{Contact, ContactStatus};
use crate::error::{ContactsError, ErrorCode, Result};
use crate::rbac::{ContactRole, NewIdentity, UserId};
use crate::store::{ContactStore, IdentityStore, RoleStore};
use crate::telemetry::SEED_RECORDS_TOTAL;

// ═══════════════════════════════════════════════════════════════════════════════
// Credentials
// ═══════════════════════════════════════════════════════════════════════════════

pub const DEFAULT_ADMIN_USER_NAME: &str = "admin@bigdata.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin@123";
pub const DEFAULT_MANAGER_USER_NAME: &str = "manager@bigdata.com";
pub const DEFAULT_MANAGER_PASSWORD: &str = "Tester@123";

/// Accounts provisioned at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedCredentials {
    pub admin_user_name: String,
    pub admin_password: String,
    pub manager_user_name: String,
    pub manager_password: String,
}

impl Default for SeedCredentials {
    fn default() -> Self {
        Self {
            admin_user_name: DEFAULT_ADMIN_USER_NAME.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            manager_user_name: DEFAULT_MANAGER_USER_NAME.to_string(),
            manager_password: DEFAULT_MANAGER_PASSWORD.to_string(),
        }
    }
}

impl fmt::Debug for SeedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedCredentials")
            .field("admin_user_name", &self.admin_user_name)
            .field("admin_password", &"[REDACTED]")
            .field("manager_user_name", &self.manager_user_name)
            .field("manager_password", &"[REDACTED]")
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Report
// ═══════════════════════════════════════════════════════════════════════════════

/// What one seeding run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub admin_id: UserId,
    pub manager_id: UserId,
    /// Zero when contacts were already present.
    pub contacts_inserted: usize,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sample Data
// ═══════════════════════════════════════════════════════════════════════════════

/// The fixed sample contacts, all owned by `owner_id`.
pub fn sample_contacts(owner_id: &UserId) -> Vec<Contact> {
    vec![
        Contact::new("Meru Sangroula", owner_id.clone())
            .with_address("123 Rose Street", "Barrie", "ON", "1235")
            .with_email("meru@example.com")
            .with_status(ContactStatus::Approved),
        Contact::new("Shrasth Kumar", owner_id.clone())
            .with_address("789 Grove Street", "Brampton", "ON", "1489")
            .with_email("shrasth@example.com")
            .with_status(ContactStatus::Submitted),
        Contact::new("Irem Kaymakcilar", owner_id.clone())
            .with_address("334 Street", "Toronto", "ON", "1355")
            .with_email("irem@example.com")
            .with_status(ContactStatus::Submitted),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════════
// Seeder
// ═══════════════════════════════════════════════════════════════════════════════

/// Seeds the stores it was built with.
#[derive(Clone)]
pub struct SeedData {
    identities: Arc<dyn IdentityStore>,
    roles: Arc<dyn RoleStore>,
    contacts: Arc<dyn ContactStore>,
}

impl SeedData {
    pub fn builder() -> SeedDataBuilder {
        SeedDataBuilder::default()
    }

    /// Seed with the configured credentials unless seeding is disabled.
    ///
    /// Returns `None` without touching the stores when `config.enabled` is false.
    pub async fn run(&self, config: &SeedConfig) -> Result<Option<SeedReport>> {
        if !config.enabled {
            info!("Seeding disabled, skipping");
            return Ok(None);
        }
        self.initialize(&config.credentials()).await.map(Some)
    }

    /// Provision both accounts with their roles, then the sample contacts.
    #[instrument(
        skip_all,
        fields(
            admin = %credentials.admin_user_name,
            manager = %credentials.manager_user_name
        )
    )]
    pub async fn initialize(&self, credentials: &SeedCredentials) -> Result<SeedReport> {
        info!("Seeding contact manager data");

        let admin_id = self
            .ensure_user(&credentials.admin_password, &credentials.admin_user_name)
            .await?;
        self.ensure_role(&admin_id, ContactRole::Administrator).await?;

        let manager_id = self
            .ensure_user(&credentials.manager_password, &credentials.manager_user_name)
            .await?;
        self.ensure_role(&manager_id, ContactRole::Manager).await?;

        let contacts_inserted = self.seed_contacts(&admin_id).await?;

        info!(
            admin_id = %admin_id,
            manager_id = %manager_id,
            contacts_inserted,
            "Seeding complete"
        );

        Ok(SeedReport {
            admin_id,
            manager_id,
            contacts_inserted,
        })
    }

    /// Return the id of `user_name`, creating the account if it is missing.
    ///
    /// New accounts are created with a confirmed email equal to the user name.
    pub async fn ensure_user(&self, password: &str, user_name: &str) -> Result<UserId> {
        if let Some(user) = self.identities.find_by_username(user_name).await? {
            debug!(user_id = %user.id, user_name, "User already exists");
            return Ok(user.id);
        }

        let identity = NewIdentity::new(user_name).with_email(user_name).confirmed();
        let user = self
            .identities
            .create(identity, password)
            .await
            .map_err(|e| {
                ContactsError::creation_failed(user_name, e.to_string())
                    .with_context("cause_code", e.code())
                    .with_source(e)
            })?;

        if user.id.is_empty() {
            return Err(ContactsError::creation_failed(
                user_name,
                "identity store returned an account without an id",
            ));
        }

        counter!(SEED_RECORDS_TOTAL, "kind" => "user").increment(1);
        Ok(user.id)
    }

    /// Make sure `role` exists and is bound to `user_id`.
    pub async fn ensure_role(&self, user_id: &UserId, role: ContactRole) -> Result<()> {
        let role_name = role.name();

        if !self.roles.role_exists(role_name).await? {
            self.roles.create_role(role_name).await.map_err(|e| {
                ContactsError::with_internal(
                    ErrorCode::RoleCreationFailed,
                    format!("Failed to create role: {}", role_name),
                    e.to_string(),
                )
                .with_source(e)
            })?;
            counter!(SEED_RECORDS_TOTAL, "kind" => "role").increment(1);
        }

        let user = self
            .identities
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ContactsError::user_not_found(user_id.as_str()))?;

        self.roles.assign_role(&user.id, role_name).await.map_err(|e| {
            ContactsError::with_internal(
                ErrorCode::RoleAssignmentFailed,
                format!("Failed to assign role {} to {}", role_name, user.user_name),
                e.to_string(),
            )
            .with_source(e)
        })?;

        debug!(user_id = %user.id, role = role_name, "Role ensured");
        Ok(())
    }

    /// Insert the sample contacts unless the store already holds any contact.
    ///
    /// Returns the number of contacts inserted.
    pub async fn seed_contacts(&self, owner_id: &UserId) -> Result<usize> {
        if self.contacts.any().await? {
            debug!("Contacts already present, skipping sample data");
            return Ok(0);
        }

        self.contacts.add_range(sample_contacts(owner_id)).await?;
        let inserted = self.contacts.save().await.map_err(|e| {
            ContactsError::with_internal(
                ErrorCode::ContactPersistenceFailed,
                "Failed to save sample contacts",
                e.to_string(),
            )
            .with_source(e)
        })?;

        counter!(SEED_RECORDS_TOTAL, "kind" => "contact").increment(inserted as u64);
        info!(inserted, owner_id = %owner_id, "Sample contacts inserted");
        Ok(inserted)
    }
}

impl fmt::Debug for SeedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedData").finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Collects the store handles seeding needs.
#[derive(Default)]
pub struct SeedDataBuilder {
    identities: Option<Arc<dyn IdentityStore>>,
    roles: Option<Arc<dyn RoleStore>>,
    contacts: Option<Arc<dyn ContactStore>>,
}

impl SeedDataBuilder {
    pub fn identities(mut self, store: impl IdentityStore + 'static) -> Self {
        self.identities = Some(Arc::new(store));
        self
    }

    pub fn roles(mut self, store: impl RoleStore + 'static) -> Self {
        self.roles = Some(Arc::new(store));
        self
    }

    pub fn contacts(mut self, store: impl ContactStore + 'static) -> Self {
        self.contacts = Some(Arc::new(store));
        self
    }

    /// Use already shared handles.
    pub fn shared(
        mut self,
        identities: Arc<dyn IdentityStore>,
        roles: Arc<dyn RoleStore>,
        contacts: Arc<dyn ContactStore>,
    ) -> Self {
        self.identities = Some(identities);
        self.roles = Some(roles);
        self.contacts = Some(contacts);
        self
    }

    /// Fails with `StoreUnavailable` naming the first missing store.
    pub fn build(self) -> Result<SeedData> {
        Ok(SeedData {
            identities: self
                .identities
                .ok_or_else(|| ContactsError::store_unavailable("identities"))?,
            roles: self
                .roles
                .ok_or_else(|| ContactsError::store_unavailable("roles"))?,
            contacts: self
                .contacts
                .ok_or_else(|| ContactsError::store_unavailable("contacts"))?,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
