//! Integration tests for startup seeding.
//!
//! These tests seed in-memory stores end to end and check the resulting
//! accounts, roles and contacts, including repeated runs and store failures.

use async_trait::async_trait;
use std::sync::Arc;

use contacts_core::config::SeedConfig;
use contacts_core::contacts::{Contact, ContactStatus};
use contacts_core::error::{ContactsError, ErrorCode, Result};
use contacts_core::rbac::{
    AuthorizationService, ContactOperations, ContactRole, IdentityUser, NewIdentity, Principal,
    UserId, CONTACT_ADMINISTRATORS_ROLE, CONTACT_MANAGERS_ROLE,
};
use contacts_core::seed::{SeedCredentials, SeedData};
use contacts_core::store::{
    resolve_principal, ContactStore, IdentityStore, InMemoryContactStore, InMemoryIdentityStore,
    InMemoryRoleStore, RoleStore,
};

// ============================================================================
// Test Utilities
// ============================================================================

struct Stores {
    identities: InMemoryIdentityStore,
    roles: InMemoryRoleStore,
    contacts: InMemoryContactStore,
}

impl Stores {
    fn new() -> Self {
        Self {
            identities: InMemoryIdentityStore::new(),
            roles: InMemoryRoleStore::new(),
            contacts: InMemoryContactStore::new(),
        }
    }

    fn seeder(&self) -> SeedData {
        SeedData::builder()
            .identities(self.identities.clone())
            .roles(self.roles.clone())
            .contacts(self.contacts.clone())
            .build()
            .unwrap()
    }

    async fn principal_for(&self, user_name: &str) -> Principal {
        let user = self
            .identities
            .find_by_username(user_name)
            .await
            .unwrap()
            .expect("user should exist");
        resolve_principal(&self.identities, &self.roles, &user.id)
            .await
            .unwrap()
            .expect("principal should resolve")
    }
}

/// A contact store whose commit always fails.
#[derive(Default)]
struct FailingContactStore;

#[async_trait]
impl ContactStore for FailingContactStore {
    async fn any(&self) -> Result<bool> {
        Ok(false)
    }

    async fn add_range(&self, _contacts: Vec<Contact>) -> Result<()> {
        Ok(())
    }

    async fn save(&self) -> Result<usize> {
        Err(ContactsError::internal("disk full"))
    }

    async fn all(&self) -> Result<Vec<Contact>> {
        Ok(Vec::new())
    }

    async fn find_by_name(&self, _name: &str) -> Result<Option<Contact>> {
        Ok(None)
    }
}

/// How `FlakyIdentityStore` misbehaves.
#[derive(Clone, Copy)]
enum Flaw {
    /// Lookups by name miss and creates lose a race to another writer.
    LostCreateRace,
    /// Created accounts cannot be read back by id.
    VanishingUsers,
}

/// An identity store that delegates to memory but fails in one specific way.
struct FlakyIdentityStore {
    inner: InMemoryIdentityStore,
    flaw: Flaw,
}

#[async_trait]
impl IdentityStore for FlakyIdentityStore {
    async fn find_by_username(&self, user_name: &str) -> Result<Option<IdentityUser>> {
        match self.flaw {
            Flaw::LostCreateRace => Ok(None),
            Flaw::VanishingUsers => self.inner.find_by_username(user_name).await,
        }
    }

    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<IdentityUser>> {
        match self.flaw {
            Flaw::LostCreateRace => self.inner.find_by_id(user_id).await,
            Flaw::VanishingUsers => Ok(None),
        }
    }

    async fn create(&self, identity: NewIdentity, password: &str) -> Result<IdentityUser> {
        match self.flaw {
            Flaw::LostCreateRace => Err(ContactsError::duplicate_user(identity.user_name)),
            Flaw::VanishingUsers => self.inner.create(identity, password).await,
        }
    }

    async fn count(&self) -> Result<usize> {
        self.inner.count().await
    }
}

fn flaky_seeder(flaw: Flaw, contacts: InMemoryContactStore) -> SeedData {
    SeedData::builder()
        .identities(FlakyIdentityStore {
            inner: InMemoryIdentityStore::new(),
            flaw,
        })
        .roles(InMemoryRoleStore::new())
        .contacts(contacts)
        .build()
        .unwrap()
}

// ============================================================================
// End-to-End Seeding
// ============================================================================

#[tokio::test]
async fn test_seed_empty_stores() {
    let stores = Stores::new();
    let report = stores
        .seeder()
        .initialize(&SeedCredentials::default())
        .await
        .unwrap();

    assert_eq!(report.contacts_inserted, 3);
    assert_ne!(report.admin_id, report.manager_id);
    assert_eq!(stores.identities.count().await.unwrap(), 2);
    assert_eq!(stores.roles.role_count(), 2);

    let contacts = stores.contacts.all().await.unwrap();
    assert_eq!(contacts.len(), 3);
    assert!(contacts.iter().all(|c| c.owner_id == report.admin_id));

    let meru = stores.contacts.find_by_name("Meru Sangroula").await.unwrap().unwrap();
    assert_eq!(meru.status, ContactStatus::Approved);
    assert_eq!(meru.city.as_deref(), Some("Barrie"));
    assert_eq!(meru.email.as_deref(), Some("meru@example.com"));

    let irem = stores.contacts.find_by_name("Irem Kaymakcilar").await.unwrap().unwrap();
    assert_eq!(irem.status, ContactStatus::Submitted);
    assert_eq!(irem.zip.as_deref(), Some("1355"));
}

#[tokio::test]
async fn test_seeded_accounts_hold_their_roles() {
    let stores = Stores::new();
    let report = stores
        .seeder()
        .initialize(&SeedCredentials::default())
        .await
        .unwrap();

    assert_eq!(
        stores.roles.roles_for(&report.admin_id).await.unwrap(),
        vec![CONTACT_ADMINISTRATORS_ROLE.to_string()]
    );
    assert_eq!(
        stores.roles.roles_for(&report.manager_id).await.unwrap(),
        vec![CONTACT_MANAGERS_ROLE.to_string()]
    );

    let admin = stores.identities.find_by_id(&report.admin_id).await.unwrap().unwrap();
    assert_eq!(admin.email.as_deref(), Some("admin@bigdata.com"));
    assert!(admin.email_confirmed);

    assert!(stores
        .identities
        .check_password("admin@bigdata.com", "Admin@123")
        .await
        .unwrap());
    assert!(stores
        .identities
        .check_password("manager@bigdata.com", "Tester@123")
        .await
        .unwrap());
    assert!(!stores
        .identities
        .check_password("manager@bigdata.com", "Admin@123")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let stores = Stores::new();
    let seeder = stores.seeder();
    let credentials = SeedCredentials::default();

    let first = seeder.initialize(&credentials).await.unwrap();
    let second = seeder.initialize(&credentials).await.unwrap();

    assert_eq!(first.admin_id, second.admin_id);
    assert_eq!(first.manager_id, second.manager_id);
    assert_eq!(second.contacts_inserted, 0);

    assert_eq!(stores.identities.count().await.unwrap(), 2);
    assert_eq!(stores.roles.role_count(), 2);
    assert_eq!(stores.contacts.all().await.unwrap().len(), 3);
    assert_eq!(
        stores.roles.roles_for(&first.admin_id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_existing_contacts_are_left_alone() {
    let stores = Stores::new();
    let owner = stores
        .identities
        .create(NewIdentity::new("someone@example.com"), "Someone@1")
        .await
        .unwrap();
    stores
        .contacts
        .add_range(vec![Contact::new("Existing Person", owner.id.clone())])
        .await
        .unwrap();
    stores.contacts.save().await.unwrap();

    let report = stores
        .seeder()
        .initialize(&SeedCredentials::default())
        .await
        .unwrap();

    assert_eq!(report.contacts_inserted, 0);
    let contacts = stores.contacts.all().await.unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Existing Person");
    // Accounts and roles are still provisioned
    assert_eq!(stores.identities.count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_custom_credentials() {
    let stores = Stores::new();
    let credentials = SeedCredentials {
        admin_user_name: "root@example.com".to_string(),
        admin_password: "Root#Pass1".to_string(),
        manager_user_name: "lead@example.com".to_string(),
        manager_password: "Lead#Pass1".to_string(),
    };

    let report = stores.seeder().initialize(&credentials).await.unwrap();

    let admin = stores.principal_for("root@example.com").await;
    assert_eq!(admin.user_id.as_ref(), Some(&report.admin_id));
    assert!(admin.is_in_role(ContactRole::Administrator));
    assert!(stores
        .identities
        .find_by_username("admin@bigdata.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_run_uses_configured_credentials() {
    let stores = Stores::new();
    let config = SeedConfig {
        admin_user_name: "root@example.com".to_string(),
        ..SeedConfig::default()
    };

    let report = stores.seeder().run(&config).await.unwrap().unwrap();

    assert_eq!(report.contacts_inserted, 3);
    let admin = stores.principal_for("root@example.com").await;
    assert!(admin.is_in_role(ContactRole::Administrator));
}

#[tokio::test]
async fn test_run_skips_when_disabled() {
    let stores = Stores::new();
    let config = SeedConfig {
        enabled: false,
        ..SeedConfig::default()
    };

    let report = stores.seeder().run(&config).await.unwrap();

    assert!(report.is_none());
    assert_eq!(stores.identities.count().await.unwrap(), 0);
    assert_eq!(stores.roles.role_count(), 0);
    assert!(!stores.contacts.any().await.unwrap());
}

// ============================================================================
// Seeded Data Through the Authorization Pipeline
// ============================================================================

#[tokio::test]
async fn test_seeded_principals_authorize() {
    let stores = Stores::new();
    stores
        .seeder()
        .initialize(&SeedCredentials::default())
        .await
        .unwrap();

    let service = AuthorizationService::contacts_default();
    let admin = stores.principal_for("admin@bigdata.com").await;
    let manager = stores.principal_for("manager@bigdata.com").await;
    let contact = stores
        .contacts
        .find_by_name("Shrasth Kumar")
        .await
        .unwrap()
        .unwrap();

    assert!(manager.is_in_role(ContactRole::Manager));
    assert!(!manager.is_in_role(ContactRole::Administrator));

    assert!(service
        .authorize(Some(&manager), &ContactOperations::approve(), Some(&contact))
        .is_allowed());
    assert!(service
        .authorize(Some(&manager), &ContactOperations::reject(), Some(&contact))
        .is_allowed());
    assert!(service
        .authorize(Some(&manager), &ContactOperations::delete(), Some(&contact))
        .is_denied());

    for requirement in ContactOperations::all() {
        assert!(service
            .authorize(Some(&admin), &requirement, Some(&contact))
            .is_allowed());
    }
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_weak_password_aborts_before_contacts() {
    let stores = Stores::new();
    let credentials = SeedCredentials {
        manager_password: "weak".to_string(),
        ..SeedCredentials::default()
    };

    let err = stores.seeder().initialize(&credentials).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::CreationError);
    assert!(err.user_message().contains("manager@bigdata.com"));
    // The admin was provisioned before the failure, contacts were not
    assert_eq!(stores.identities.count().await.unwrap(), 1);
    assert!(!stores.contacts.any().await.unwrap());
}

#[tokio::test]
async fn test_contact_save_failure_is_reported() {
    let identities: Arc<dyn IdentityStore> = Arc::new(InMemoryIdentityStore::new());
    let roles: Arc<dyn RoleStore> = Arc::new(InMemoryRoleStore::new());
    let contacts: Arc<dyn ContactStore> = Arc::new(FailingContactStore);

    let seeder = SeedData::builder()
        .shared(identities.clone(), roles, contacts)
        .build()
        .unwrap();

    let err = seeder
        .initialize(&SeedCredentials::default())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ContactPersistenceFailed);
    assert_eq!(identities.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_lost_create_race_aborts_seeding() {
    let contacts = InMemoryContactStore::new();
    let seeder = flaky_seeder(Flaw::LostCreateRace, contacts.clone());

    let err = seeder
        .initialize(&SeedCredentials::default())
        .await
        .unwrap_err();

    // The store's DuplicateUser is not swallowed: seeding stops at the admin
    assert_eq!(err.code(), ErrorCode::CreationError);
    assert!(err.user_message().contains("admin@bigdata.com"));
    assert_eq!(
        err.details().context.get("cause_code"),
        Some(&serde_json::json!(ErrorCode::DuplicateUser))
    );
    assert!(!contacts.any().await.unwrap());
}

#[tokio::test]
async fn test_unreadable_user_aborts_role_assignment() {
    let contacts = InMemoryContactStore::new();
    let seeder = flaky_seeder(Flaw::VanishingUsers, contacts.clone());

    let err = seeder
        .initialize(&SeedCredentials::default())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::UserNotFound);
    assert!(!contacts.any().await.unwrap());
}

#[tokio::test]
async fn test_missing_store_is_unavailable() {
    let err = SeedData::builder()
        .identities(InMemoryIdentityStore::new())
        .contacts(InMemoryContactStore::new())
        .build()
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::StoreUnavailable);
}
