//! Subcommands.
//!
//! Every command works against fresh in-memory stores, so `seed` and
//! `authorize` each start from an empty system.

pub mod authorize;
pub mod config;
pub mod seed;

use std::sync::Arc;

use contacts_core::config::Config;
use contacts_core::seed::SeedData;
use contacts_core::store::{
    ContactStore, IdentityStore, InMemoryContactStore, InMemoryIdentityStore, InMemoryRoleStore,
    RoleStore,
};

/// In-memory stores plus a seeder wired to them.
pub struct Workspace {
    pub identities: Arc<dyn IdentityStore>,
    pub roles: Arc<dyn RoleStore>,
    pub contacts: Arc<dyn ContactStore>,
    pub seeder: SeedData,
}

impl Workspace {
    pub fn new(config: &Config) -> contacts_core::Result<Self> {
        let identities: Arc<dyn IdentityStore> = Arc::new(InMemoryIdentityStore::with_policy(
            config.identity.password.clone(),
        ));
        let roles: Arc<dyn RoleStore> = Arc::new(InMemoryRoleStore::new());
        let contacts: Arc<dyn ContactStore> = Arc::new(InMemoryContactStore::new());

        let seeder = SeedData::builder()
            .shared(identities.clone(), roles.clone(), contacts.clone())
            .build()?;

        Ok(Self {
            identities,
            roles,
            contacts,
            seeder,
        })
    }
}
