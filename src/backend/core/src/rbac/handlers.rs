//! Authorization handlers for contact operations.
//!
//! A handler is a single rule. It either succeeds or abstains; it never
//! denies. Denial is what the pipeline concludes when no handler succeeded.

use tracing::trace;

use super::models::Principal;
use super::requirement::OperationRequirement;
use super::roles::ContactRole;
use crate::contacts::Contact;

/// Outcome of one handler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// The handler vouches for the request.
    Succeeded,
    /// The handler has no opinion.
    NotDetermined,
}

impl AuthorizationDecision {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// A single authorization rule over contacts.
///
/// Implementations are stateless predicates and may run concurrently.
pub trait AuthorizationHandler: Send + Sync {
    /// Handler name used in logs and results.
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        principal: Option<&Principal>,
        requirement: &OperationRequirement,
        resource: Option<&Contact>,
    ) -> AuthorizationDecision;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Administrators
// ═══════════════════════════════════════════════════════════════════════════════

/// Administrators may perform any operation on any contact.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdministratorsAuthorizationHandler;

impl AuthorizationHandler for AdministratorsAuthorizationHandler {
    fn name(&self) -> &'static str {
        "administrators"
    }

    fn evaluate(
        &self,
        principal: Option<&Principal>,
        requirement: &OperationRequirement,
        _resource: Option<&Contact>,
    ) -> AuthorizationDecision {
        let Some(principal) = principal else {
            return AuthorizationDecision::NotDetermined;
        };

        if principal.is_in_role(ContactRole::Administrator) {
            trace!(principal = %principal, operation = %requirement, "administrator override");
            return AuthorizationDecision::Succeeded;
        }

        AuthorizationDecision::NotDetermined
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Managers
// ═══════════════════════════════════════════════════════════════════════════════

/// Managers may approve or reject a concrete contact, nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagerAuthorizationHandler;

impl AuthorizationHandler for ManagerAuthorizationHandler {
    fn name(&self) -> &'static str {
        "managers"
    }

    fn evaluate(
        &self,
        principal: Option<&Principal>,
        requirement: &OperationRequirement,
        resource: Option<&Contact>,
    ) -> AuthorizationDecision {
        // Collection-level checks carry no resource; managers only act on instances.
        let (Some(principal), Some(_)) = (principal, resource) else {
            return AuthorizationDecision::NotDetermined;
        };

        if !requirement.is_status_transition() {
            return AuthorizationDecision::NotDetermined;
        }

        if principal.is_in_role(ContactRole::Manager) {
            return AuthorizationDecision::Succeeded;
        }

        AuthorizationDecision::NotDetermined
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Owners
// ═══════════════════════════════════════════════════════════════════════════════

/// Owners may create, read, update and delete their own contacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactIsOwnerAuthorizationHandler;

impl AuthorizationHandler for ContactIsOwnerAuthorizationHandler {
    fn name(&self) -> &'static str {
        "owner"
    }

    fn evaluate(
        &self,
        principal: Option<&Principal>,
        requirement: &OperationRequirement,
        resource: Option<&Contact>,
    ) -> AuthorizationDecision {
        let (Some(principal), Some(contact)) = (principal, resource) else {
            return AuthorizationDecision::NotDetermined;
        };

        if !requirement.is_crud() {
            return AuthorizationDecision::NotDetermined;
        }

        match &principal.user_id {
            Some(user_id) if contact.is_owned_by(user_id) => AuthorizationDecision::Succeeded,
            _ => AuthorizationDecision::NotDetermined,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
