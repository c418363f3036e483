//! Authorization pipeline for contact operations.
//!
//! The pipeline answers the question:
//! "May principal P perform operation O on contact C?"
//!
//! Every registered handler is evaluated and the decisions are OR-ed. The
//! result does not depend on registration order; order only decides which
//! handler is reported when several succeed.

use metrics::counter;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::handlers::{
    AdministratorsAuthorizationHandler, AuthorizationDecision, AuthorizationHandler,
    ContactIsOwnerAuthorizationHandler, ManagerAuthorizationHandler,
};
use super::models::Principal;
use super::requirement::OperationRequirement;
use crate::contacts::Contact;
use crate::telemetry::AUTHORIZATION_DECISIONS_TOTAL;

// ═══════════════════════════════════════════════════════════════════════════════
// Result
// ═══════════════════════════════════════════════════════════════════════════════

/// Overall outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationResult {
    /// At least one handler succeeded; `handler` is the first in registration order.
    Allowed { handler: &'static str },
    /// No handler succeeded.
    Denied,
}

impl AuthorizationResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }
}

impl fmt::Display for AuthorizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed { handler } => write!(f, "allowed by {}", handler),
            Self::Denied => write!(f, "denied"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Authorization Service
// ═══════════════════════════════════════════════════════════════════════════════

/// Holds the registered handlers and evaluates checks against them.
///
/// Cheap to clone; handlers are shared.
#[derive(Clone, Default)]
pub struct AuthorizationService {
    handlers: Vec<Arc<dyn AuthorizationHandler>>,
}

impl AuthorizationService {
    /// Create a pipeline without handlers. Every check is denied.
    pub fn new() -> Self {
        Self::default()
    }

    /// The contact manager's handler set: administrators, managers, owners.
    pub fn contacts_default() -> Self {
        Self::new()
            .with_handler(AdministratorsAuthorizationHandler)
            .with_handler(ManagerAuthorizationHandler)
            .with_handler(ContactIsOwnerAuthorizationHandler)
    }

    /// Register a handler.
    pub fn with_handler(mut self, handler: impl AuthorizationHandler + 'static) -> Self {
        debug!(handler = handler.name(), "Registering authorization handler");
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Names of the registered handlers, in order.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Evaluate every handler and report each decision.
    pub fn evaluate_all(
        &self,
        principal: Option<&Principal>,
        requirement: &OperationRequirement,
        resource: Option<&Contact>,
    ) -> Vec<(&'static str, AuthorizationDecision)> {
        self.handlers
            .iter()
            .map(|h| (h.name(), h.evaluate(principal, requirement, resource)))
            .collect()
    }

    /// Authorize `principal` to perform `requirement` on `resource`.
    pub fn authorize(
        &self,
        principal: Option<&Principal>,
        requirement: &OperationRequirement,
        resource: Option<&Contact>,
    ) -> AuthorizationResult {
        let result = self
            .evaluate_all(principal, requirement, resource)
            .into_iter()
            .find(|(_, decision)| decision.is_succeeded())
            .map(|(handler, _)| AuthorizationResult::Allowed { handler })
            .unwrap_or(AuthorizationResult::Denied);

        let principal_label = principal
            .map(|p| p.to_string())
            .unwrap_or_else(|| "none".to_string());
        debug!(
            principal = %principal_label,
            operation = %requirement,
            contact = ?resource.map(|c| c.id),
            result = %result,
            "Authorization evaluated"
        );
        counter!(
            AUTHORIZATION_DECISIONS_TOTAL,
            "operation" => requirement.name().to_string(),
            "allowed" => result.is_allowed().to_string(),
        )
        .increment(1);

        result
    }
}

impl fmt::Debug for AuthorizationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationService")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
