//! Error handling for the contacts core.
//!
//! This module provides:
//! - A single error type carrying a machine-readable code and context
//! - Stable numeric codes grouped by category
//! - User-facing vs internal messages (passwords never appear in either)
//! - Severity-aware logging through `tracing`
//! - Error counters through `metrics`
//!
//! # Usage
//!
//! ```rust,ignore
//! use contacts_core::error::{ContactsError, ErrorContext, Result};
//!
//! fn load() -> Result<()> {
//!     std::fs::read_to_string("contacts.toml")
//!         .context("Failed to read contacts configuration")?;
//!     Ok(())
//! }
//! ```

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

use crate::telemetry::ERRORS_TOTAL;

// ═══════════════════════════════════════════════════════════════════════════════
// Result Type Alias
// ═══════════════════════════════════════════════════════════════════════════════

/// A specialized Result type for contacts operations.
pub type Result<T> = std::result::Result<T, ContactsError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Codes
// ═══════════════════════════════════════════════════════════════════════════════

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Identity Errors (1000-1099)
    CreationError,
    UserNotFound,
    DuplicateUser,
    PasswordRejected,
    PasswordHashingFailed,

    // Role Errors (1100-1199)
    RoleNotFound,
    DuplicateRole,
    RoleCreationFailed,
    RoleAssignmentFailed,

    // Store Errors (2000-2099)
    StoreUnavailable,
    ContactPersistenceFailed,

    // Serialization Errors (2200-2299)
    SerializationError,

    // Configuration Errors (5000-5099)
    ConfigurationError,
    MissingConfiguration,
    InvalidConfiguration,

    // Internal Errors (9000-9099)
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub const fn numeric_code(&self) -> u32 {
        match self {
            Self::CreationError => 1000,
            Self::UserNotFound => 1001,
            Self::DuplicateUser => 1002,
            Self::PasswordRejected => 1003,
            Self::PasswordHashingFailed => 1004,

            Self::RoleNotFound => 1100,
            Self::DuplicateRole => 1101,
            Self::RoleCreationFailed => 1102,
            Self::RoleAssignmentFailed => 1103,

            Self::StoreUnavailable => 2000,
            Self::ContactPersistenceFailed => 2001,

            Self::SerializationError => 2200,

            Self::ConfigurationError => 5000,
            Self::MissingConfiguration => 5001,
            Self::InvalidConfiguration => 5002,

            Self::InternalError => 9000,
        }
    }

    /// Get the error category name.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::CreationError
            | Self::UserNotFound
            | Self::DuplicateUser
            | Self::PasswordRejected
            | Self::PasswordHashingFailed => "identity",

            Self::RoleNotFound
            | Self::DuplicateRole
            | Self::RoleCreationFailed
            | Self::RoleAssignmentFailed => "role",

            Self::StoreUnavailable | Self::ContactPersistenceFailed => "store",

            Self::SerializationError => "serialization",

            Self::ConfigurationError
            | Self::MissingConfiguration
            | Self::InvalidConfiguration => "configuration",

            Self::InternalError => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Severity
// ═══════════════════════════════════════════════════════════════════════════════

/// Severity level for errors (affects logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Caller errors (weak password, duplicate name)
    Low,
    /// Configuration problems
    Medium,
    /// Store inconsistencies
    High,
    /// Startup cannot continue
    Critical,
}

impl ErrorSeverity {
    /// Get severity based on error code.
    pub const fn from_code(code: &ErrorCode) -> Self {
        match code {
            ErrorCode::DuplicateUser
            | ErrorCode::DuplicateRole
            | ErrorCode::PasswordRejected
            | ErrorCode::RoleNotFound => Self::Low,

            ErrorCode::ConfigurationError
            | ErrorCode::MissingConfiguration
            | ErrorCode::InvalidConfiguration
            | ErrorCode::SerializationError => Self::Medium,

            ErrorCode::UserNotFound
            | ErrorCode::RoleCreationFailed
            | ErrorCode::RoleAssignmentFailed
            | ErrorCode::ContactPersistenceFailed
            | ErrorCode::PasswordHashingFailed => Self::High,

            ErrorCode::CreationError
            | ErrorCode::StoreUnavailable
            | ErrorCode::InternalError => Self::Critical,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Details
// ═══════════════════════════════════════════════════════════════════════════════

/// Additional structured details about an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Additional context key-value pairs
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,

    /// Related entity ID (user, role, contact)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Related entity type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// Suggested action for resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggested_action = Some(suggestion.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main Error Type
// ═══════════════════════════════════════════════════════════════════════════════

/// The main error type for the contacts core.
#[derive(Error, Debug)]
pub struct ContactsError {
    /// Machine-readable error code
    code: ErrorCode,

    /// User-friendly error message
    user_message: Cow<'static, str>,

    /// Detailed internal message (for logging only)
    internal_message: Option<String>,

    /// Additional structured details
    details: ErrorDetails,

    /// The source error that caused this error
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl fmt::Display for ContactsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.user_message)?;
        if let Some(ref internal) = self.internal_message {
            write!(f, " (internal: {})", internal)?;
        }
        Ok(())
    }
}

impl ContactsError {
    // ─────────────────────────────────────────────────────────────────────────
    // Constructors
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new error with code and user message.
    pub fn new(code: ErrorCode, user_message: impl Into<Cow<'static, str>>) -> Self {
        let error = Self {
            code,
            user_message: user_message.into(),
            internal_message: None,
            details: ErrorDetails::default(),
            source: None,
        };
        error.record_metrics();
        error
    }

    /// Create an error with both user and internal messages.
    pub fn with_internal(
        code: ErrorCode,
        user_message: impl Into<Cow<'static, str>>,
        internal_message: impl Into<String>,
    ) -> Self {
        let mut error = Self::new(code, user_message);
        error.internal_message = Some(internal_message.into());
        error
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_internal(ErrorCode::InternalError, "An internal error occurred", message)
    }

    /// Identity creation did not yield a usable account.
    pub fn creation_failed(user_name: impl Into<String>, reason: impl Into<String>) -> Self {
        let user_name = user_name.into();
        Self::with_internal(
            ErrorCode::CreationError,
            format!("Failed to create user account: {}", user_name),
            reason,
        )
        .with_details(
            ErrorDetails::new()
                .with_entity("user", &user_name)
                .with_suggestion("Use a stronger password for the seeded account"),
        )
    }

    /// A required store handle was not provided.
    pub fn store_unavailable(store: &'static str) -> Self {
        Self::new(
            ErrorCode::StoreUnavailable,
            format!("Required store is not available: {}", store),
        )
        .with_details(ErrorDetails::new().with_entity("store", store))
    }

    /// A user expected to exist is absent.
    pub fn user_not_found(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self::new(ErrorCode::UserNotFound, format!("User not found: {}", user_id))
            .with_details(ErrorDetails::new().with_entity("user", &user_id))
    }

    /// A role expected to exist is absent.
    pub fn role_not_found(role: impl Into<String>) -> Self {
        let role = role.into();
        Self::new(ErrorCode::RoleNotFound, format!("Role not found: {}", role))
            .with_details(ErrorDetails::new().with_entity("role", &role))
    }

    /// A user with the same normalized name already exists.
    pub fn duplicate_user(user_name: impl Into<String>) -> Self {
        let user_name = user_name.into();
        Self::new(
            ErrorCode::DuplicateUser,
            format!("User name is already taken: {}", user_name),
        )
        .with_details(ErrorDetails::new().with_entity("user", &user_name))
    }

    /// A role with the same name already exists.
    pub fn duplicate_role(role: impl Into<String>) -> Self {
        let role = role.into();
        Self::new(ErrorCode::DuplicateRole, format!("Role already exists: {}", role))
            .with_details(ErrorDetails::new().with_entity("role", &role))
    }

    /// The password does not satisfy the password policy.
    pub fn password_rejected(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::PasswordRejected, reason)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Add error details.
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = details;
        self
    }

    /// Add internal message.
    pub fn with_internal_message(mut self, message: impl Into<String>) -> Self {
        self.internal_message = Some(message.into());
        self
    }

    /// Add context to details.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.details.context.insert(key.into(), v);
        }
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the user-friendly message.
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    /// Get the internal message (if any).
    pub fn internal_message(&self) -> Option<&str> {
        self.internal_message.as_deref()
    }

    /// Get the error details.
    pub fn details(&self) -> &ErrorDetails {
        &self.details
    }

    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::from_code(&self.code)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Logging
    // ─────────────────────────────────────────────────────────────────────────

    /// Log this error with appropriate severity.
    pub fn log(&self) {
        let code = self.code.to_string();
        let number = self.code.numeric_code();
        let category = self.code.category();

        match self.severity() {
            ErrorSeverity::Critical => {
                error!(
                    error_code = %code,
                    error_number = number,
                    category = category,
                    user_message = %self.user_message,
                    internal_message = ?self.internal_message,
                    details = ?self.details,
                    source = ?self.source,
                    "CRITICAL ERROR"
                );
            }
            ErrorSeverity::High => {
                error!(
                    error_code = %code,
                    error_number = number,
                    category = category,
                    user_message = %self.user_message,
                    internal_message = ?self.internal_message,
                    "High severity error"
                );
            }
            ErrorSeverity::Medium => {
                warn!(
                    error_code = %code,
                    error_number = number,
                    category = category,
                    user_message = %self.user_message,
                    "Medium severity error"
                );
            }
            ErrorSeverity::Low => {
                tracing::debug!(
                    error_code = %code,
                    error_number = number,
                    category = category,
                    user_message = %self.user_message,
                    "Low severity error"
                );
            }
        }
    }

    fn record_metrics(&self) {
        counter!(
            ERRORS_TOTAL,
            "code" => self.code.to_string(),
            "category" => self.code.category().to_string(),
            "severity" => format!("{:?}", self.severity()),
        )
        .increment(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Context Extension Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| ContactsError::internal(message.into()).with_source(e))
    }
}

impl<T> ErrorContext<T> for Option<T> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| ContactsError::internal(message.into()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// From Implementations for Common Error Types
// ═══════════════════════════════════════════════════════════════════════════════

impl From<serde_json::Error> for ContactsError {
    fn from(error: serde_json::Error) -> Self {
        Self::with_internal(
            ErrorCode::SerializationError,
            "Failed to serialize data",
            error.to_string(),
        )
        .with_source(error)
    }
}

impl From<argon2::password_hash::Error> for ContactsError {
    fn from(error: argon2::password_hash::Error) -> Self {
        // Only the message is kept; the error type is not always std::error::Error.
        Self::with_internal(
            ErrorCode::PasswordHashingFailed,
            "Failed to hash password",
            error.to_string(),
        )
    }
}

impl From<anyhow::Error> for ContactsError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<ContactsError>() {
            Ok(contacts_error) => contacts_error,
            Err(error) => Self::with_internal(
                ErrorCode::InternalError,
                "An internal error occurred",
                error.to_string(),
            ),
        }
    }
}

impl From<config::ConfigError> for ContactsError {
    fn from(error: config::ConfigError) -> Self {
        let (code, user_msg) = match &error {
            config::ConfigError::NotFound(_) => (
                ErrorCode::MissingConfiguration,
                "Required configuration not found",
            ),
            config::ConfigError::PathParse(_) | config::ConfigError::FileParse { .. } => (
                ErrorCode::InvalidConfiguration,
                "Configuration file is invalid",
            ),
            _ => (ErrorCode::ConfigurationError, "Configuration error occurred"),
        };

        Self::with_internal(code, user_msg, error.to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_codes_grouped_by_category() {
        assert_eq!(ErrorCode::CreationError.numeric_code(), 1000);
        assert_eq!(ErrorCode::RoleAssignmentFailed.numeric_code(), 1103);
        assert_eq!(ErrorCode::StoreUnavailable.numeric_code(), 2000);
        assert_eq!(ErrorCode::CreationError.category(), "identity");
        assert_eq!(ErrorCode::StoreUnavailable.category(), "store");
    }

    #[test]
    fn test_log_every_severity() {
        for error in [
            ContactsError::store_unavailable("contacts"),
            ContactsError::creation_failed("admin@bigdata.com", "weak"),
            ContactsError::duplicate_role("ContactManagers"),
            ContactsError::password_rejected("too short"),
        ] {
            error.log();
        }
    }

    #[test]
    fn test_error_details_builder() {
        let details = ErrorDetails::new()
            .with_entity("user", "abc-123")
            .with_suggestion("Try again")
            .with_context("extra", "info");

        assert_eq!(details.entity_type, Some("user".to_string()));
        assert_eq!(details.entity_id, Some("abc-123".to_string()));
        assert!(details.suggested_action.is_some());
        assert!(details.context.contains_key("extra"));
    }

    #[test]
    fn test_store_unavailable_names_store() {
        let error = ContactsError::store_unavailable("roles");
        assert_eq!(error.code(), ErrorCode::StoreUnavailable);
        assert_eq!(error.details().entity_id.as_deref(), Some("roles"));
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_option_context() {
        let missing: Option<u32> = None;
        let err = missing.context("user lookup returned nothing").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.internal_message(), Some("user lookup returned nothing"));
    }

    #[test]
    fn test_error_display() {
        let error = ContactsError::with_internal(
            ErrorCode::RoleAssignmentFailed,
            "Failed to assign role",
            "binding table locked",
        );

        let display = format!("{}", error);
        assert!(display.contains("RoleAssignmentFailed"));
        assert!(display.contains("Failed to assign role"));
        assert!(display.contains("binding table locked"));
    }

    #[test]
    fn test_anyhow_roundtrip_keeps_code() {
        let original = ContactsError::user_not_found("u-1");
        let wrapped: anyhow::Error = original.into();
        let back = ContactsError::from(wrapped);
        assert_eq!(back.code(), ErrorCode::UserNotFound);
    }
}
