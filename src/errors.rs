// ABOUTME: Unified error handling system with typed codes and HTTP status mapping
// ABOUTME: Carries structured detail for boundaries while never leaking internal causes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! # Unified Error Handling System
//!
//! Defines the error taxonomy shared by every module: validation, not-found,
//! conflict, business-rule, authorization, and internal kinds, each with a
//! stable wire name and an HTTP status. Flow code attaches structured detail
//! (ids, counts, remaining attempts) so the transport boundary can build a
//! safe user-facing response without inspecting messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    /// Request carried no usable credential
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    /// Credential present but invalid (bad signature, unknown key, expired token)
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    /// Authenticated principal lacks the required scope
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1002,

    // Validation (2000-2999)
    /// Malformed or out-of-range input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 2000,
    /// A required field is missing
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 2001,
    /// Input fails a structural format check
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 2002,

    // Resources (3000-3999)
    /// Entity absent, or absent from the caller's tenant
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 3000,
    /// A conflicting entity already exists
    #[serde(rename = "RESOURCE_ALREADY_EXISTS")]
    ResourceAlreadyExists = 3001,

    // Business rules (4000-4999)
    /// Single-use value was already consumed
    #[serde(rename = "ALREADY_USED")]
    AlreadyUsed = 4000,
    /// Value or entity past its expiry
    #[serde(rename = "EXPIRED")]
    Expired = 4001,
    /// Value or entity was revoked
    #[serde(rename = "REVOKED")]
    Revoked = 4002,
    /// Attempt ceiling reached; value permanently invalid
    #[serde(rename = "ATTEMPTS_EXHAUSTED")]
    AttemptsExhausted = 4003,
    /// Tenant seat quota reached
    #[serde(rename = "QUOTA_EXCEEDED")]
    QuotaExceeded = 4004,
    /// Tenant is not in an active state
    #[serde(rename = "TENANT_INACTIVE")]
    TenantInactive = 4005,
    /// Caller must slow down
    #[serde(rename = "RATE_LIMIT_EXCEEDED")]
    RateLimitExceeded = 4006,
    /// Entity state does not permit the operation
    #[serde(rename = "INVALID_STATE")]
    InvalidState = 4007,

    // Internal (9000-9999)
    /// Unclassified internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Backing store failure
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// Upstream service (identity provider, notifier) failure
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 9002,
    /// Configuration error
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::InvalidState => 400,

            // 401 Unauthorized
            Self::AuthRequired | Self::AuthInvalid => 401,

            // 403 Forbidden
            Self::PermissionDenied | Self::Revoked | Self::TenantInactive => 403,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 409 Conflict
            Self::ResourceAlreadyExists | Self::AlreadyUsed => 409,

            // 410 Gone
            Self::Expired => 410,

            // 429 Too Many Requests
            Self::RateLimitExceeded | Self::AttemptsExhausted | Self::QuotaExceeded => 429,

            // 502 Bad Gateway
            Self::ExternalServiceError => 502,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The data format is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceAlreadyExists => "A resource with this identifier already exists",
            Self::AlreadyUsed => "This value has already been used",
            Self::Expired => "This value has expired",
            Self::Revoked => "This value has been revoked",
            Self::AttemptsExhausted => "Too many attempts; this value is no longer usable",
            Self::QuotaExceeded => "Usage quota exceeded for the current plan",
            Self::TenantInactive => "The organization is not active",
            Self::RateLimitExceeded => "Too many requests. Please slow down",
            Self::InvalidState => "The entity state does not allow this operation",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Storage operation failed",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ConfigError => "Configuration error encountered",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Structured detail for the transport boundary (ids, counts, retry hints)
    pub details: serde_json::Value,
    /// Source error for error chaining; never serialized to callers
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
            source: None,
        }
    }

    /// Attach structured details to the error
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Attach a single detail key without replacing existing ones
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        if !self.details.is_object() {
            self.details = serde_json::Value::Object(serde_json::Map::new());
        }
        if let Some(map) = self.details.as_object_mut() {
            map.insert(key.to_owned(), value.into());
        }
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Serializable error payload sent to callers
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Stable wire name of the error
    pub code: ErrorCode,
    /// Safe user-facing message
    pub message: String,
    /// Structured detail, omitted when empty
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        // Internal kinds expose only the generic description; the wrapped
        // cause stays server-side.
        let message = match error.code {
            ErrorCode::InternalError | ErrorCode::DatabaseError | ErrorCode::ConfigError => {
                error.code.description().to_owned()
            }
            _ => error.message,
        };
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message,
                details: error.details,
            },
        }
    }
}

/// Convenience constructors for common errors
impl AppError {
    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid authentication
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Missing scope
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid format
    #[must_use]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Conflicting resource
    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceAlreadyExists, message)
    }

    /// Single-use value consumed
    #[must_use]
    pub fn already_used(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyUsed, message)
    }

    /// Expired value
    #[must_use]
    pub fn expired(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Expired, message)
    }

    /// Revoked value
    #[must_use]
    pub fn revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Revoked, message)
    }

    /// Attempt ceiling reached
    #[must_use]
    pub fn attempts_exhausted(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AttemptsExhausted, message)
    }

    /// Tenant quota reached
    #[must_use]
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::QuotaExceeded, message)
    }

    /// Tenant not active
    #[must_use]
    pub fn tenant_inactive(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TenantInactive, message)
    }

    /// Rate limited
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RateLimitExceeded, message)
    }

    /// Entity state rejects the operation
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidState, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

/// Conversion from `anyhow::Error` for collaborator edges
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}
