//! Ports and Adapters Infrastructure
//!
//! The engine computes complete, validated results and hands them to a
//! persistence collaborator through port traits. Each domain crate defines
//! its own port trait extending [`DomainPort`]; adapters (a database, a REST
//! backend, an in-memory store for tests) implement them.
//!
//! ```text
//!   Metrics / Allocation core ──► complete validated result
//!                                         │
//!                                         ▼
//!                        LiquidationPort / TransferPort
//!                                ▲                ▲
//!                      ┌─────────┴──────┐  ┌──────┴─────────┐
//!                      │ backing store  │  │ in-memory test │
//!                      └────────────────┘  └────────────────┘
//! ```
//!
//! The core provides no locking or conflict detection; concurrent writers
//! race at the adapter with last-write-wins semantics. Adapters that want
//! optimistic concurrency can compare the revision carried by each snapshot.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Connection { .. } | PortError::Timeout { .. })
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they can be shared across
/// async tasks.
pub trait DomainPort: Send + Sync + 'static {}

/// Metadata about a port operation for auditing and tracing
#[derive(Debug, Clone, Default)]
pub struct OperationMetadata {
    /// Correlation ID for tracing across systems
    pub correlation_id: Option<String>,
    /// User or system that initiated the operation
    pub initiated_by: Option<String>,
    /// Additional context as key-value pairs
    pub context: HashMap<String, String>,
}

impl OperationMetadata {
    /// Creates new metadata with a correlation ID
    pub fn with_correlation_id(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(correlation_id.into()),
            ..Default::default()
        }
    }

    /// Records who initiated the operation
    pub fn initiated_by(mut self, actor: impl Into<String>) -> Self {
        self.initiated_by = Some(actor.into());
        self
    }

    /// Adds context to the metadata
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}
