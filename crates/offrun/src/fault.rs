//! # Fault Definitions
//!
//! The central ledger of everything that can reject an offloaded task.

use offpack::Error as PackError;

/// A failure scoped to a single invocation.
///
/// Every fault rejects exactly one future; none are retried, none are
/// logged by the core, and none are fatal to the host process.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    /// The parameter could not be structurally encoded. Raised
    /// synchronously, before any context spawns.
    Serialization(PackError),
    /// The encoded callable could not be rebuilt inside the context
    /// (unknown key, wrong style tag, malformed encoding).
    Reconstruction(String),
    /// The reconstructed callable panicked during invocation inside the
    /// context. Carries the panic message.
    Execution(String),
    /// The context terminated without producing a reply through the normal
    /// path, or the reply path itself misbehaved.
    Channel(String),
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialization(e) => write!(f, "Serialization fault: {}", e),
            Self::Reconstruction(msg) => write!(f, "Reconstruction fault: {}", msg),
            Self::Execution(msg) => write!(f, "Execution fault: {}", msg),
            Self::Channel(msg) => write!(f, "Channel fault: {}", msg),
        }
    }
}

impl std::error::Error for Fault {}

impl From<PackError> for Fault {
    fn from(e: PackError) -> Self {
        Self::Serialization(e)
    }
}

/// A specialized Result type for offload operations.
pub type Result<T> = std::result::Result<T, Fault>;
