// ── Solops Atoms: Error Types ──────────────────────────────────────────────
// Single canonical error enum for the engine, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by domain (I/O, DB, RPC, Validation…).
//   • The `#[from]` attribute wires std/external error conversions automatically.
//   • No variant carries secret material (private keys) in its message.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    /// Filesystem or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP / network failure (reqwest layer).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// SQLite / rusqlite database failure.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON-RPC call reached the node but came back with an error object.
    #[error("RPC error: {method}: {message}")]
    Rpc { method: String, message: String },

    /// Request parameters failed range checks, or the text carried no
    /// recognizable intent. Raised before any side effect.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A transfer was submitted but confirmation never arrived.
    #[error("Confirmation error: {0}")]
    Confirmation(String),

    /// The target network forbids the requested operation
    /// (e.g. airdrops on mainnet).
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Engine configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catch-all for errors that do not yet have a dedicated variant.
    /// Prefer adding a specific variant over using this in new code.
    #[error("{0}")]
    Other(String),
}

// ── Convenience constructors ───────────────────────────────────────────────

impl EngineError {
    /// Create an RPC error with method name and message.
    pub fn rpc(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rpc { method: method.into(), message: message.into() }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

// ── Bridge: String → EngineError ───────────────────────────────────────────
// Allows `?` on `.ok_or("missing field")` lookups without boilerplate.

impl From<String> for EngineError {
    fn from(s: String) -> Self {
        EngineError::Other(s)
    }
}

impl From<&str> for EngineError {
    fn from(s: &str) -> Self {
        EngineError::Other(s.to_string())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All engine operations should return this type.
pub type EngineResult<T> = Result<T, EngineError>;
