//! Error taxonomy for the SDK
//!
//! Every fault crossing the SDK boundary surfaces as one of the five
//! [`Error`] kinds. Heterogeneous low-level failures arrive as
//! [`TransportError`] values and are classified by [`map_to_error`]; the
//! classification order is fixed and first-match-wins. Nothing is retried
//! or swallowed here — retry policy belongs to the caller.

use crate::types::Address;
use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for raw transport operations, before classification
pub type RawResult<T> = std::result::Result<T, TransportError>;

/// Uniform SDK errors
#[derive(Error, Debug)]
pub enum Error {
    /// Base/unclassified failure
    #[error("{message}")]
    Sdk {
        /// Human-readable description
        message: String,
        /// Original failure, retained for diagnostics
        cause: Option<anyhow::Error>,
    },

    /// An operation required a signing authority and none was resolvable
    #[error("Wallet is required to sign and send transactions")]
    MissingWallet,

    /// A fetch targeted an address with no existing account
    #[error("Account {0} not found")]
    AccountNotFound(Address),

    /// Caller-supplied value violates a stated precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A submitted operation was rejected by the network or the program
    #[error("{message}")]
    TransactionFailed {
        /// Rejection message
        message: String,
        /// Log lines emitted during execution, if any
        logs: Vec<String>,
    },
}

impl Error {
    /// Construct a base error with no cause
    pub fn sdk(message: impl Into<String>) -> Self {
        Error::Sdk {
            message: message.into(),
            cause: None,
        }
    }
}

/// Raw failure shapes produced by the transport layer.
///
/// These mirror what the underlying network stack can report; they are
/// classified into [`Error`] kinds at the executor boundary.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Already classified; passes through [`map_to_error`] unchanged
    #[error(transparent)]
    Sdk(#[from] Error),

    /// The remote program rejected the call with a structured error
    #[error("program error: {message}")]
    Program {
        /// Program-reported message
        message: String,
        /// Log lines emitted before the rejection
        logs: Vec<String>,
    },

    /// The network layer failed to submit or confirm the call
    #[error("network error: {message}")]
    Network {
        /// Transport-reported message
        message: String,
        /// Log lines captured by the transport, if any
        logs: Vec<String>,
    },

    /// A generic error with a message
    #[error("{0}")]
    Message(String),

    /// A non-error value surfaced as a failure
    #[error("unclassified failure")]
    Value(String),
}

impl TransportError {
    /// Best-effort message for pattern matching (e.g. account-not-found)
    pub fn message(&self) -> &str {
        match self {
            TransportError::Sdk(_) => "",
            TransportError::Program { message, .. } => message,
            TransportError::Network { message, .. } => message,
            TransportError::Message(message) => message,
            TransportError::Value(_) => "",
        }
    }
}

fn with_context(context: Option<&str>, message: &str) -> String {
    match context {
        Some(label) => format!("{} failed: {}", label, message),
        None => message.to_string(),
    }
}

/// Classify a raw transport failure into the SDK taxonomy.
///
/// Rules, first match wins:
/// 1. already an [`Error`] — pass through unchanged
/// 2. program rejection — [`Error::TransactionFailed`] with the program's
///    message and logs
/// 3. network failure — [`Error::TransactionFailed`] with the transport's
///    message and logs
/// 4. generic message — base [`Error::Sdk`], message prefixed with
///    `context` when given
/// 5. anything else — base [`Error::Sdk`] with a generic message, the
///    original value retained as cause
pub fn map_to_error(error: TransportError, context: Option<&str>) -> Error {
    match error {
        TransportError::Sdk(err) => err,
        TransportError::Program { message, logs } => Error::TransactionFailed {
            message: with_context(context, &message),
            logs,
        },
        TransportError::Network { message, logs } => Error::TransactionFailed {
            message: with_context(context, &message),
            logs,
        },
        TransportError::Message(message) => Error::Sdk {
            message: with_context(context, &message),
            cause: Some(anyhow::anyhow!(message)),
        },
        TransportError::Value(value) => Error::Sdk {
            message: context.unwrap_or("Unknown error").to_string(),
            cause: Some(anyhow::anyhow!(value)),
        },
    }
}
