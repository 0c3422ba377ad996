//! Chain-specific error types.

use std::error::Error as StdError;
use std::fmt;

/// Chain-specific errors.
#[non_exhaustive]
#[derive(Debug)]
pub enum ChainError {
    /// Contract call or transaction failed
    ContractCall(String),
    /// JSON-RPC request failed
    Rpc(String),
    /// Transaction could not be built or signed
    Signing(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContractCall(msg) => write!(f, "contract call failed: {msg}"),
            Self::Rpc(msg) => write!(f, "rpc request failed: {msg}"),
            Self::Signing(msg) => write!(f, "signing failed: {msg}"),
        }
    }
}

impl StdError for ChainError {}

impl From<ChainError> for crate::error::Error {
    fn from(err: ChainError) -> Self {
        crate::error::Error::with_source(crate::error::Kind::Internal, err)
    }
}
