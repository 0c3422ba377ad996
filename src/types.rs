//! Re-exported types from external crates for convenience.
//!
//! These types are commonly used in this crate and are re-exported here
//! so users don't need to add these dependencies to their `Cargo.toml`.

/// Ethereum address type and the [`address!`] macro for compile-time address literals.
/// [`ChainId`] is a type alias for `u64` representing EVM chain IDs.
/// [`U256`] carries every on-chain amount, gas and value field.
/// [`Bytes`] holds transaction call data and encoded signatures.
pub use alloy::primitives::{Address, B256, Bytes, ChainId, Signature, TxHash, U256, address};
/// EIP-712 typed data as returned in a quote's Permit2 payload.
pub use alloy::dyn_abi::TypedData;
/// Arbitrary precision decimal type for human readable token amounts.
pub use rust_decimal::Decimal;
/// Macro for creating [`Decimal`] literals at compile time.
///
/// # Example
/// ```
/// use permit2_swap::types::dec;
/// let amount = dec!(0.1);
/// ```
pub use rust_decimal_macros::dec;
