//! Chain access for the swap: token reads, approvals, signing and broadcast.
//!
//! [`ChainClient`] is the capability surface the swap flow consumes. [`Client`] backs
//! it with an alloy provider and a local private key signer.

pub mod client;
pub mod error;

use async_trait::async_trait;
use bon::Builder;
pub use client::Client;
pub use error::ChainError;

use crate::Result;
use crate::types::{Address, Bytes, ChainId, Signature, TxHash, TypedData, U256};

/// Everything the swap flow needs from the chain and the taker's key.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the signing account.
    fn address(&self) -> Address;

    fn chain_id(&self) -> ChainId;

    /// `decimals()` of an ERC-20 token.
    async fn decimals(&self, token: Address) -> Result<u8>;

    /// Dry-runs `approve(spender, amount)` on `token` from [`ChainClient::address`].
    async fn simulate_approve(&self, token: Address, spender: Address, amount: U256)
    -> Result<()>;

    /// Sends `approve(spender, amount)` on `token` and returns the transaction hash
    /// without waiting for it to be mined.
    async fn send_approve(&self, token: Address, spender: Address, amount: U256)
    -> Result<TxHash>;

    /// Blocks until `hash` is mined.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt>;

    /// Signs an EIP-712 payload with the account's key.
    async fn sign_typed_data(&self, payload: &TypedData) -> Result<Signature>;

    /// Current transaction count of `address`.
    async fn nonce(&self, address: Address) -> Result<u64>;

    /// Signs `transaction` and returns its EIP-2718 encoding.
    async fn sign_transaction(&self, transaction: &UnsignedTransaction) -> Result<Bytes>;

    /// Broadcasts an encoded signed transaction.
    async fn send_raw_transaction(&self, raw: &Bytes) -> Result<TxHash>;
}

/// A mined transaction.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    /// `false` when the transaction reverted.
    pub success: bool,
}

/// A transaction ready to be signed. Missing gas fields are filled in by the
/// [`ChainClient`] from the node before signing.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct UnsignedTransaction {
    pub to: Address,
    pub data: Bytes,
    pub value: Option<U256>,
    pub gas: Option<U256>,
    pub gas_price: Option<U256>,
    pub nonce: u64,
}
