//! Alloy backed [`ChainClient`].
//!
//! # Example
//!
//! ```no_run
//! use permit2_swap::chain::{ChainClient as _, Client};
//! use permit2_swap::config::Config;
//! use permit2_swap::types::address;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let client = Client::connect(&config)?;
//!
//! let decimals = client
//!     .decimals(address!("0x5300000000000000000000000000000000000004"))
//!     .await?;
//! println!("WETH has {decimals} decimals");
//! # Ok(())
//! # }
//! ```

#![allow(
    clippy::exhaustive_structs,
    clippy::exhaustive_enums,
    reason = "Alloy sol! macro generates code that triggers these lints"
)]

use alloy::eips::eip2718::Encodable2718 as _;
use alloy::network::{EthereumWallet, ReceiptResponse as _, TransactionBuilder as _};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::Signer as _;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use async_trait::async_trait;

use super::error::ChainError;
use super::{ChainClient, Receipt, UnsignedTransaction};
use crate::Result;
use crate::config::Config;
use crate::types::{Address, Bytes, ChainId, Signature, TxHash, TypedData, U256};

// Minimal ERC-20 surface used by the swap flow.
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function decimals() external view returns (uint8);

        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// [`ChainClient`] over an alloy [`Provider`] and a [`PrivateKeySigner`].
///
/// Approvals go through the provider's wallet filler; the swap transaction itself is
/// signed locally and broadcast raw.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct Client<P: Provider> {
    provider: P,
    signer: PrivateKeySigner,
    chain_id: ChainId,
}

impl Client<DynProvider> {
    /// Connects to the configured RPC endpoint with the configured key.
    ///
    /// # Errors
    ///
    /// Returns an error if the private key or RPC URL in `config` is invalid.
    pub fn connect(config: &Config) -> Result<Self> {
        let signer = config.signer()?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(config.rpc_url()?)
            .erased();

        Ok(Self::new(provider, signer, config.chain_id()))
    }
}

impl<P: Provider + Clone> Client<P> {
    /// Wraps an existing provider. `provider` must be able to send transactions from
    /// `signer` for [`ChainClient::send_approve`] to succeed.
    pub fn new(provider: P, signer: PrivateKeySigner, chain_id: ChainId) -> Self {
        Self {
            provider,
            signer: signer.with_chain_id(Some(chain_id)),
            chain_id,
        }
    }

    /// Returns a reference to the underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    fn token(&self, token: Address) -> IERC20::IERC20Instance<P> {
        IERC20::new(token, self.provider.clone())
    }

    /// Fills `gas` and `gas_price` from the node when the caller left them out.
    async fn gas_fields(
        &self,
        transaction: &UnsignedTransaction,
        request: &TransactionRequest,
    ) -> Result<(u64, u128)> {
        let gas = match transaction.gas {
            Some(gas) => u64::try_from(gas)
                .map_err(|e| ChainError::Signing(format!("gas limit {gas} out of range: {e}")))?,
            None => self
                .provider
                .estimate_gas(request.clone())
                .await
                .map_err(|e| ChainError::Rpc(format!("Failed to estimate gas: {e}")))?,
        };

        let gas_price = match transaction.gas_price {
            Some(price) => u128::try_from(price)
                .map_err(|e| ChainError::Signing(format!("gas price {price} out of range: {e}")))?,
            None => self
                .provider
                .get_gas_price()
                .await
                .map_err(|e| ChainError::Rpc(format!("Failed to get gas price: {e}")))?,
        };

        Ok((gas, gas_price))
    }
}

#[async_trait]
impl<P: Provider + Clone> ChainClient for Client<P> {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(token = %token))
    )]
    async fn decimals(&self, token: Address) -> Result<u8> {
        let decimals = self
            .token(token)
            .decimals()
            .call()
            .await
            .map_err(|e| ChainError::ContractCall(format!("Failed to read decimals: {e}")))?;

        Ok(decimals)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(token = %token, spender = %spender))
    )]
    async fn simulate_approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<()> {
        let approved = self
            .token(token)
            .approve(spender, amount)
            .from(self.address())
            .call()
            .await
            .map_err(|e| ChainError::ContractCall(format!("Failed to simulate approve: {e}")))?;

        if approved {
            Ok(())
        } else {
            Err(ChainError::ContractCall("approve returned false".to_owned()).into())
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(token = %token, spender = %spender))
    )]
    async fn send_approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash> {
        let pending_tx = self
            .token(token)
            .approve(spender, amount)
            .from(self.address())
            .send()
            .await
            .map_err(|e| {
                ChainError::ContractCall(format!("Failed to send approve transaction: {e}"))
            })?;

        Ok(*pending_tx.tx_hash())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(hash = %hash))
    )]
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), hash)
            .get_receipt()
            .await
            .map_err(|e| ChainError::Rpc(format!("Failed to get receipt for {hash}: {e}")))?;

        Ok(Receipt {
            transaction_hash: receipt.transaction_hash(),
            block_number: receipt.block_number().ok_or_else(|| {
                ChainError::Rpc("Block number not available in receipt".to_owned())
            })?,
            gas_used: receipt.gas_used(),
            success: receipt.status(),
        })
    }

    async fn sign_typed_data(&self, payload: &TypedData) -> Result<Signature> {
        let signature = self
            .signer
            .sign_dynamic_typed_data(payload)
            .await
            .map_err(|e| ChainError::Signing(format!("Failed to sign typed data: {e}")))?;

        Ok(signature)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(address = %address))
    )]
    async fn nonce(&self, address: Address) -> Result<u64> {
        let nonce = self
            .provider
            .get_transaction_count(address)
            .await
            .map_err(|e| ChainError::Rpc(format!("Failed to get nonce: {e}")))?;

        Ok(nonce)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, transaction), fields(
            to = %transaction.to,
            nonce = transaction.nonce
        ))
    )]
    async fn sign_transaction(&self, transaction: &UnsignedTransaction) -> Result<Bytes> {
        let mut request = TransactionRequest::default()
            .with_from(self.address())
            .with_to(transaction.to)
            .with_input(transaction.data.clone())
            .with_nonce(transaction.nonce)
            .with_chain_id(self.chain_id);

        if let Some(value) = transaction.value {
            request.set_value(value);
        }

        let (gas, gas_price) = self.gas_fields(transaction, &request).await?;
        request.set_gas_limit(gas);
        request.set_gas_price(gas_price);

        let wallet = EthereumWallet::from(self.signer.clone());
        let envelope = request
            .build(&wallet)
            .await
            .map_err(|e| ChainError::Signing(format!("Failed to sign transaction: {e}")))?;

        Ok(envelope.encoded_2718().into())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, raw), fields(len = raw.len()))
    )]
    async fn send_raw_transaction(&self, raw: &Bytes) -> Result<TxHash> {
        let pending_tx = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| ChainError::Rpc(format!("Failed to broadcast transaction: {e}")))?;

        Ok(*pending_tx.tx_hash())
    }
}
