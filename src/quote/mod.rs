//! 0x Swap API (Permit2) client and types.
//!
//! The API exposes two read-only endpoints that take the same query:
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/price` | GET | Indicative price, reports an outstanding allowance |
//! | `/quote` | GET | Binding quote with the swap transaction and a Permit2 payload |
//!
//! Every request carries `Content-Type: application/json`, the `0x-api-key` header
//! and `0x-version: v2`. Responses are decoded into [`types::PriceResponse`] and
//! [`types::QuoteResponse`] at this boundary; anything that fails to decode is a
//! [`Kind::Provider`](crate::error::Kind::Provider) error. Nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use permit2_swap::quote::{Client, types::SwapRequest};
//! use permit2_swap::types::{U256, address};
//! use secrecy::SecretString;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(
//!     permit2_swap::quote::DEFAULT_HOST,
//!     &SecretString::from("my-api-key"),
//! )?;
//!
//! let request = SwapRequest::builder()
//!     .chain_id(permit2_swap::SCROLL)
//!     .sell_token(address!("0x5300000000000000000000000000000000000004"))
//!     .buy_token(address!("0xf610A9dfB7C89644979b4A0f27063E9e7d7Cda32"))
//!     .sell_amount(U256::from(100_000_000_000_000_000_u64))
//!     .taker(address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
//!     .build();
//!
//! let price = client.price(&request).await?;
//! println!("buy amount: {:?}", price.buy_amount);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

use async_trait::async_trait;
pub use client::{API_KEY_HEADER, API_VERSION, API_VERSION_HEADER, Client, DEFAULT_HOST};

use crate::Result;
use crate::quote::types::{PriceResponse, QuoteResponse, SwapRequest};

/// Source of indicative prices and binding quotes for a [`SwapRequest`].
///
/// [`Client`] is the HTTP implementation; the swap executor only depends on this trait.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Indicative price. Never carries a transaction.
    async fn price(&self, request: &SwapRequest) -> Result<PriceResponse>;

    /// Binding quote with the transaction to submit and, usually, a Permit2 payload.
    async fn quote(&self, request: &SwapRequest) -> Result<QuoteResponse>;
}

#[expect(
    clippy::same_name_method,
    reason = "The trait forwards to the inherent methods so callers don't need the import"
)]
#[async_trait]
impl QuoteProvider for Client {
    async fn price(&self, request: &SwapRequest) -> Result<PriceResponse> {
        Client::price(self, request).await
    }

    async fn quote(&self, request: &SwapRequest) -> Result<QuoteResponse> {
        Client::quote(self, request).await
    }
}
