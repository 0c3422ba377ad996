//! Process configuration, built once at startup and passed down by parameter.
//!
//! The three secrets the swap needs (signing key, quote API key and RPC URL) are
//! validated up front; a missing value is a [`Kind::Configuration`](crate::error::Kind)
//! error raised before any network call is made.

use std::env;
use std::str::FromStr as _;

use alloy::signers::Signer as _;
use alloy::signers::local::PrivateKeySigner;
use bon::Builder;
use secrecy::{ExposeSecret as _, SecretString};
use url::Url;

use crate::error::Error;
use crate::quote::DEFAULT_HOST;
use crate::types::ChainId;
use crate::{API_KEY_VAR, PRIVATE_KEY_VAR, RPC_URL_VAR, Result, SCROLL};

/// Optional override for the quote provider host.
pub const API_HOST_VAR: &str = "ZERO_EX_API_HOST";
/// Optional override for the chain the swap runs on.
pub const CHAIN_ID_VAR: &str = "CHAIN_ID";

/// Configuration for a swap run.
///
/// ```
/// use permit2_swap::config::Config;
///
/// let config = Config::builder()
///     .private_key("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
///     .api_key("my-api-key")
///     .rpc_url("http://localhost:8545")
///     .build();
///
/// assert_eq!(config.chain_id(), permit2_swap::SCROLL);
/// ```
#[derive(Clone, Debug, Builder)]
pub struct Config {
    /// Hex encoded private key of the taker, with or without the `0x` prefix.
    #[builder(into)]
    private_key: SecretString,
    /// Key sent in the `0x-api-key` header.
    #[builder(into)]
    api_key: SecretString,
    /// JSON-RPC endpoint of the chain. Hosted endpoints carry their key in the path.
    #[builder(into)]
    rpc_url: SecretString,
    /// Base URL of the Permit2 swap API. Defaults to [`DEFAULT_HOST`].
    #[builder(into, default = DEFAULT_HOST.to_owned())]
    api_host: String,
    #[builder(default = SCROLL)]
    chain_id: ChainId,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// `PRIVATE_KEY`, `ZERO_EX_API_KEY` and `ALCHEMY_HTTP_TRANSPORT_URL` are required.
    /// `ZERO_EX_API_HOST` and `CHAIN_ID` are optional overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Empty values are
    /// treated as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::missing_configuration(name))
        };

        let private_key = required(PRIVATE_KEY_VAR)?;
        let api_key = required(API_KEY_VAR)?;
        let rpc_url = required(RPC_URL_VAR)?;

        let chain_id = match lookup(CHAIN_ID_VAR) {
            Some(raw) => raw.trim().parse::<ChainId>().map_err(Error::configuration)?,
            None => SCROLL,
        };

        let config = Self::builder()
            .private_key(private_key)
            .api_key(api_key)
            .rpc_url(rpc_url)
            .maybe_api_host(lookup(API_HOST_VAR))
            .chain_id(chain_id)
            .build();

        config.validate()?;

        Ok(config)
    }

    /// Checks that every value parses, without touching the network.
    pub fn validate(&self) -> Result<()> {
        self.signer()?;
        self.rpc_url()?;
        Url::parse(&self.api_host)?;

        Ok(())
    }

    /// Local signer for the configured key, bound to [`Config::chain_id`].
    pub fn signer(&self) -> Result<PrivateKeySigner> {
        let key = self.private_key.expose_secret().trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let signer = PrivateKeySigner::from_str(key)?;

        Ok(signer.with_chain_id(Some(self.chain_id)))
    }

    /// Parsed RPC endpoint. The raw URL is never exposed otherwise.
    pub fn rpc_url(&self) -> Result<Url> {
        Ok(Url::parse(self.rpc_url.expose_secret())?)
    }

    #[must_use]
    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    #[must_use]
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}
