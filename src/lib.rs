#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod chain;
pub mod config;
pub mod error;
pub mod quote;
pub(crate) mod serde_helpers;
pub mod swap;
pub mod types;

use alloy::primitives::ChainId;
use phf::phf_map;
use reqwest::{Request, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::types::{Address, TxHash, address};

pub type Result<T> = std::result::Result<T, Error>;

/// [`ChainId`] for Scroll mainnet
pub const SCROLL: ChainId = 534_352;

/// [`ChainId`] for Ethereum mainnet
pub const MAINNET: ChainId = 1;

pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
pub const API_KEY_VAR: &str = "ZERO_EX_API_KEY";
pub const RPC_URL_VAR: &str = "ALCHEMY_HTTP_TRANSPORT_URL";

static CONFIG: phf::Map<ChainId, ChainConfig> = phf_map! {
    534_352_u64 => ChainConfig {
        weth: address!("0x5300000000000000000000000000000000000004"),
        wsteth: address!("0xf610A9dfB7C89644979b4A0f27063E9e7d7Cda32"),
        permit2: address!("0x000000000022D473030F116dDEE9F6B43aC78BA3"),
        explorer: "https://scrollscan.com",
    },
    1_u64 => ChainConfig {
        weth: address!("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        wsteth: address!("0x7f39C581F595B53c5cb19bD0b3f8dA6c935E2Ca0"),
        permit2: address!("0x000000000022D473030F116dDEE9F6B43aC78BA3"),
        explorer: "https://etherscan.io",
    },
};

/// Well-known token and contract addresses for a supported chain.
#[non_exhaustive]
#[derive(Debug)]
pub struct ChainConfig {
    /// Wrapped native token, the default sell side.
    pub weth: Address,
    /// Lido wrapped staked ether, the default buy side.
    pub wsteth: Address,
    /// The canonical Permit2 contract. Quote providers normally report it as
    /// the allowance spender.
    pub permit2: Address,
    /// Block explorer base URL, without a trailing slash.
    pub explorer: &'static str,
}

impl ChainConfig {
    /// Explorer link for a submitted transaction.
    #[must_use]
    pub fn transaction_url(&self, hash: TxHash) -> String {
        format!("{}/tx/{hash}", self.explorer)
    }
}

/// Given a `chain_id`, return the relevant [`ChainConfig`]
#[must_use]
pub fn chain_config(chain_id: ChainId) -> Option<&'static ChainConfig> {
    CONFIG.get(&chain_id)
}

/// Trait for converting request types to URL query parameters.
///
/// This trait is automatically implemented for all types that implement [`Serialize`].
/// It uses [`serde_html_form`] to serialize the struct fields, in declaration order,
/// into a query string.
pub trait ToQueryParams: Serialize {
    /// Converts the request to a URL query string.
    ///
    /// Returns an empty string if no parameters are set, otherwise returns
    /// a string starting with `?` followed by URL-encoded key-value pairs.
    fn query_params(&self) -> String {
        let params = serde_html_form::to_string(self)
            .inspect_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::error!("Unable to convert to URL-encoded string {e:?}");
                #[cfg(not(feature = "tracing"))]
                let _: &serde_html_form::ser::Error = e;
            })
            .unwrap_or_default();

        if params.is_empty() {
            String::new()
        } else {
            format!("?{params}")
        }
    }
}

impl<T: Serialize> ToQueryParams for T {}

/// Executes `request` and decodes the JSON body. Every failure, including transport
/// errors and bodies that don't match `Response`, is reported as [`error::Kind::Provider`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "debug",
        skip(client, request),
        fields(
            method = %request.method(),
            path = request.url().path(),
            status_code
        )
    )
)]
async fn request<Response: DeserializeOwned>(
    client: &reqwest::Client,
    request: Request,
) -> Result<Response> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();

    let response = client.execute(request).await.map_err(Error::provider)?;
    let status_code = response.status();

    #[cfg(feature = "tracing")]
    tracing::Span::current().record("status_code", status_code.as_u16());

    if !status_code.is_success() {
        let message = response.text().await.unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = %message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path, message));
    }

    let json_value = response
        .json::<serde_json::Value>()
        .await
        .map_err(Error::provider)?;

    if json_value.is_null() {
        #[cfg(feature = "tracing")]
        tracing::warn!(method = %method, path = %path, "API returned an empty body");
        return Err(Error::status(
            StatusCode::NO_CONTENT,
            method,
            path,
            "Empty response body",
        ));
    }

    serde_helpers::deserialize_with_warnings(json_value).map_err(|e| match e.kind() {
        error::Kind::Internal => Error::with_source(error::Kind::Provider, e),
        _ => e,
    })
}

#[cfg(test)]
mod tests {
    use alloy::primitives::b256;

    use super::*;

    #[test]
    fn config_contains_scroll() {
        let cfg = chain_config(SCROLL).expect("missing config");
        assert_eq!(
            cfg.weth,
            address!("0x5300000000000000000000000000000000000004")
        );
        assert_eq!(
            cfg.wsteth,
            address!("0xf610A9dfB7C89644979b4A0f27063E9e7d7Cda32")
        );
    }

    #[test]
    fn config_unsupported_chain() {
        assert!(chain_config(10).is_none());
    }

    #[test]
    fn transaction_url_points_at_explorer() {
        let cfg = chain_config(SCROLL).expect("missing config");
        let hash = b256!("0x1111111111111111111111111111111111111111111111111111111111111111");

        assert_eq!(
            cfg.transaction_url(hash),
            "https://scrollscan.com/tx/0x1111111111111111111111111111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn empty_struct_has_no_query() {
        #[derive(Serialize)]
        struct Empty {
            #[serde(skip_serializing_if = "Option::is_none")]
            cursor: Option<String>,
        }

        assert_eq!(Empty { cursor: None }.query_params(), "");
        assert_eq!(
            Empty {
                cursor: Some("a b".to_owned())
            }
            .query_params(),
            "?cursor=a+b"
        );
    }
}
