use reqwest::{
    Client as ReqwestClient, Method,
    header::{HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret as _, SecretString};
use url::Url;

use super::types::{PriceResponse, QuoteResponse, SwapRequest};
use crate::config::Config;
use crate::error::Error;
use crate::{Result, ToQueryParams as _};

/// Production Permit2 swap API endpoint.
pub const DEFAULT_HOST: &str = "https://api.0x.org/swap/permit2/";

pub const API_KEY_HEADER: &str = "0x-api-key";
pub const API_VERSION_HEADER: &str = "0x-version";
pub const API_VERSION: &str = "v2";

/// Client for the 0x Permit2 swap API.
///
/// # Example
///
/// ```no_run
/// use permit2_swap::config::Config;
/// use permit2_swap::quote::Client;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::from_env()?;
/// let client = Client::from_config(&config)?;
/// assert_eq!(client.host().path(), "/swap/permit2/");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    host: Url,
    client: ReqwestClient,
}

impl Client {
    /// Creates a client against `host`, sending `api_key` with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the host URL is invalid, the key is not a valid header value
    /// or the HTTP client fails to build.
    pub fn new(host: &str, api_key: &SecretString) -> Result<Client> {
        let mut api_key = HeaderValue::from_str(api_key.expose_secret())?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();

        headers.insert("User-Agent", HeaderValue::from_static("rs_permit2_swap"));
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));
        let client = ReqwestClient::builder().default_headers(headers).build()?;

        let mut host = Url::parse(host)?;
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }

        Ok(Self { host, client })
    }

    /// Creates a client from the process [`Config`].
    pub fn from_config(config: &Config) -> Result<Client> {
        Self::new(config.api_host(), config.api_key())
    }

    /// Returns the host URL for the client. Always ends with `/`.
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    /// Indicative price for `request`.
    ///
    /// The response's `issues.allowance` tells whether the sell token still needs an
    /// ERC-20 approval for the Permit2 contract.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(
            sell_token = %request.sell_token(),
            buy_token = %request.buy_token(),
            sell_amount = %request.sell_amount()
        ))
    )]
    pub async fn price(&self, request: &SwapRequest) -> Result<PriceResponse> {
        self.get("price", request).await
    }

    /// Binding quote for `request`, including the transaction to submit.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self), fields(
            sell_token = %request.sell_token(),
            buy_token = %request.buy_token(),
            sell_amount = %request.sell_amount()
        ))
    )]
    pub async fn quote(&self, request: &SwapRequest) -> Result<QuoteResponse> {
        self.get("quote", request).await
    }

    async fn get<Response: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        request: &SwapRequest,
    ) -> Result<Response> {
        let url = format!("{}{endpoint}{}", self.host, request.query_params());
        let request = self
            .client
            .request(Method::GET, url)
            .build()
            .map_err(Error::provider)?;

        crate::request(&self.client, request).await
    }
}
