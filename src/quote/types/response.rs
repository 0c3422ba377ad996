use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::serde_helpers::U256FromAny;
use crate::types::{Address, B256, Bytes, TypedData, U256};

/// Response from `GET /price`.
///
/// When `liquidity_available` is `false` the provider omits every amount.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub liquidity_available: bool,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub block_number: Option<U256>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub buy_amount: Option<U256>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub min_buy_amount: Option<U256>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub sell_amount: Option<U256>,
    pub buy_token: Option<Address>,
    pub sell_token: Option<Address>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub gas: Option<U256>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub gas_price: Option<U256>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub total_network_fee: Option<U256>,
    /// Fee breakdown, passed through untouched.
    pub fees: Option<serde_json::Value>,
    #[serde(default)]
    pub issues: Issues,
    pub route: Option<Route>,
    pub token_metadata: Option<TokenMetadata>,
    pub zid: Option<String>,
}

impl PriceResponse {
    /// Spender that still needs an ERC-20 approval, if any.
    #[must_use]
    pub fn allowance_spender(&self) -> Option<Address> {
        self.issues.allowance.as_ref().map(|issue| issue.spender)
    }
}

/// Response from `GET /quote`.
///
/// The `transaction` is required; a body without one fails to decode.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    #[serde(default = "liquidity_available_default")]
    pub liquidity_available: bool,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub block_number: Option<U256>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub buy_amount: Option<U256>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub min_buy_amount: Option<U256>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub sell_amount: Option<U256>,
    pub buy_token: Option<Address>,
    pub sell_token: Option<Address>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub total_network_fee: Option<U256>,
    pub fees: Option<serde_json::Value>,
    #[serde(default)]
    pub issues: Issues,
    pub route: Option<Route>,
    pub token_metadata: Option<TokenMetadata>,
    pub transaction: Transaction,
    pub permit2: Option<Permit2>,
    pub zid: Option<String>,
}

fn liquidity_available_default() -> bool {
    true
}

impl QuoteResponse {
    /// The EIP-712 payload to sign, if the quote requires a Permit2 signature.
    #[must_use]
    pub fn permit_typed_data(&self) -> Option<&TypedData> {
        self.permit2.as_ref()?.eip712.as_ref()
    }
}

/// The transaction a quote asks the taker to submit.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub to: Address,
    /// Call data as returned by the provider. `None` when absent or empty.
    #[serde(default, deserialize_with = "non_empty_bytes")]
    pub data: Option<Bytes>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub value: Option<U256>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub gas: Option<U256>,
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub gas_price: Option<U256>,
}

fn non_empty_bytes<'de, D>(deserializer: D) -> std::result::Result<Option<Bytes>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let data = Option::<Bytes>::deserialize(deserializer)?;
    Ok(data.filter(|bytes| !bytes.is_empty()))
}

/// Permit2 payload attached to a quote.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
pub struct Permit2 {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub hash: Option<B256>,
    pub eip712: Option<TypedData>,
}

/// Problems the provider detected with the taker's current on-chain state.
#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Issues {
    /// Present when `spender` is not yet approved for the sell amount.
    pub allowance: Option<AllowanceIssue>,
    pub balance: Option<BalanceIssue>,
    #[serde(default)]
    pub simulation_incomplete: bool,
    #[serde(default)]
    pub invalid_sources_passed: Vec<String>,
}

#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AllowanceIssue {
    /// Allowance currently granted to `spender`.
    #[serde_as(as = "Option<U256FromAny>")]
    #[serde(default)]
    pub actual: Option<U256>,
    pub spender: Address,
}

#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BalanceIssue {
    pub token: Address,
    #[serde_as(as = "U256FromAny")]
    pub actual: U256,
    #[serde_as(as = "U256FromAny")]
    pub expected: U256,
}

/// The liquidity sources a swap is routed through.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Route {
    #[serde(default)]
    pub fills: Vec<Fill>,
    #[serde(default)]
    pub tokens: Vec<RouteToken>,
}

impl Route {
    /// Share of the swap per liquidity source, in percent, in route order. Sources
    /// that appear in several fills are summed.
    #[must_use]
    pub fn liquidity_breakdown(&self) -> Vec<(String, Decimal)> {
        let mut breakdown: Vec<(String, Decimal)> = Vec::new();

        for fill in &self.fills {
            let share = Decimal::new(i64::from(fill.proportion_bps), 2);
            match breakdown.iter_mut().find(|(source, _)| *source == fill.source) {
                Some((_, total)) => *total += share,
                None => breakdown.push((fill.source.clone(), share)),
            }
        }

        breakdown
    }
}

#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub from: Address,
    pub to: Address,
    pub source: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub proportion_bps: u32,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RouteToken {
    pub address: Address,
    pub symbol: String,
}

/// Transfer taxes charged by the traded tokens.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub buy_token: TokenTax,
    pub sell_token: TokenTax,
}

#[serde_as]
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenTax {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub buy_tax_bps: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub sell_tax_bps: u32,
}

impl TokenTax {
    /// Whether either direction carries a tax.
    #[must_use]
    pub fn is_taxed(&self) -> bool {
        self.buy_tax_bps > 0 || self.sell_tax_bps > 0
    }
}
