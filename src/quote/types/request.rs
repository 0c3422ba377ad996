use bon::Builder;
use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::types::{Address, ChainId, U256};

/// The swap being priced and quoted.
///
/// Serializes, in this order, to the query `chainId`, `sellToken`, `buyToken`,
/// `sellAmount` and `taker`. `sell_amount` is in the sell token's minor unit and is
/// sent as a decimal integer. The request is immutable once built.
///
/// # Example
///
/// ```
/// use permit2_swap::ToQueryParams as _;
/// use permit2_swap::quote::types::SwapRequest;
/// use permit2_swap::types::{U256, address};
///
/// let request = SwapRequest::builder()
///     .chain_id(534352)
///     .sell_token(address!("0x5300000000000000000000000000000000000004"))
///     .buy_token(address!("0xf610A9dfB7C89644979b4A0f27063E9e7d7Cda32"))
///     .sell_amount(U256::from(100_000_000_000_000_000_u64))
///     .taker(address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
///     .build();
///
/// assert!(request.query_params().contains("sellAmount=100000000000000000"));
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    chain_id: ChainId,
    #[serde_as(as = "DisplayFromStr")]
    sell_token: Address,
    #[serde_as(as = "DisplayFromStr")]
    buy_token: Address,
    #[serde_as(as = "DisplayFromStr")]
    sell_amount: U256,
    #[serde_as(as = "DisplayFromStr")]
    taker: Address,
}

impl SwapRequest {
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    #[must_use]
    pub fn sell_token(&self) -> Address {
        self.sell_token
    }

    #[must_use]
    pub fn buy_token(&self) -> Address {
        self.buy_token
    }

    /// Amount to sell, in the sell token's minor unit.
    #[must_use]
    pub fn sell_amount(&self) -> U256 {
        self.sell_amount
    }

    #[must_use]
    pub fn taker(&self) -> Address {
        self.taker
    }
}
