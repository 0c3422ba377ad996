#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests, and https://github.com/rust-lang/rust-clippy/issues/13981"
)]
#![allow(
    unused,
    reason = "Deeply nested uses in sub-modules are falsely flagged as being unused"
)]

use std::str::FromStr as _;
use std::sync::{Arc, Mutex};

use alloy::primitives::b256;
use alloy::signers::Signer as _;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use permit2_swap::Result;
use permit2_swap::chain::{ChainClient, ChainError, Receipt, UnsignedTransaction};
use permit2_swap::quote::QuoteProvider;
use permit2_swap::quote::types::{PriceResponse, QuoteResponse, SwapRequest};
use permit2_swap::types::{
    Address, B256, Bytes, ChainId, Signature, TxHash, TypedData, U256, address,
};
use serde_json::{Value, json};

// publicly known private key
pub const PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TAKER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

pub const WETH: Address = address!("0x5300000000000000000000000000000000000004");
pub const WSTETH: Address = address!("0xf610A9dfB7C89644979b4A0f27063E9e7d7Cda32");
pub const PERMIT2: Address = address!("0x000000000022D473030F116dDEE9F6B43aC78BA3");
pub const SETTLER: Address = address!("0x0d0e364aa7852291883c162b22d6d81f6355428f");

pub const SCROLL: ChainId = 534_352;

pub const APPROVAL_HASH: TxHash =
    b256!("0x1111111111111111111111111111111111111111111111111111111111111111");
pub const SWAP_HASH: TxHash =
    b256!("0x2222222222222222222222222222222222222222222222222222222222222222");
pub const SIGNED_TRANSACTION: [u8; 4] = [0x02, 0xf8, 0x6e, 0x82];
pub const NONCE: u64 = 7;

#[must_use]
pub fn sell_amount() -> U256 {
    U256::from(100_000_000_000_000_000_u64)
}

#[must_use]
pub fn swap_request() -> SwapRequest {
    SwapRequest::builder()
        .chain_id(SCROLL)
        .sell_token(WETH)
        .buy_token(WSTETH)
        .sell_amount(sell_amount())
        .taker(TAKER)
        .build()
}

#[must_use]
pub fn signer() -> PrivateKeySigner {
    PrivateKeySigner::from_str(PRIVATE_KEY)
        .unwrap()
        .with_chain_id(Some(SCROLL))
}

/// Everything the fakes were asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Price,
    Quote,
    Decimals(Address),
    SimulateApprove {
        token: Address,
        spender: Address,
        amount: U256,
    },
    SendApprove {
        token: Address,
        spender: Address,
        amount: U256,
    },
    WaitForReceipt(TxHash),
    SignTypedData,
    Nonce(Address),
    SignTransaction(UnsignedTransaction),
    SendRawTransaction(Bytes),
}

pub type Journal = Arc<Mutex<Vec<Call>>>;

/// Chain operation to fail on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Decimals,
    SimulateApprove,
    SendApprove,
    WaitForReceipt,
    SignTypedData,
    Nonce,
    SignTransaction,
    SendRawTransaction,
}

/// In-memory [`ChainClient`] backed by a real local signer.
#[derive(Debug)]
pub struct FakeChain {
    signer: PrivateKeySigner,
    journal: Journal,
    fail: Option<Failure>,
    approval_reverts: bool,
}

impl FakeChain {
    #[must_use]
    pub fn new(journal: Journal) -> Self {
        Self {
            signer: signer(),
            journal,
            fail: None,
            approval_reverts: false,
        }
    }

    #[must_use]
    pub fn failing(mut self, failure: Failure) -> Self {
        self.fail = Some(failure);
        self
    }

    #[must_use]
    pub fn reverting_approval(mut self) -> Self {
        self.approval_reverts = true;
        self
    }

    fn record(&self, call: Call) {
        self.journal.lock().unwrap().push(call);
    }

    fn check(&self, failure: Failure) -> Result<()> {
        if self.fail == Some(failure) {
            return Err(ChainError::Rpc(format!("injected {failure:?} failure")).into());
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn chain_id(&self) -> ChainId {
        SCROLL
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        self.record(Call::Decimals(token));
        self.check(Failure::Decimals)?;
        Ok(18)
    }

    async fn simulate_approve(&self, token: Address, spender: Address, amount: U256) -> Result<()> {
        self.record(Call::SimulateApprove {
            token,
            spender,
            amount,
        });
        self.check(Failure::SimulateApprove)
    }

    async fn send_approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        self.record(Call::SendApprove {
            token,
            spender,
            amount,
        });
        self.check(Failure::SendApprove)?;
        Ok(APPROVAL_HASH)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Receipt> {
        self.record(Call::WaitForReceipt(hash));
        self.check(Failure::WaitForReceipt)?;
        Ok(Receipt::builder()
            .transaction_hash(hash)
            .block_number(8_573_422)
            .gas_used(46_109)
            .success(!self.approval_reverts)
            .build())
    }

    async fn sign_typed_data(&self, payload: &TypedData) -> Result<Signature> {
        self.record(Call::SignTypedData);
        self.check(Failure::SignTypedData)?;
        Ok(self.signer.sign_dynamic_typed_data(payload).await?)
    }

    async fn nonce(&self, address: Address) -> Result<u64> {
        self.record(Call::Nonce(address));
        self.check(Failure::Nonce)?;
        Ok(NONCE)
    }

    async fn sign_transaction(&self, transaction: &UnsignedTransaction) -> Result<Bytes> {
        self.record(Call::SignTransaction(transaction.clone()));
        self.check(Failure::SignTransaction)?;
        Ok(Bytes::from_static(&SIGNED_TRANSACTION))
    }

    async fn send_raw_transaction(&self, raw: &Bytes) -> Result<TxHash> {
        self.record(Call::SendRawTransaction(raw.clone()));
        self.check(Failure::SendRawTransaction)?;
        Ok(SWAP_HASH)
    }
}

/// [`QuoteProvider`] answering with canned JSON bodies.
#[derive(Debug)]
pub struct FakeQuotes {
    journal: Journal,
    price: Value,
    quote: Value,
}

impl FakeQuotes {
    #[must_use]
    pub fn new(journal: Journal, price: Value, quote: Value) -> Self {
        Self {
            journal,
            price,
            quote,
        }
    }
}

#[async_trait]
impl QuoteProvider for FakeQuotes {
    async fn price(&self, _request: &SwapRequest) -> Result<PriceResponse> {
        self.journal.lock().unwrap().push(Call::Price);
        Ok(serde_json::from_value(self.price.clone())?)
    }

    async fn quote(&self, _request: &SwapRequest) -> Result<QuoteResponse> {
        self.journal.lock().unwrap().push(Call::Quote);
        Ok(serde_json::from_value(self.quote.clone())?)
    }
}

#[must_use]
pub fn price_body(allowance: Value) -> Value {
    json!({
        "blockNumber": "8573421",
        "buyAmount": "84192861328432113",
        "buyToken": "0xf610a9dfb7c89644979b4a0f27063e9e7d7cda32",
        "fees": { "integratorFee": null, "zeroExFee": null, "gasFee": null },
        "gas": "288079",
        "gasPrice": "49000000",
        "issues": {
            "allowance": allowance,
            "balance": null,
            "simulationIncomplete": false,
            "invalidSourcesPassed": []
        },
        "liquidityAvailable": true,
        "minBuyAmount": "83350932715147792",
        "sellAmount": "100000000000000000",
        "sellToken": "0x5300000000000000000000000000000000000004",
        "totalNetworkFee": "14115871000000",
        "zid": "0x111111111111111111111111"
    })
}

#[must_use]
pub fn permit2_allowance() -> Value {
    json!({ "actual": "0", "spender": "0x000000000022d473030f116ddee9f6b43ac78ba3" })
}

#[must_use]
pub fn eip712() -> Value {
    json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" }
            ],
            "TokenPermissions": [
                { "name": "token", "type": "address" },
                { "name": "amount", "type": "uint256" }
            ],
            "PermitTransferFrom": [
                { "name": "permitted", "type": "TokenPermissions" },
                { "name": "spender", "type": "address" },
                { "name": "nonce", "type": "uint256" },
                { "name": "deadline", "type": "uint256" }
            ]
        },
        "domain": {
            "name": "Permit2",
            "chainId": 534352,
            "verifyingContract": "0x000000000022d473030f116ddee9f6b43ac78ba3"
        },
        "message": {
            "permitted": {
                "token": "0x5300000000000000000000000000000000000004",
                "amount": "100000000000000000"
            },
            "spender": "0x0d0e364aa7852291883c162b22d6d81f6355428f",
            "nonce": "2241959297937691820908574931991550",
            "deadline": "1733254755"
        },
        "primaryType": "PermitTransferFrom"
    })
}

pub const CALL_DATA: &str = "0x1fff991f0000000000000000000000000d0e364aa7852291883c162b22d6d81f6355428f";

#[must_use]
pub fn call_data() -> Bytes {
    Bytes::from_str(CALL_DATA).unwrap()
}

#[must_use]
pub fn quote_body(permit2: Option<Value>, data: Option<&str>) -> Value {
    let mut transaction = json!({
        "to": "0x0d0e364aa7852291883c162b22d6d81f6355428f",
        "gas": "288079",
        "gasPrice": "49000000",
        "value": "0"
    });
    if let Some(data) = data {
        transaction["data"] = json!(data);
    }

    json!({
        "liquidityAvailable": true,
        "buyAmount": "84192861328432113",
        "buyToken": "0xf610a9dfb7c89644979b4a0f27063e9e7d7cda32",
        "sellAmount": "100000000000000000",
        "sellToken": "0x5300000000000000000000000000000000000004",
        "issues": { "allowance": null, "balance": null },
        "permit2": permit2.map(|eip712| json!({
            "type": "Permit2",
            "hash": "0x4d2a9ec5e3f2c4bf2bd46c6ab3bdf45b2ae1f5eee3fe2c4b6e6e1bd5ab2b1f11",
            "eip712": eip712
        })),
        "transaction": transaction,
        "zid": "0x111111111111111111111111"
    })
}

/// A fresh journal with both fakes sharing it.
#[must_use]
pub fn fakes(price: Value, quote: Value) -> (Journal, FakeChain, FakeQuotes) {
    let journal = Journal::default();
    let chain = FakeChain::new(Arc::clone(&journal));
    let quotes = FakeQuotes::new(Arc::clone(&journal), price, quote);
    (journal, chain, quotes)
}

#[must_use]
pub fn calls(journal: &Journal) -> Vec<Call> {
    journal.lock().unwrap().clone()
}
