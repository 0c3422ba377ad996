use crate::chain::{ChainClient, Receipt, UnsignedTransaction};
use crate::error::{Error, SubmissionStep};
use crate::quote::QuoteProvider;
use crate::quote::types::{PriceResponse, QuoteResponse, SwapRequest};
use crate::swap::allowance::{self, AllowanceOutcome};
use crate::swap::permit::{self, SignedPermit};
use crate::swap::to_minor_units;
use crate::types::{Address, Decimal, TxHash};
use crate::{Result, chain_config};

/// Where a [`SwapRun`] is in the flow.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SwapState {
    Pricing,
    AllowanceCheck,
    Quoting,
    Signing,
    Submitting,
    Done,
    Failed,
}

impl SwapState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Result of a completed swap.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Hash of the broadcast swap transaction. It may not be mined yet.
    pub transaction_hash: TxHash,
    /// Receipt of the allowance approval, when one was needed.
    pub approval: Option<Receipt>,
    /// Block explorer link for known chains.
    pub explorer_url: Option<String>,
}

/// Runs swaps for the account behind `chain` using prices and quotes from `quotes`.
///
/// ```no_run
/// use permit2_swap::chain::Client as ChainClient;
/// use permit2_swap::config::Config;
/// use permit2_swap::quote::Client as QuoteClient;
/// use permit2_swap::swap::SwapExecutor;
/// use permit2_swap::types::dec;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::from_env()?;
/// let pair = permit2_swap::chain_config(config.chain_id()).ok_or("unknown chain")?;
/// let executor = SwapExecutor::new(ChainClient::connect(&config)?, QuoteClient::from_config(&config)?);
///
/// let request = executor.request_for(pair.weth, pair.wsteth, dec!(0.1)).await?;
/// let outcome = executor.execute(request).await?;
/// println!("submitted {}", outcome.transaction_hash);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SwapExecutor<C, Q> {
    chain: C,
    quotes: Q,
}

impl<C: ChainClient, Q: QuoteProvider> SwapExecutor<C, Q> {
    pub const fn new(chain: C, quotes: Q) -> Self {
        Self { chain, quotes }
    }

    pub const fn chain(&self) -> &C {
        &self.chain
    }

    pub const fn quotes(&self) -> &Q {
        &self.quotes
    }

    /// Builds a request selling `amount` whole units of `sell_token`, with the signer
    /// as taker.
    ///
    /// # Errors
    ///
    /// Returns an error if the token's decimals cannot be read or `amount` does not
    /// convert to its minor unit.
    pub async fn request_for(
        &self,
        sell_token: Address,
        buy_token: Address,
        amount: Decimal,
    ) -> Result<SwapRequest> {
        let decimals = self.chain.decimals(sell_token).await?;
        let sell_amount = to_minor_units(amount, decimals)?;

        Ok(SwapRequest::builder()
            .chain_id(self.chain.chain_id())
            .sell_token(sell_token)
            .buy_token(buy_token)
            .sell_amount(sell_amount)
            .taker(self.chain.address())
            .build())
    }

    /// A new run for `request`, positioned at [`SwapState::Pricing`].
    #[must_use]
    pub const fn start(&self, request: SwapRequest) -> SwapRun<'_, C, Q> {
        SwapRun {
            executor: self,
            request,
            state: SwapState::Pricing,
            failed_at: None,
            price: None,
            allowance: None,
            quote: None,
            permit: None,
            transaction_hash: None,
        }
    }

    /// Runs the whole flow for `request`.
    ///
    /// # Errors
    ///
    /// Returns the error of the first step that fails.
    pub async fn execute(&self, request: SwapRequest) -> Result<SwapOutcome> {
        self.start(request).run().await
    }
}

/// One pass through the swap flow. Step results are kept for inspection.
#[derive(Debug)]
pub struct SwapRun<'exec, C, Q> {
    executor: &'exec SwapExecutor<C, Q>,
    request: SwapRequest,
    state: SwapState,
    failed_at: Option<SwapState>,
    price: Option<PriceResponse>,
    allowance: Option<AllowanceOutcome>,
    quote: Option<QuoteResponse>,
    permit: Option<SignedPermit>,
    transaction_hash: Option<TxHash>,
}

impl<C: ChainClient, Q: QuoteProvider> SwapRun<'_, C, Q> {
    #[must_use]
    pub const fn state(&self) -> SwapState {
        self.state
    }

    /// The state whose step failed, once the run is [`SwapState::Failed`].
    #[must_use]
    pub const fn failed_at(&self) -> Option<SwapState> {
        self.failed_at
    }

    #[must_use]
    pub const fn request(&self) -> &SwapRequest {
        &self.request
    }

    #[must_use]
    pub const fn price(&self) -> Option<&PriceResponse> {
        self.price.as_ref()
    }

    #[must_use]
    pub const fn allowance(&self) -> Option<&AllowanceOutcome> {
        self.allowance.as_ref()
    }

    #[must_use]
    pub const fn quote(&self) -> Option<&QuoteResponse> {
        self.quote.as_ref()
    }

    #[must_use]
    pub const fn permit(&self) -> Option<&SignedPermit> {
        self.permit.as_ref()
    }

    #[must_use]
    pub const fn transaction_hash(&self) -> Option<TxHash> {
        self.transaction_hash
    }

    /// The outcome, once the run is [`SwapState::Done`].
    #[must_use]
    pub fn outcome(&self) -> Option<SwapOutcome> {
        if self.state != SwapState::Done {
            return None;
        }

        let transaction_hash = self.transaction_hash?;
        Some(SwapOutcome {
            transaction_hash,
            approval: self.allowance.as_ref().and_then(AllowanceOutcome::receipt).copied(),
            explorer_url: chain_config(self.executor.chain.chain_id())
                .map(|config| config.transaction_url(transaction_hash)),
        })
    }

    /// Performs the current step and moves to the next state.
    ///
    /// A failing step moves the run to [`SwapState::Failed`] and returns its error.
    ///
    /// # Errors
    ///
    /// Returns the step's error, or a validation error if the run already finished.
    pub async fn advance(&mut self) -> Result<SwapState> {
        let state = self.state;
        if state.is_terminal() {
            return Err(Error::validation(format!(
                "swap run is already {state} and cannot advance"
            )));
        }

        match self.step(state).await {
            Ok(next) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(from = %state, to = %next, "swap advanced");

                self.state = next;
                Ok(next)
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!(state = %state, error = %e, "swap step failed");

                self.failed_at = Some(state);
                self.state = SwapState::Failed;
                Err(e)
            }
        }
    }

    /// Advances until the run is done or a step fails.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing step, or a validation error if the run had
    /// already finished.
    pub async fn run(&mut self) -> Result<SwapOutcome> {
        while !self.state.is_terminal() {
            self.advance().await?;
        }

        self.outcome().ok_or_else(|| {
            Error::validation(format!("swap run ended in {} without an outcome", self.state))
        })
    }

    async fn step(&mut self, state: SwapState) -> Result<SwapState> {
        let chain = &self.executor.chain;
        let quotes = &self.executor.quotes;

        match state {
            SwapState::Pricing => {
                let price = quotes.price(&self.request).await?;
                if !price.liquidity_available {
                    return Err(Error::validation(format!(
                        "no liquidity available to sell {} for {}",
                        self.request.sell_token(),
                        self.request.buy_token()
                    )));
                }

                #[cfg(feature = "tracing")]
                tracing::info!(
                    buy_amount = ?price.buy_amount,
                    allowance_spender = ?price.allowance_spender(),
                    "received price"
                );

                self.price = Some(price);
                Ok(SwapState::AllowanceCheck)
            }
            SwapState::AllowanceCheck => {
                let price = self
                    .price
                    .as_ref()
                    .ok_or_else(|| Error::validation("allowance check requires a price"))?;
                let outcome = allowance::resolve(chain, self.request.sell_token(), price).await?;

                self.allowance = Some(outcome);
                Ok(SwapState::Quoting)
            }
            SwapState::Quoting => {
                let quote = quotes.quote(&self.request).await?;

                #[cfg(feature = "tracing")]
                tracing::info!(
                    buy_amount = ?quote.buy_amount,
                    to = %quote.transaction.to,
                    has_permit = quote.permit_typed_data().is_some(),
                    "received quote"
                );

                self.quote = Some(quote);
                Ok(SwapState::Signing)
            }
            SwapState::Signing => {
                let quote = self
                    .quote
                    .as_ref()
                    .ok_or_else(|| Error::validation("signing requires a quote"))?;
                let signed = permit::sign(chain, quote).await?;

                self.permit = Some(signed);
                Ok(SwapState::Submitting)
            }
            SwapState::Submitting => {
                let hash = self.submit().await?;

                #[cfg(feature = "tracing")]
                tracing::info!(
                    hash = %hash,
                    url = ?chain_config(chain.chain_id()).map(|config| config.transaction_url(hash)),
                    "swap transaction submitted"
                );

                self.transaction_hash = Some(hash);
                Ok(SwapState::Done)
            }
            SwapState::Done | SwapState::Failed => Err(Error::validation(format!(
                "swap run is already {state} and cannot advance"
            ))),
        }
    }

    async fn submit(&self) -> Result<TxHash> {
        let chain = &self.executor.chain;

        if self.allowance.is_none() {
            return Err(Error::validation(
                "cannot submit before the allowance is resolved",
            ));
        }
        let (Some(quote), Some(permit)) = (self.quote.as_ref(), self.permit.as_ref()) else {
            return Err(Error::validation("cannot submit before the quote is signed"));
        };

        let nonce = chain
            .nonce(chain.address())
            .await
            .map_err(|e| Error::submission(SubmissionStep::Nonce, e.to_string()))?;

        let transaction = UnsignedTransaction::builder()
            .to(quote.transaction.to)
            .data(permit.call_data.clone())
            .maybe_value(quote.transaction.value)
            .maybe_gas(quote.transaction.gas)
            .maybe_gas_price(quote.transaction.gas_price)
            .nonce(nonce)
            .build();

        let raw = chain
            .sign_transaction(&transaction)
            .await
            .map_err(|e| Error::submission(SubmissionStep::Sign, e.to_string()))?;

        chain
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| Error::submission(SubmissionStep::Broadcast, e.to_string()))
    }
}
