//! ERC-20 allowance resolution for the Permit2 spender.

use crate::Result;
use crate::chain::{ChainClient, Receipt};
use crate::error::{ApprovalStep, Error};
use crate::quote::types::PriceResponse;
use crate::types::{Address, U256};

/// Allowance granted when an approval is needed.
pub const MAX_ALLOWANCE: U256 = U256::MAX;

/// What the resolver did for a price response.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowanceOutcome {
    /// The provider reported no allowance issue; nothing was sent.
    AlreadyApproved,
    /// An approval was sent and mined.
    Approved { spender: Address, receipt: Receipt },
}

impl AllowanceOutcome {
    #[must_use]
    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            Self::AlreadyApproved => None,
            Self::Approved { receipt, .. } => Some(receipt),
        }
    }
}

/// Approves the spender named in `price.issues.allowance` for [`MAX_ALLOWANCE`] of
/// `token`, and waits for the approval to be mined.
///
/// When the price reports no allowance issue nothing is sent.
///
/// # Errors
///
/// Returns an [`Kind::Approval`](crate::error::Kind::Approval) error if the approval
/// fails to simulate, send or confirm, including when it is mined but reverted.
pub async fn resolve<C: ChainClient + ?Sized>(
    chain: &C,
    token: Address,
    price: &PriceResponse,
) -> Result<AllowanceOutcome> {
    let Some(spender) = price.allowance_spender() else {
        #[cfg(feature = "tracing")]
        tracing::info!(token = %token, "token already approved for Permit2");
        return Ok(AllowanceOutcome::AlreadyApproved);
    };

    #[cfg(feature = "tracing")]
    tracing::info!(token = %token, spender = %spender, "approving Permit2 spender");

    chain
        .simulate_approve(token, spender, MAX_ALLOWANCE)
        .await
        .map_err(|e| failed(spender, ApprovalStep::Simulate, &e))?;

    let hash = chain
        .send_approve(token, spender, MAX_ALLOWANCE)
        .await
        .map_err(|e| failed(spender, ApprovalStep::Send, &e))?;

    let receipt = chain
        .wait_for_receipt(hash)
        .await
        .map_err(|e| failed(spender, ApprovalStep::Confirm, &e))?;

    if !receipt.success {
        return Err(failed(
            spender,
            ApprovalStep::Confirm,
            &format!("transaction {hash} reverted"),
        ));
    }

    #[cfg(feature = "tracing")]
    tracing::info!(
        spender = %spender,
        hash = %receipt.transaction_hash,
        block_number = receipt.block_number,
        gas_used = receipt.gas_used,
        "approval mined"
    );

    Ok(AllowanceOutcome::Approved { spender, receipt })
}

fn failed(spender: Address, step: ApprovalStep, cause: &dyn std::fmt::Display) -> Error {
    #[cfg(feature = "tracing")]
    tracing::error!(spender = %spender, step = %step, error = %cause, "approval failed");

    Error::approval(spender, step, cause.to_string())
}
