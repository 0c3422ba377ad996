//! The swap flow: price, approve, quote, sign and submit.
//!
//! [`SwapExecutor`] drives a [`SwapRun`] through the states
//!
//! ```text
//! Pricing -> AllowanceCheck -> Quoting -> Signing -> Submitting -> Done
//! ```
//!
//! Any step error moves the run to `Failed` and nothing after it runs. The allowance
//! approval is the only transaction the flow waits on; the swap itself is reported as
//! soon as the node accepts it.

pub mod allowance;
pub mod executor;
pub mod permit;

pub use allowance::AllowanceOutcome;
pub use executor::{SwapExecutor, SwapOutcome, SwapRun, SwapState};
pub use permit::{SignedPermit, inject_signature};

use crate::Result;
use crate::error::Error;
use crate::types::{Decimal, U256};

/// Converts a human readable `amount` into the token's minor unit.
///
/// `0.1` with 18 decimals is `100000000000000000`. No floating point is involved.
///
/// # Errors
///
/// Returns a validation error if `amount` is negative, has more fractional digits than
/// `decimals`, or does not fit in 256 bits.
///
/// # Example
///
/// ```
/// use permit2_swap::swap::to_minor_units;
/// use permit2_swap::types::{U256, dec};
///
/// let amount = to_minor_units(dec!(0.1), 18)?;
/// assert_eq!(amount, U256::from(100_000_000_000_000_000_u64));
/// # Ok::<(), permit2_swap::error::Error>(())
/// ```
pub fn to_minor_units(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::validation(format!(
            "amount {amount} must not be negative"
        )));
    }

    let amount = amount.normalize();
    let scale = u8::try_from(amount.scale()).unwrap_or(u8::MAX);
    if scale > decimals {
        return Err(Error::validation(format!(
            "amount {amount} has more than {decimals} decimal places"
        )));
    }

    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    let factor = U256::from(10_u8)
        .checked_pow(U256::from(decimals - scale))
        .ok_or_else(|| Error::validation(format!("10^{decimals} does not fit in 256 bits")))?;

    mantissa.checked_mul(factor).ok_or_else(|| {
        Error::validation(format!(
            "amount {amount} with {decimals} decimals does not fit in 256 bits"
        ))
    })
}
