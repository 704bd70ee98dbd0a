//! Constant product pricing primitives
//!
//! Three pure functions, one per exchange operation. Division truncates
//! toward zero everywhere; the contract rounds the same way, and rounding
//! up instead would quote amounts the contract rejects.

use ethereum_types::U256;

use crate::{QuoteError, BPS_SCALE};

/// Counterpart amount for a ratio-preserving deposit.
///
/// Given a deposit of `amount` into the side of the pool holding
/// `deposit_reserve`, returns how much of the paired asset must accompany
/// it: `floor(amount * paired_reserve / deposit_reserve)`.
///
/// Fails with [`QuoteError::InvalidReserves`] when `deposit_reserve` is
/// zero: an unseeded pool has no ratio to match, and the caller routes
/// first deposits to unconstrained amounts instead.
pub fn matching_deposit(
    amount: U256,
    deposit_reserve: U256,
    paired_reserve: U256,
) -> Result<U256, QuoteError> {
    if deposit_reserve.is_zero() {
        return Err(QuoteError::InvalidReserves);
    }

    let numerator = amount
        .checked_mul(paired_reserve)
        .ok_or(QuoteError::Overflow)?;

    Ok(numerator / deposit_reserve)
}

/// Pro-rata share of one reserve for a liquidity-token burn.
///
/// `floor(lp_amount * reserve / lp_total_supply)`, applied once per pooled
/// asset. Whether `lp_amount` is actually owned by the caller is the
/// contract's concern, not this function's.
pub fn redemption(
    lp_amount: U256,
    reserve: U256,
    lp_total_supply: U256,
) -> Result<U256, QuoteError> {
    if lp_total_supply.is_zero() {
        return Err(QuoteError::InvalidSupply);
    }

    let numerator = lp_amount.checked_mul(reserve).ok_or(QuoteError::Overflow)?;

    Ok(numerator / lp_total_supply)
}

/// Swap output under constant-product pricing with a fee on the input.
///
/// ```text
/// effective_input = input_amount * (10000 - fee_bps)
/// output = effective_input * output_reserve
///        / (input_reserve * 10000 + effective_input)
/// ```
///
/// The truncated division keeps `input_reserve * output_reserve` from
/// decreasing across the trade. A quote that would meet or exceed the
/// output reserve is rejected, never clamped.
pub fn swap_output(
    input_amount: U256,
    input_reserve: U256,
    output_reserve: U256,
    fee_bps: u64,
) -> Result<U256, QuoteError> {
    if input_reserve.is_zero() || output_reserve.is_zero() {
        return Err(QuoteError::InvalidReserves);
    }
    if fee_bps >= BPS_SCALE {
        return Err(QuoteError::InvalidFee);
    }

    let effective_input = input_amount
        .checked_mul(U256::from(BPS_SCALE - fee_bps))
        .ok_or(QuoteError::Overflow)?;

    let numerator = effective_input
        .checked_mul(output_reserve)
        .ok_or(QuoteError::Overflow)?;

    let denominator = input_reserve
        .checked_mul(U256::from(BPS_SCALE))
        .and_then(|scaled| scaled.checked_add(effective_input))
        .ok_or(QuoteError::Overflow)?;

    let output = numerator / denominator;

    if output >= output_reserve {
        return Err(QuoteError::InsufficientLiquidity);
    }

    Ok(output)
}
