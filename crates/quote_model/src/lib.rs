//! AMM quote engine - pure constant product math (x·y=k)
//!
//! This crate mirrors the pricing the exchange contract performs on-chain,
//! bit-for-bit, so the front end can show a quote before submission. The
//! contract remains the source of truth: a quote computed here is advisory
//! and goes stale the moment another transaction moves the reserves.
//!
//! All amounts are 256-bit unsigned integers in the chain's smallest unit
//! (wei-style, 18 implied decimals). Floating point is never used.

pub mod math;
pub mod quote;

pub use math::{matching_deposit, redemption, swap_output};
pub use quote::{PoolSnapshot, Quote, QuoteRequest, SwapDirection};

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Swap fee charged by the exchange contract this tool deploys (0.3%).
/// A pool deployed with a different fee must record it in the deployment
/// record, or every quote will be silently wrong.
pub const DEFAULT_FEE_BPS: u64 = 30;

/// Error types for quote operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    /// A reserve used as denominator or pricing input is zero
    #[error("pool reserves are empty")]
    InvalidReserves,
    /// The liquidity token supply is zero
    #[error("liquidity token supply is zero")]
    InvalidSupply,
    /// Fee at or above 100%
    #[error("fee must be below 10000 basis points")]
    InvalidFee,
    /// The quoted output would drain the output reserve
    #[error("quote would drain the output reserve")]
    InsufficientLiquidity,
    /// An intermediate product exceeded 256 bits
    #[error("arithmetic overflow")]
    Overflow,
}
