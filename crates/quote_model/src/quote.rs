//! Value objects passed between the front end and the pricing engine.
//!
//! The UI layer captures a [`PoolSnapshot`] over RPC, builds a
//! [`QuoteRequest`] from user input and gets back a [`Quote`] with no side
//! effects. Direction is always explicit; nothing here is inferred from
//! ambient state.

use ethereum_types::U256;

use crate::{math, QuoteError};

/// Read-only pool state captured at quote time.
///
/// The three fields come from separate RPC reads and may straddle an
/// on-chain state change. The engine accepts whatever the caller captured;
/// staleness is bounded by the caller's slippage check at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// Native asset held by the exchange contract, in wei
    pub eth_reserve: U256,
    /// Token reserve held by the exchange contract
    pub token_reserve: U256,
    /// Outstanding liquidity-share supply
    pub lp_total_supply: U256,
}

impl PoolSnapshot {
    /// True once the pool holds a ratio worth matching against.
    pub fn is_seeded(&self) -> bool {
        !self.token_reserve.is_zero()
    }

    /// Evaluate a request against this snapshot.
    pub fn quote(&self, request: QuoteRequest, fee_bps: u64) -> Result<Quote, QuoteError> {
        match request {
            QuoteRequest::DepositEth { amount } => {
                math::matching_deposit(amount, self.eth_reserve, self.token_reserve)
                    .map(Quote::RequiredToken)
            }
            QuoteRequest::DepositToken { amount } => {
                math::matching_deposit(amount, self.token_reserve, self.eth_reserve)
                    .map(Quote::RequiredEth)
            }
            QuoteRequest::BurnLiquidity { lp_amount } => {
                let eth_out =
                    math::redemption(lp_amount, self.eth_reserve, self.lp_total_supply)?;
                let token_out =
                    math::redemption(lp_amount, self.token_reserve, self.lp_total_supply)?;
                Ok(Quote::Redemption { eth_out, token_out })
            }
            QuoteRequest::Swap { direction, amount } => {
                let (input_reserve, output_reserve) = direction.reserves(self);
                math::swap_output(amount, input_reserve, output_reserve, fee_bps)
                    .map(Quote::SwapOutput)
            }
        }
    }
}

/// Which asset goes into the pool on a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    EthToToken,
    TokenToEth,
}

impl SwapDirection {
    /// Reserve pair ordered as (input, output) for this direction.
    pub fn reserves(&self, snapshot: &PoolSnapshot) -> (U256, U256) {
        match self {
            SwapDirection::EthToToken => (snapshot.eth_reserve, snapshot.token_reserve),
            SwapDirection::TokenToEth => (snapshot.token_reserve, snapshot.eth_reserve),
        }
    }
}

/// One user intent, carrying the requested input amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteRequest {
    /// Deposit ether; how much token must accompany it?
    DepositEth { amount: U256 },
    /// Deposit token; how much ether must accompany it?
    DepositToken { amount: U256 },
    /// Burn LP shares; what comes back on each leg?
    BurnLiquidity { lp_amount: U256 },
    /// Swap an input amount in the given direction
    Swap {
        direction: SwapDirection,
        amount: U256,
    },
}

/// Engine output for one request. Pure data, no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    RequiredToken(U256),
    RequiredEth(U256),
    Redemption { eth_out: U256, token_out: U256 },
    SwapOutput(U256),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> PoolSnapshot {
        PoolSnapshot {
            eth_reserve: U256::from(10u64) * U256::exp10(18),
            token_reserve: U256::from(10_000u64) * U256::exp10(18),
            lp_total_supply: U256::from(10u64) * U256::exp10(18),
        }
    }

    #[test]
    fn deposit_eth_quotes_token_leg() {
        let quote = seeded()
            .quote(
                QuoteRequest::DepositEth {
                    amount: U256::exp10(18),
                },
                30,
            )
            .unwrap();
        assert_eq!(
            quote,
            Quote::RequiredToken(U256::from(1000u64) * U256::exp10(18))
        );
    }

    #[test]
    fn deposit_token_quotes_eth_leg() {
        let quote = seeded()
            .quote(
                QuoteRequest::DepositToken {
                    amount: U256::from(1000u64) * U256::exp10(18),
                },
                30,
            )
            .unwrap();
        assert_eq!(quote, Quote::RequiredEth(U256::exp10(18)));
    }

    #[test]
    fn burn_quotes_both_legs_from_one_snapshot() {
        let snapshot = seeded();
        let quote = snapshot
            .quote(
                QuoteRequest::BurnLiquidity {
                    lp_amount: U256::exp10(18),
                },
                30,
            )
            .unwrap();
        assert_eq!(
            quote,
            Quote::Redemption {
                eth_out: U256::exp10(18),
                token_out: U256::from(1000u64) * U256::exp10(18),
            }
        );
    }

    #[test]
    fn swap_direction_orders_reserves() {
        let snapshot = seeded();
        assert_eq!(
            SwapDirection::EthToToken.reserves(&snapshot),
            (snapshot.eth_reserve, snapshot.token_reserve)
        );
        assert_eq!(
            SwapDirection::TokenToEth.reserves(&snapshot),
            (snapshot.token_reserve, snapshot.eth_reserve)
        );
    }

    #[test]
    fn swap_quotes_match_the_primitive() {
        let snapshot = seeded();
        let quote = snapshot
            .quote(
                QuoteRequest::Swap {
                    direction: SwapDirection::EthToToken,
                    amount: U256::exp10(18),
                },
                30,
            )
            .unwrap();
        let direct = math::swap_output(
            U256::exp10(18),
            snapshot.eth_reserve,
            snapshot.token_reserve,
            30,
        )
        .unwrap();
        assert_eq!(quote, Quote::SwapOutput(direct));
    }

    #[test]
    fn unseeded_pool_rejects_ratio_quotes() {
        let unseeded = PoolSnapshot {
            eth_reserve: U256::zero(),
            token_reserve: U256::zero(),
            lp_total_supply: U256::zero(),
        };
        assert!(!unseeded.is_seeded());
        assert_eq!(
            unseeded.quote(
                QuoteRequest::DepositEth {
                    amount: U256::exp10(18)
                },
                30
            ),
            Err(QuoteError::InvalidReserves)
        );
        assert_eq!(
            unseeded.quote(
                QuoteRequest::BurnLiquidity {
                    lp_amount: U256::one()
                },
                30
            ),
            Err(QuoteError::InvalidSupply)
        );
    }
}
