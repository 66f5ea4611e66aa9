//! Monetary types for odds and stake representation.

use rust_decimal::Decimal;

/// Decimal (European) odds, e.g. `2.10` pays 2.10 per unit staked.
pub type Odds = Decimal;

/// Amount of money placed on a single leg.
pub type Stake = Decimal;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn odds_and_stake_are_decimal() {
        let odds: Odds = dec!(2.10);
        let stake: Stake = dec!(100);

        assert_eq!(odds * stake, dec!(210.00));
    }
}
