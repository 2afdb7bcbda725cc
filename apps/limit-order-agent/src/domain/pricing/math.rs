//! Amount and price arithmetic.
//!
//! Prices are `Decimal` rates in human units (buy per one sell); amounts
//! are `u64` base units. The slippage floor is pure integer math with the
//! basis-point denominator fixed at 10000.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Basis-point denominator: 10000 bps = 100%.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Convert a base-unit amount to its human-readable value.
#[must_use]
pub fn to_human(amount: u64, decimals: u8) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(amount), u32::from(decimals))
}

/// Convert a human-readable amount to base units, truncating any
/// fractional base unit.
#[must_use]
pub fn from_human(amount: Decimal, decimals: u8) -> u64 {
    let scaled = amount * Decimal::from(10u64.pow(u32::from(decimals)));
    scaled.trunc().to_u64().unwrap_or(0)
}

/// Price implied by a venue quote: human buy-units per one human
/// sell-unit. Returns zero for a zero input amount.
#[must_use]
pub fn calculate_price(
    input_amount: u64,
    output_amount: u64,
    input_decimals: u8,
    output_decimals: u8,
) -> Decimal {
    if input_amount == 0 {
        return Decimal::ZERO;
    }
    to_human(output_amount, output_decimals) / to_human(input_amount, input_decimals)
}

/// Minimum acceptable output after applying the slippage tolerance:
/// `expected * (10000 - bps) / 10000` in integer arithmetic.
#[must_use]
pub fn min_output(expected_output: u64, slippage_bps: u16) -> u64 {
    let bps = u128::from(slippage_bps.min(10_000));
    let floored = u128::from(expected_output) * (BPS_DENOMINATOR - bps) / BPS_DENOMINATOR;
    // Cannot exceed the input, so the cast is lossless.
    floored as u64
}

/// Expected output in buy-token base units for a sell amount at a rate.
#[must_use]
pub fn expected_output(
    amount_in: u64,
    price: Decimal,
    sell_decimals: u8,
    buy_decimals: u8,
) -> u64 {
    let human_in = to_human(amount_in, sell_decimals);
    from_human(human_in * price, buy_decimals)
}

/// Inverse of a rate; zero stays zero.
#[must_use]
pub fn inverse_price(price: Decimal) -> Decimal {
    if price > Decimal::ZERO {
        Decimal::ONE / price
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn to_human_six_decimals() {
        assert_eq!(to_human(1_000_000, 6), dec!(1.000000));
        assert_eq!(to_human(1_500_000, 6), dec!(1.500000));
    }

    #[test]
    fn from_human_truncates() {
        assert_eq!(from_human(dec!(1.5), 6), 1_500_000);
        assert_eq!(from_human(dec!(0.0000019), 6), 1);
    }

    #[test]
    fn human_roundtrip() {
        let amount = 123_456_789_u64;
        assert_eq!(from_human(to_human(amount, 18), 18), amount);
    }

    #[test]
    fn min_output_fifty_bps() {
        assert_eq!(min_output(1_000_000, 50), 995_000);
    }

    #[test]
    fn min_output_zero_bps_is_identity() {
        assert_eq!(min_output(42, 0), 42);
        assert_eq!(min_output(u64::MAX, 0), u64::MAX);
    }

    #[test]
    fn min_output_full_slippage_is_zero() {
        assert_eq!(min_output(1_000_000, 10_000), 0);
    }

    #[test]
    fn min_output_no_overflow_on_large_amounts() {
        // u64::MAX * 9950 overflows u64; the u128 intermediate must not.
        let floored = min_output(u64::MAX, 50);
        assert!(floored < u64::MAX);
        assert!(floored > u64::MAX / 10_000 * 9_949);
    }

    #[test]
    fn calculate_price_cross_decimals() {
        // 1,000,000 units of a 6-decimal token bought 0.5 WETH (18 dec).
        let price = calculate_price(1_000_000, 500_000_000_000_000_000, 6, 18);
        assert_eq!(price, dec!(0.5));
    }

    #[test]
    fn calculate_price_zero_input() {
        assert_eq!(calculate_price(0, 1_000, 6, 6), Decimal::ZERO);
    }

    #[test]
    fn expected_output_scales_to_buy_decimals() {
        // 1 USDC (6 dec) at 0.0005 WETH/USDC -> 0.0005 WETH in 18 dec.
        assert_eq!(
            expected_output(1_000_000, dec!(0.0005), 6, 18),
            500_000_000_000_000
        );
    }

    #[test]
    fn expected_output_same_decimals() {
        assert_eq!(expected_output(1_000_000, dec!(1.001), 6, 6), 1_001_000);
    }

    #[test]
    fn inverse_price_of_zero_is_zero() {
        assert_eq!(inverse_price(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(inverse_price(dec!(4)), dec!(0.25));
    }
}
