//! Constant-product (x·y = k) execution model

use rust_decimal::Decimal;

/// Swap `amount_in_after_fee` against an x·y = k pool.
///
/// Returns (amount_out, spot_before, spot_after), prices as output-per-input.
/// The fee-adjusted reserves preserve k exactly: the new output reserve is
/// computed as k / new_reserve_in rather than by subtracting a rounded output.
pub(super) fn swap(
    reserve_in: Decimal,
    reserve_out: Decimal,
    amount_in_after_fee: Decimal,
) -> (Decimal, Decimal, Decimal) {
    let k = reserve_in * reserve_out;
    let new_reserve_in = reserve_in + amount_in_after_fee;
    let new_reserve_out = k / new_reserve_in;
    let amount_out = reserve_out - new_reserve_out;

    let price_before = reserve_out / reserve_in;
    let price_after = new_reserve_out / new_reserve_in;

    (amount_out, price_before, price_after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_pool() {
        // 100k/200k pool, 1000 in at 0.3% fee -> 997 effective
        let (out, before, _after) = swap(dec!(100000), dec!(200000), dec!(997));

        let expected = dec!(200000) - dec!(20000000000) / dec!(100997);
        assert!((out - expected).abs() < dec!(0.000001));
        assert_eq!(before, dec!(2));

        // execution price vs spot: ~0.98% degradation
        let effective = out / dec!(997);
        let impact = (before - effective) / before;
        assert!(impact > dec!(0.009) && impact < dec!(0.011));
    }

    #[test]
    fn test_invariant_preserved() {
        let reserve_in = dec!(100000);
        let reserve_out = dec!(200000);
        let x = dec!(997);

        let (out, _, _) = swap(reserve_in, reserve_out, x);
        let k_before = reserve_in * reserve_out;
        let k_after = (reserve_in + x) * (reserve_out - out);

        assert!((k_after - k_before).abs() / k_before < dec!(0.000001));
    }

    #[test]
    fn test_output_bounded_by_reserve() {
        // even an absurd trade cannot drain the output side
        let (out, _, _) = swap(dec!(1000), dec!(1000), dec!(100000000));
        assert!(out < dec!(1000));
        assert!(out > dec!(0));
    }

    proptest! {
        #[test]
        fn prop_invariant_preserved(
            reserve_in in 1_000u64..10_000_000,
            reserve_out in 1_000u64..10_000_000,
            amount in 1u64..500_000,
        ) {
            let rin = Decimal::from(reserve_in);
            let rout = Decimal::from(reserve_out);
            let x = Decimal::from(amount);

            let (out, _, _) = swap(rin, rout, x);
            let k_before = rin * rout;
            let k_after = (rin + x) * (rout - out);

            prop_assert!((k_after - k_before).abs() / k_before < dec!(0.000001));
        }
    }
}
