//! Weighted-pool (Balancer-style) execution model

use rust_decimal::prelude::*;

/// Swap against a two-asset weighted pool:
/// `out = reserve_out × (1 − (reserve_in / (reserve_in + in))^(w_in / w_out))`.
///
/// Returns (amount_out, spot_before, spot_after), prices as output-per-input.
/// Spot price is `(reserve_out / w_out) / (reserve_in / w_in)`.
pub(super) fn swap(
    reserve_in: Decimal,
    reserve_out: Decimal,
    weight_in: Decimal,
    weight_out: Decimal,
    amount_in_after_fee: Decimal,
) -> (Decimal, Decimal, Decimal) {
    let base = reserve_in / (reserve_in + amount_in_after_fee);
    let exponent = weight_in / weight_out;
    let amount_out = reserve_out * (Decimal::ONE - base.powd(exponent));

    let spot = |rin: Decimal, rout: Decimal| (rout / weight_out) / (rin / weight_in);
    let price_before = spot(reserve_in, reserve_out);
    let price_after = spot(reserve_in + amount_in_after_fee, reserve_out - amount_out);

    (amount_out, price_before, price_after)
}
