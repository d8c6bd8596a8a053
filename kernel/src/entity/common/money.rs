/// Tolerance for comparing currency amounts computed in floating point.
pub const AMOUNT_EPSILON: f64 = 0.01;

pub fn amounts_match(left: f64, right: f64) -> bool {
    (left - right).abs() < AMOUNT_EPSILON
}
