//! Data formatting helpers (translates the scientific-notation rendering
//! used by the tree's textual dump).

use crate::Real;

/// Format `value` in scientific notation with `sig_digits` significant
/// digits in the mantissa, e.g. `format_scientific(2.0, 3)` → `"2.00e0"`.
///
/// Rust's built-in `{:e}` formatter does not accept a mantissa-precision
/// specifier directly combined with significant-digit semantics the way
/// Python's `%.3e` does, so the mantissa is normalized by hand.
pub fn format_scientific(value: Real, sig_digits: usize) -> String {
    if value == 0.0 {
        return format!("{:.*}e0", sig_digits.saturating_sub(1), 0.0);
    }
    if !value.is_finite() {
        return if value.is_sign_negative() {
            "-inf".to_string()
        } else {
            "inf".to_string()
        };
    }
    let exponent = value.abs().log10().floor() as i32;
    let mantissa = value / 10f64.powi(exponent);
    // Guard against rounding the mantissa up to 10.0 (e.g. 9.999 -> 10.0).
    let (mantissa, exponent) = if mantissa.abs() >= 10.0 {
        (mantissa / 10.0, exponent + 1)
    } else {
        (mantissa, exponent)
    };
    format!(
        "{:.*}e{}",
        sig_digits.saturating_sub(1),
        mantissa,
        exponent
    )
}
