//! Value codec: real value <-> quantized tick conversion and display formatting.
//!
//! Ticks are the integer timeline domain the driver interpolates over. A value
//! with `d` decimal places maps to `truncate(value * 10^d)`, so stepping
//! through ticks never accumulates floating error; the real value is only
//! rebuilt on emission via [`from_tick`].

use crate::error::CountupError;
use crate::Result;

/// Largest supported number of decimal places. Beyond this an `f64` no longer
/// carries enough significant digits for the tick to be meaningful.
pub const MAX_DECIMAL_PLACES: u32 = 15;

/// 2^63 as f64; ticks must lie in `[-2^63, 2^63)`.
const TICK_LIMIT: f64 = 9_223_372_036_854_775_808.0;

#[inline]
fn pow10(decimal_places: u32) -> f64 {
    10_f64.powi(decimal_places.min(i32::MAX as u32) as i32)
}

/// Convert a real value into tick space, truncating toward zero.
///
/// Fails with [`CountupError::InvalidValue`] for NaN/infinite input and with
/// [`CountupError::ArithmeticOverflow`] when the scaled value does not fit in
/// an `i64`.
pub fn to_tick(value: f64, decimal_places: u32) -> Result<i64> {
    if !value.is_finite() {
        return Err(CountupError::InvalidValue { value });
    }
    if value == 0.0 {
        return Ok(0);
    }

    let scaled = if decimal_places == 0 {
        value
    } else {
        value * pow10(decimal_places)
    };
    let truncated = scaled.trunc();
    if !truncated.is_finite() || truncated >= TICK_LIMIT || truncated < -TICK_LIMIT {
        return Err(CountupError::ArithmeticOverflow {
            value,
            decimal_places,
        });
    }
    Ok(truncated as i64)
}

/// Convert a tick back into a real value.
#[inline]
pub fn from_tick(tick: i64, decimal_places: u32) -> f64 {
    if decimal_places == 0 {
        return tick as f64;
    }
    tick as f64 / pow10(decimal_places)
}

/// Render `value` as fixed-point text.
///
/// Integer digits are grouped in threes with `thousands_separator` and the
/// fraction is joined with `decimal`. Separators are written directly while
/// building the string, so separators that look like `.` or `,` are never
/// substituted a second time. Rounding is half away from zero; a result that
/// rounds to zero carries no sign.
pub fn format_value(
    value: f64,
    decimal_places: u32,
    decimal: &str,
    thousands_separator: &str,
) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let places = decimal_places as usize;
    let scaled = (value * pow10(decimal_places)).round();
    let (negative, mut digits) = if scaled.is_finite() {
        (scaled < 0.0, format!("{:.0}", scaled.abs()))
    } else {
        // Only reachable with absurd decimal place counts.
        let text = format!("{:.*}", places, value.abs());
        let negative = value < 0.0 && text.bytes().any(|b| b.is_ascii_digit() && b != b'0');
        (negative, text.replace('.', ""))
    };

    if digits.len() <= places {
        let padding = "0".repeat(places + 1 - digits.len());
        digits.insert_str(0, &padding);
    }
    let (int_part, frac_part) = digits.split_at(digits.len() - places);

    let mut out = String::with_capacity(
        digits.len() + 1 + decimal.len() + int_part.len() / 3 * thousands_separator.len(),
    );
    if negative {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(thousands_separator);
        }
        out.push(ch);
    }
    if places > 0 {
        out.push_str(decimal);
        out.push_str(frac_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_tick_truncates_toward_zero() {
        assert_eq!(to_tick(1.999, 2).unwrap(), 199);
        assert_eq!(to_tick(-1.999, 2).unwrap(), -199);
        assert_eq!(to_tick(7.9, 0).unwrap(), 7);
        assert_eq!(to_tick(-7.9, 0).unwrap(), -7);
    }

    #[test]
    fn to_tick_rejects_overflow_and_nan() {
        assert!(matches!(
            to_tick(1e18, 2),
            Err(CountupError::ArithmeticOverflow { .. })
        ));
        assert!(matches!(
            to_tick(f64::NAN, 0),
            Err(CountupError::InvalidValue { .. })
        ));
        assert!(matches!(
            to_tick(f64::NEG_INFINITY, 3),
            Err(CountupError::InvalidValue { .. })
        ));
        assert_eq!(to_tick(0.0, 400).unwrap(), 0);
    }

    #[test]
    fn from_tick_zero_places_is_identity() {
        assert_eq!(from_tick(-42, 0), -42.0);
        assert_eq!(from_tick(5, 1), 0.5);
    }

    #[test]
    fn format_pads_small_fractions() {
        assert_eq!(format_value(0.05, 2, ".", ","), "0.05");
        assert_eq!(format_value(-0.5, 3, ".", ","), "-0.500");
        assert_eq!(format_value(0.0, 2, ".", ","), "0.00");
    }

    #[test]
    fn format_rounds_half_away_from_zero() {
        assert_eq!(format_value(2.5, 0, ".", ""), "3");
        assert_eq!(format_value(-2.5, 0, ".", ""), "-3");
        assert_eq!(format_value(0.125, 2, ".", ""), "0.13");
    }

    #[test]
    fn format_drops_sign_of_rounded_zero() {
        assert_eq!(format_value(-0.4, 0, ".", ","), "0");
        assert_eq!(format_value(-0.001, 2, ".", ","), "0.00");
    }

    #[test]
    fn format_groups_integer_digits() {
        assert_eq!(format_value(999.0, 0, ".", ","), "999");
        assert_eq!(format_value(1000.0, 0, ".", ","), "1,000");
        assert_eq!(format_value(-1234567.0, 0, ".", "'"), "-1'234'567");
    }

    #[test]
    fn format_swapped_separators_do_not_collide() {
        assert_eq!(format_value(1234567.891, 2, ",", "."), "1.234.567,89");
        assert_eq!(format_value(1234.5, 1, ".", "."), "1.234.5");
    }
}
