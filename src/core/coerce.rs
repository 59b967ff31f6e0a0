//! Text-to-number coercion at the input boundary.
//!
//! Anything that does not parse as a finite number becomes `0.0`; the form
//! never rejects a keystroke.

/// Parse user-entered text as a number, falling back to zero.
pub fn coerce_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse a probability slider value, clamped into 0..=100.
pub fn coerce_probability(raw: &str) -> u8 {
    coerce_number(raw).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_padded_numbers() {
        assert_eq!(coerce_number("42"), 42.0);
        assert_eq!(coerce_number("  12.5 "), 12.5);
        assert_eq!(coerce_number("-3"), -3.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
    }

    #[test]
    fn unparseable_becomes_zero() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number("1,000"), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
    }

    #[test]
    fn probability_is_rounded_and_clamped() {
        assert_eq!(coerce_probability("70"), 70);
        assert_eq!(coerce_probability("69.6"), 70);
        assert_eq!(coerce_probability("150"), 100);
        assert_eq!(coerce_probability("-5"), 0);
        assert_eq!(coerce_probability("x"), 0);
    }
}
