/// Non-finite values collapse to zero.
pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Lenient float parse: takes the longest numeric prefix of `text`
/// (after leading whitespace) and falls back to zero.
///
/// `"23.5C"` parses as `23.5`, `"abc"` and `""` as `0.0`.
pub fn parse_lenient(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut best = 0;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
                best = end;
            }
            b'.' if !seen_dot && !seen_exp => {
                seen_dot = true;
                end += 1;
            }
            b'e' | b'E' if seen_digit && !seen_exp => {
                seen_exp = true;
                end += 1;
                if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
                    end += 1;
                }
            }
            _ => break,
        }
    }

    if !seen_digit {
        return 0.0;
    }
    s[..best]
        .parse::<f64>()
        .map(finite_or_zero)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn finite_or_zero_collapses_nan_and_inf() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(-4.5), -4.5);
    }

    #[test]
    fn parse_lenient_prefixes() {
        assert_eq!(parse_lenient("42"), 42.0);
        assert_eq!(parse_lenient("  23.5C"), 23.5);
        assert_eq!(parse_lenient("-7"), -7.0);
        assert_eq!(parse_lenient(".5"), 0.5);
        assert_eq!(parse_lenient("1e3x"), 1000.0);
        assert_eq!(parse_lenient("12."), 12.0);
    }

    #[test]
    fn parse_lenient_garbage_is_zero() {
        assert_eq!(parse_lenient(""), 0.0);
        assert_eq!(parse_lenient("abc"), 0.0);
        assert_eq!(parse_lenient("-"), 0.0);
        assert_eq!(parse_lenient("."), 0.0);
        assert_eq!(parse_lenient("NaN"), 0.0);
    }

    proptest! {
        #[test]
        fn parse_lenient_matches_display(v in -1.0e6f64..1.0e6) {
            let parsed = parse_lenient(&v.to_string());
            prop_assert!((parsed - v).abs() <= 1e-9 * v.abs().max(1.0));
        }
    }
}
