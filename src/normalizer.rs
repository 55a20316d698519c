// Number extraction from element text

/// Parses the leading decimal number of `text`, ignoring `,` thousands separators.
///
/// Leading whitespace is skipped and anything after the number is ignored, so
/// `"85%"` yields `85.0`. Returns `None` when no number starts the text.
pub fn extract_number(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    let trimmed = cleaned.trim_start();
    let len = numeric_prefix_len(trimmed);
    if len == 0 {
        return None;
    }

    let value = trimmed[..len].parse::<f64>().ok()?;
    if value.is_nan() { None } else { Some(value) }
}

fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return i + "Infinity".len();
    }

    let int_digits = count_digits(&bytes[i..]);
    i += int_digits;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = count_digits(&bytes[i + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    // exponent only counts when followed by digits
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(&bytes[j..]);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    i
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_separator_stripped() {
        assert_eq!(extract_number("1,234.5"), Some(1234.5));
        assert_eq!(extract_number("1,234,567"), Some(1234567.0));
    }

    #[test]
    fn test_unparsable_is_none() {
        assert_eq!(extract_number("abc"), None);
        assert_eq!(extract_number(""), None);
        assert_eq!(extract_number("   "), None);
        assert_eq!(extract_number("."), None);
        assert_eq!(extract_number("-"), None);
        assert_eq!(extract_number("NaN"), None);
    }

    #[test]
    fn test_trailing_text_ignored() {
        assert_eq!(extract_number("85%"), Some(85.0));
        assert_eq!(extract_number("  42.5 patients"), Some(42.5));
        assert_eq!(extract_number("10 ⇑"), Some(10.0));
    }

    #[test]
    fn test_signs_fractions_and_exponents() {
        assert_eq!(extract_number("-3"), Some(-3.0));
        assert_eq!(extract_number("+7.25"), Some(7.25));
        assert_eq!(extract_number(".5"), Some(0.5));
        assert_eq!(extract_number("5."), Some(5.0));
        assert_eq!(extract_number("1e2"), Some(100.0));
        assert_eq!(extract_number("1e"), Some(1.0));
        assert_eq!(extract_number("2E-1x"), Some(0.2));
    }

    #[test]
    fn test_infinity() {
        assert_eq!(extract_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(extract_number("-Infinity"), Some(f64::NEG_INFINITY));
    }
}
