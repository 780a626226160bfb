//! Target-language literal formatting.

use crate::domain::params::ParamValue;

/// Formats a raw parameter value as a literal.
///
/// Comma-separated values become a tuple, numeric text stays bare and
/// anything else is double-quoted. Embedded quotes are not escaped.
pub fn format(_key: &str, raw: &str) -> String {
    if raw.contains(',') {
        let items: Vec<&str> = raw.split(',').map(str::trim).collect();
        return format!("({})", items.join(","));
    }
    if is_numeric(raw) {
        return raw.to_string();
    }
    quoted(raw)
}

pub fn render(key: &str, value: &ParamValue) -> String {
    match value {
        ParamValue::Flag(b) => boolean(*b).to_string(),
        other => format(key, &other.raw()),
    }
}

pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s)
}

pub fn boolean(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// `["a", "b"]`
pub fn string_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|i| quoted(i)).collect();
    format!("[{}]", quoted.join(", "))
}

/// `-?digits[.digits][(e|E)[+-]digits]`
pub fn is_numeric(raw: &str) -> bool {
    let s = raw.strip_prefix('-').unwrap_or(raw);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let (int, frac) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };
    let digits = |d: &str| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit());
    if !digits(int) || !frac.map(digits).unwrap_or(true) {
        return false;
    }
    match exponent {
        None => true,
        Some(e) => digits(e.strip_prefix(['+', '-']).unwrap_or(e)),
    }
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_stay_bare() {
        assert_eq!(format("rate", "0.001"), "0.001");
        assert_eq!(format("units", "64"), "64");
        assert_eq!(format("epsilon", "1e-05"), "1e-05");
        assert_eq!(format("axis", "-1"), "-1");
    }

    #[test]
    fn words_are_quoted() {
        assert_eq!(format("activation", "relu"), "\"relu\"");
        assert_eq!(format("padding", "same"), "\"same\"");
        assert_eq!(format("dtype", "1.2.3"), "\"1.2.3\"");
        assert_eq!(format("name", ""), "\"\"");
    }

    #[test]
    fn comma_values_become_tuples() {
        assert_eq!(format("pool_size", "2,2"), "(2,2)");
        assert_eq!(format("shape", "28, 28, 1"), "(28,28,1)");
        assert_eq!(format("shape", "784,"), "(784,)");
    }

    #[test]
    fn numeric_pattern_rejects_non_decimal_text() {
        for raw in ["inf", "NaN", "1.", ".5", "1e", "0x10", "--1", "1_000"] {
            assert!(!is_numeric(raw), "{raw} should not be numeric");
        }
        assert!(is_numeric("3E+2"));
    }

    #[test]
    fn flags_render_as_booleans() {
        assert_eq!(render("use_bias", &ParamValue::Flag(false)), "False");
        assert_eq!(render("center", &ParamValue::Flag(true)), "True");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("conv_1"));
        assert!(is_identifier("_x"));
        assert!(!is_identifier("1conv"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn string_list_quotes_each_item() {
        let metrics = vec!["accuracy".to_string(), "mae".to_string()];
        assert_eq!(string_list(&metrics), "[\"accuracy\", \"mae\"]");
        assert_eq!(string_list(&[]), "[]");
    }
}
