//! Number conversions shared by the lexer and the interpreter.
//!
//! - [`number_to_string`] - Number::toString (radix 10)
//! - [`string_to_number`] - StringToNumber
//! - [`to_int32`] / [`to_uint32`] - 32-bit integer views used by bitwise operators

/// Format a Number the way the language's `String(n)` does.
///
/// Uses the shortest digit string that round-trips, then lays it out in
/// fixed or exponential notation depending on the decimal exponent.
///
/// # Examples
///
/// ```
/// use core_types::number_to_string;
///
/// assert_eq!(number_to_string(4.0), "4");
/// assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(number_to_string(1e21), "1e+21");
/// assert_eq!(number_to_string(-0.0), "0");
/// ```
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value < 0.0 {
        return format!("-{}", number_to_string(-value));
    }

    let (digits, n) = shortest_digits(value);
    let k = digits.len() as i32;

    if k <= n && n <= 21 {
        let mut out = digits;
        out.extend(std::iter::repeat('0').take((n - k) as usize));
        out
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{}.{}", int_part, frac_part)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let exponent = n - 1;
        let sign = if exponent < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, exponent.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, exponent.abs())
        }
    }
}

/// Decompose a finite positive value into its shortest significant digits
/// `s` and decimal exponent `n`, such that `value == s * 10^(n - len(s))`.
fn shortest_digits(value: f64) -> (String, i32) {
    let mut buffer = ryu::Buffer::new();
    let formatted = buffer.format_finite(value);

    let (mantissa, exponent) = match formatted.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (formatted, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut digits: String = int_part.chars().chain(frac_part.chars()).collect();
    let mut n = int_part.len() as i32 + exponent;

    let leading_zeros = digits.chars().take_while(|c| *c == '0').count();
    digits.drain(..leading_zeros);
    n -= leading_zeros as i32;

    let trimmed_len = digits.trim_end_matches('0').len();
    digits.truncate(trimmed_len);

    (digits, n)
}

/// Convert a string to a Number.
///
/// Surrounding whitespace is ignored, the empty string is `0`, and
/// `0x`/`0o`/`0b` prefixes are honored. Anything that is not a complete
/// numeric literal yields NaN.
///
/// # Examples
///
/// ```
/// use core_types::string_to_number;
///
/// assert_eq!(string_to_number("  42 "), 42.0);
/// assert_eq!(string_to_number(""), 0.0);
/// assert_eq!(string_to_number("0x1F"), 31.0);
/// assert!(string_to_number("12px").is_nan());
/// ```
pub fn string_to_number(input: &str) -> f64 {
    let trimmed = input.trim_matches(is_string_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix_digits(&trimmed[2..], radix).unwrap_or(f64::NAN);
    }

    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    if !is_decimal_literal(unsigned) {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse a run of digits in the given radix into a Number.
///
/// Returns `None` for an empty run or a digit outside the radix.
pub fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
}

fn is_string_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// `digits [. digits] [e [+-] digits]` or `. digits [e ...]`, at least one digit
/// in the mantissa.
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut mantissa_digits = 0;

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exponent_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exponent_start {
            return false;
        }
    }
    i == bytes.len()
}

/// ToInt32: truncate toward zero and wrap modulo 2^32 into the signed range.
/// NaN and infinities map to 0.
///
/// # Examples
///
/// ```
/// use core_types::to_int32;
///
/// assert_eq!(to_int32(4294967297.0), 1);
/// assert_eq!(to_int32(2147483648.0), -2147483648);
/// assert_eq!(to_int32(f64::NAN), 0);
/// ```
pub fn to_int32(value: f64) -> i32 {
    to_uint32(value) as i32
}

/// ToUint32: truncate toward zero and wrap modulo 2^32.
/// NaN and infinities map to 0.
pub fn to_uint32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let wrapped = value.trunc().rem_euclid(4_294_967_296.0);
    wrapped as u32
}
