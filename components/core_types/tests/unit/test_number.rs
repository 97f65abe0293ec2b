//! Unit tests for the number conversions

use core_types::{number_to_string, parse_radix_digits, string_to_number, to_int32, to_uint32};

mod number_to_string_tests {
    use super::*;

    #[test]
    fn test_integral_values_have_no_fraction() {
        for n in [0.0, 1.0, 4.0, 42.0, 1000.0, 4294967297.0, 9007199254740992.0] {
            let s = number_to_string(n);
            assert!(!s.contains('.'), "{} formatted as {}", n, s);
        }
        assert_eq!(number_to_string(4.0), "4");
    }

    #[test]
    fn test_shortest_round_trip() {
        assert_eq!(number_to_string(0.1), "0.1");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn test_exponent_thresholds() {
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(123456789012345680000.0), "123456789012345680000");
        assert_eq!(number_to_string(0.000001), "0.000001");
        assert_eq!(number_to_string(0.0000001), "1e-7");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(number_to_string(-0.0), "0");
    }
}

mod string_to_number_tests {
    use super::*;

    #[test]
    fn test_whitespace_and_empty() {
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("   "), 0.0);
        assert_eq!(string_to_number(" 12 "), 12.0);
    }

    #[test]
    fn test_prefixed_integers() {
        assert_eq!(string_to_number("0xff"), 255.0);
        assert_eq!(string_to_number("0B11"), 3.0);
        assert_eq!(string_to_number("0o10"), 8.0);
        assert!(string_to_number("0xg").is_nan());
    }

    #[test]
    fn test_infinity_spelling() {
        assert_eq!(string_to_number("Infinity"), f64::INFINITY);
        assert_eq!(string_to_number("+Infinity"), f64::INFINITY);
        assert!(string_to_number("infinity").is_nan());
    }

    #[test]
    fn test_non_numeric() {
        assert!(string_to_number("b").is_nan());
        assert!(string_to_number("1 2").is_nan());
        assert!(string_to_number("NaN").is_nan());
    }

    #[test]
    fn test_parse_radix_digits() {
        assert_eq!(parse_radix_digits("777", 8), Some(511.0));
        assert_eq!(parse_radix_digits("", 16), None);
        assert_eq!(parse_radix_digits("12", 2), None);
    }
}

mod int32_tests {
    use super::*;

    #[test]
    fn test_wraps_modulo_two_pow_32() {
        assert_eq!(to_uint32(4294967297.0), 1);
        assert_eq!(to_int32(4294967295.0), -1);
        assert_eq!(to_uint32(-13.0), 4294967283);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(to_int32(f64::NAN), 0);
        assert_eq!(to_int32(f64::NEG_INFINITY), 0);
        assert_eq!(to_uint32(f64::NAN), 0);
    }
}
