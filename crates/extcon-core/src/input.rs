//! Textual integer parsing for control endpoints
//!
//! Accepts the usual C conventions: optional sign, `0x`/`0X` prefix for hex,
//! leading `0` for octal, decimal otherwise. A single trailing newline is
//! tolerated since values usually arrive from `echo`.

use crate::error::InputError;

/// Parse a signed 32-bit integer, detecting the radix from its prefix
pub fn parse_int(text: &str) -> Result<i32, InputError> {
    let invalid = || InputError::InvalidInput(text.to_string());

    let body = text.strip_suffix('\n').unwrap_or(text);
    let (negative, digits) = match body.as_bytes().first() {
        Some(b'-') => (true, &body[1..]),
        Some(b'+') => (false, &body[1..]),
        _ => (false, body),
    };

    let (radix, digits) = split_radix(digits);
    if digits.is_empty() {
        return Err(invalid());
    }

    let mut magnitude: u64 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(radix).ok_or_else(invalid)?;
        magnitude = magnitude
            .checked_mul(u64::from(radix))
            .and_then(|m| m.checked_add(u64::from(digit)))
            .ok_or_else(|| InputError::OutOfRange(text.to_string()))?;
    }

    let value = if negative {
        -(magnitude as i128)
    } else {
        magnitude as i128
    };
    i32::try_from(value).map_err(|_| InputError::OutOfRange(text.to_string()))
}

fn split_radix(digits: &str) -> (u32, &str) {
    let bytes = digits.as_bytes();
    if bytes.len() > 2
        && bytes[0] == b'0'
        && (bytes[1] | 0x20) == b'x'
        && bytes[2].is_ascii_hexdigit()
    {
        (16, &digits[2..])
    } else if bytes.first() == Some(&b'0') {
        (8, digits)
    } else {
        (10, digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal() {
        assert_eq!(parse_int("1"), Ok(1));
        assert_eq!(parse_int("0\n"), Ok(0));
        assert_eq!(parse_int("-42"), Ok(-42));
        assert_eq!(parse_int("+7"), Ok(7));
    }

    #[test]
    fn test_hex_and_octal() {
        assert_eq!(parse_int("0x1F"), Ok(31));
        assert_eq!(parse_int("0X10\n"), Ok(16));
        assert_eq!(parse_int("010"), Ok(8));
        assert_eq!(parse_int("-0x10"), Ok(-16));
    }

    #[test]
    fn test_malformed() {
        for bad in ["", "\n", "abc", "1a", " 1", "1\n\n", "0x", "08", "-", "1.0"] {
            assert!(
                matches!(parse_int(bad), Err(InputError::InvalidInput(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_range() {
        assert_eq!(parse_int("2147483647"), Ok(i32::MAX));
        assert_eq!(parse_int("-2147483648"), Ok(i32::MIN));
        assert!(matches!(parse_int("2147483648"), Err(InputError::OutOfRange(_))));
        assert!(matches!(
            parse_int("99999999999999999999999"),
            Err(InputError::OutOfRange(_))
        ));
    }
}
