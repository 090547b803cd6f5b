//! Fixed-width base-30 digits (`0-9` then `a-t`).

/// Symbols in digit order.
pub const ALPHABET: &[u8; 30] = b"0123456789abcdefghijklmnopqrst";

/// Largest value representable in two digits.
pub const MAX_PAIR: u32 = 30 * 30 - 1;

/// Render `value` as exactly two base-30 digits.
///
/// Returns `None` when the value does not fit in two digits.
pub fn encode_pair(value: u32) -> Option<[u8; 2]> {
    if value > MAX_PAIR {
        return None;
    }
    Some([
        ALPHABET[(value / 30) as usize],
        ALPHABET[(value % 30) as usize],
    ])
}

/// Parse a single base-30 digit.
pub fn digit_value(symbol: u8) -> Option<u32> {
    match symbol {
        b'0'..=b'9' => Some((symbol - b'0') as u32),
        b'a'..=b't' => Some((symbol - b'a') as u32 + 10),
        _ => None,
    }
}

/// Parse two base-30 digits.
pub fn decode_pair(pair: &[u8]) -> Option<u32> {
    match pair {
        [hi, lo] => Some(digit_value(*hi)? * 30 + digit_value(*lo)?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_zero_padded() {
        assert_eq!(&encode_pair(0).unwrap(), b"00");
        assert_eq!(&encode_pair(7).unwrap(), b"07");
        assert_eq!(&encode_pair(29).unwrap(), b"0t");
        assert_eq!(&encode_pair(30).unwrap(), b"10");
        assert_eq!(&encode_pair(MAX_PAIR).unwrap(), b"tt");
        assert!(encode_pair(MAX_PAIR + 1).is_none());
    }

    #[test]
    fn test_decode_rejects_foreign_symbols() {
        assert_eq!(decode_pair(b"6p"), Some(205));
        assert_eq!(decode_pair(b"6u"), None);
        assert_eq!(decode_pair(b"6P"), None);
        assert_eq!(decode_pair(b"-1"), None);
        assert_eq!(decode_pair(b"1"), None);
    }
}
