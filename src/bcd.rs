//! Packed binary-coded-decimal conversion.
//!
//! Every time keeping register on the supported chips stores two decimal
//! digits per byte, tens in the high nibble and ones in the low nibble.
//! Both conversions are plain arithmetic and perform no validation: a byte
//! with a nibble above 9 decodes to a meaningless number, and a value above
//! 99 encodes to a meaningless byte. Neither case panics.

/// Decodes a packed BCD byte into its binary value.
///
/// `0x59` decodes to `59`.
#[inline]
pub const fn decode(value: u8) -> u8 {
    // 16 * tens + ones - 6 * tens == 10 * tens + ones
    value - 6 * (value >> 4)
}

/// Encodes a binary value in `0..=99` as a packed BCD byte.
///
/// `59` encodes to `0x59`.
#[inline]
pub const fn encode(value: u8) -> u8 {
    value.wrapping_add(6u8.wrapping_mul(value / 10))
}

/// Returns `true` when both nibbles of `value` are decimal digits.
#[inline]
pub const fn is_valid(value: u8) -> bool {
    value >> 4 <= 9 && value & 0x0f <= 9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode(0x00), 0);
        assert_eq!(decode(0x09), 9);
        assert_eq!(decode(0x10), 10);
        assert_eq!(decode(0x59), 59);
        assert_eq!(decode(0x99), 99);
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(0), 0x00);
        assert_eq!(encode(9), 0x09);
        assert_eq!(encode(10), 0x10);
        assert_eq!(encode(30), 0x30);
        assert_eq!(encode(99), 0x99);
    }

    #[test]
    fn test_decode_inverts_encode() {
        for value in 0..=99u8 {
            assert_eq!(decode(encode(value)), value);
        }
    }

    #[test]
    fn test_encode_inverts_decode_on_valid_bytes() {
        for tens in 0..=9u8 {
            for ones in 0..=9u8 {
                let byte = (tens << 4) | ones;
                assert!(is_valid(byte));
                assert_eq!(encode(decode(byte)), byte);
            }
        }
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        assert!(!is_valid(0x1a));
        assert!(!is_valid(0xa1));
        // garbage in, garbage out
        assert_eq!(decode(0xff), 165);
        let _ = encode(255);
    }
}
