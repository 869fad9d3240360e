//! UTF-8 to UTF-16 decoding for glyph lookups.
//!
//! Glyph tables are indexed by 16 bit code units, so only 1 to 3 byte sequences
//! (up to U+FFFF) are decoded. Anything else is dropped one byte at a time: a 4 byte
//! lead byte, a stray continuation byte and a sequence cut short by the end of the input.
//! Characters above U+FFFF are therefore lost rather than turned into surrogate pairs.
//! Continuation bytes are masked, not validated.

use alloc::vec::Vec;

pub fn utf8_to_utf16(text: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity(text.len());
    let mut i = 0;

    while i < text.len() {
        let lead = text[i];
        let (len, bits) = if lead & 0x80 == 0 {
            (1, lead as u16)
        } else if lead & 0xE0 == 0xC0 {
            (2, (lead & 0x1F) as u16)
        } else if lead & 0xF0 == 0xE0 {
            (3, (lead & 0x0F) as u16)
        } else {
            i += 1;
            continue;
        };

        let Some(tail) = text.get(i + 1..i + len) else {
            i += 1;
            continue;
        };
        let unit = tail
            .iter()
            .fold(bits, |acc, &byte| (acc << 6) | (byte & 0x3F) as u16);
        out.push(unit);
        i += len;
    }

    out
}

/// Decimal digits of `value` as code units.
pub fn decimal(value: i64) -> Vec<u16> {
    alloc::string::ToString::to_string(&value)
        .encode_utf16()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ascii_and_multibyte() {
        assert_eq!(utf8_to_utf16(b"Hi"), vec![0x48, 0x69]);
        assert_eq!(utf8_to_utf16("é".as_bytes()), vec![0xE9]);
        assert_eq!(utf8_to_utf16("שלום".as_bytes()), vec![0x5E9, 0x5DC, 0x5D5, 0x5DD]);
        assert_eq!(utf8_to_utf16("€".as_bytes()), vec![0x20AC]);
        assert_eq!(utf8_to_utf16("\u{FFFF}".as_bytes()), vec![0xFFFF]);
    }

    #[test]
    fn four_byte_sequences_are_dropped() {
        // the lead byte goes, then each continuation byte is dropped on its own
        assert_eq!(utf8_to_utf16("a😀b".as_bytes()), vec![0x61, 0x62]);
    }

    #[test]
    fn truncated_sequence_at_end() {
        assert_eq!(utf8_to_utf16(&[0x41, 0xE2, 0x82]), vec![0x41]);
        assert_eq!(utf8_to_utf16(&[0xC3]), Vec::<u16>::new());
    }

    #[test]
    fn empty_input() {
        assert!(utf8_to_utf16(b"").is_empty());
    }

    #[test]
    fn decimal_values() {
        assert_eq!(decimal(0), vec![0x30]);
        assert_eq!(decimal(-42), vec![0x2D, 0x34, 0x32]);
    }

    proptest! {
        #[test]
        fn round_trips_basic_multilingual_plane(text in "[\u{0}-\u{D7FF}\u{E000}-\u{FFFF}]*") {
            let expected: Vec<u16> = text.encode_utf16().collect();
            prop_assert_eq!(utf8_to_utf16(text.as_bytes()), expected);
        }
    }
}
