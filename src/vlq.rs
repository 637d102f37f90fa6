//! Decoding of base64 VLQ encoded mapping segments.
use crate::errors::{Error, Result};

const B64: [i8; 256] = {
    let mut table = [-1i8; 256];
    let alphabet = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut i = 0;
    while i < alphabet.len() {
        table[alphabet[i] as usize] = i as i8;
        i += 1;
    }
    table
};

const VLQ_CONTINUATION_BIT: i64 = 0b10_0000;
const VLQ_PAYLOAD_MASK: i64 = 0b1_1111;

/// Parses a single VLQ segment into the signed values it encodes.
///
/// The first digit of every value carries the sign in its lowest payload
/// bit.  Continuation digits contribute five payload bits each.  An empty
/// segment yields no values.
pub fn parse_vlq_segment(segment: &str) -> Result<Vec<i64>> {
    let mut rv = vec![];

    let mut cur = 0i64;
    let mut shift = 0u32;

    for c in segment.bytes() {
        let enc = B64[c as usize];
        if enc < 0 {
            return Err(Error::VlqInvalidBase64(c));
        }
        let enc = i64::from(enc);
        let val = enc & VLQ_PAYLOAD_MASK;

        let part = val
            .checked_shl(shift)
            .filter(|part| part >> shift == val)
            .ok_or(Error::VlqOverflow)?;
        cur = cur.checked_add(part).ok_or(Error::VlqOverflow)?;
        shift += 5;

        if enc & VLQ_CONTINUATION_BIT == 0 {
            let negative = cur & 1 != 0;
            cur >>= 1;
            rv.push(if negative { -cur } else { cur });
            cur = 0;
            shift = 0;
        }
    }

    if shift != 0 {
        Err(Error::VlqLeftover)
    } else {
        Ok(rv)
    }
}

#[test]
fn test_single_digit_values() {
    assert_eq!(parse_vlq_segment("A").unwrap(), vec![0]);
    assert_eq!(parse_vlq_segment("C").unwrap(), vec![1]);
    assert_eq!(parse_vlq_segment("D").unwrap(), vec![-1]);
    assert_eq!(parse_vlq_segment("f").unwrap(), vec![-15]);
}

#[test]
fn test_multi_digit_values() {
    // 1000 = 0b1111101000 -> sign-shifted 2000
    assert_eq!(parse_vlq_segment("w+B").unwrap(), vec![1000]);
    assert_eq!(parse_vlq_segment("x+B").unwrap(), vec![-1000]);
}
