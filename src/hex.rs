// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Number-to-hexadecimal and hexadecimal-to-number conversions.
//!
//! Encoding always writes lowercase digits. Decoding is best-effort: every
//! character that is not `0-9`, `a-f` or `A-F` is skipped as noise, so
//! malformed input decodes to *some* number instead of failing.

use std::fmt;

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Unsigned integers that have a natural hexadecimal width.
pub trait HexWidth: Copy + Into<u64> {
    /// Number of hex digits needed to print every bit of the type.
    const DIGITS: usize;
}

impl HexWidth for u8 {
    const DIGITS: usize = 2;
}

impl HexWidth for u16 {
    const DIGITS: usize = 4;
}

impl HexWidth for u32 {
    const DIGITS: usize = 8;
}

impl HexWidth for u64 {
    const DIGITS: usize = 16;
}

/// Writes exactly `digits` lowercase hex digits of the low `digits * 4` bits
/// of `value`, most significant digit first.
///
/// Digits beyond the width of `u64` are written as `0`.
pub fn append_hex<W: fmt::Write + ?Sized>(out: &mut W, value: u64, digits: usize) -> fmt::Result {
    for i in (0..digits).rev() {
        let nibble = u32::try_from(i * 4)
            .ok()
            .and_then(|shift| value.checked_shr(shift))
            .unwrap_or(0)
            & 0x0f;
        out.write_char(DIGITS[nibble as usize] as char)?;
    }
    Ok(())
}

/// Writes `value` using the default width of its type: 4 digits for `u16`,
/// 8 for `u32` and 16 for `u64`.
pub fn append<W: fmt::Write + ?Sized, T: HexWidth>(out: &mut W, value: T) -> fmt::Result {
    append_hex(out, value.into(), T::DIGITS)
}

/// Writes two lowercase hex digits per byte, high nibble first, in slice order.
pub fn append_bytes<W: fmt::Write + ?Sized>(out: &mut W, bytes: &[u8]) -> fmt::Result {
    for &b in bytes {
        out.write_char(DIGITS[(b >> 4) as usize] as char)?;
        out.write_char(DIGITS[(b & 0x0f) as usize] as char)?;
    }
    Ok(())
}

/// Returns `bytes` as a lowercase hex string.
pub fn encode_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    // Writing into a `String` cannot fail.
    let _ = append_bytes(&mut out, bytes);
    out
}

/// Parses up to 16 hex digits into a `u64`, skipping every other character.
///
/// Returns 0 if the input holds no hex digit. Characters after the 16th digit
/// are not inspected.
pub fn parse_hex(text: impl AsRef<[u8]>) -> u64 {
    accumulate(text.as_ref(), 16)
}

/// Parses up to 4 hex digits into a `u16`, skipping every other character.
pub fn parse_hex_short(text: impl AsRef<[u8]>) -> u16 {
    accumulate(text.as_ref(), 4) as u16
}

fn accumulate(text: &[u8], quota: usize) -> u64 {
    let mut out = 0u64;
    let mut taken = 0;
    for &c in text {
        if taken == quota {
            break;
        }
        if let Some(digit) = digit_value(c) {
            out = (out << 4) | u64::from(digit);
            taken += 1;
        }
    }
    out
}

/// Returns the value of an ASCII hex digit.
pub(crate) fn digit_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_of<T: HexWidth>(value: T) -> String {
        let mut s = String::new();
        append(&mut s, value).unwrap();
        s
    }

    #[test]
    fn appends_with_default_widths() {
        assert_eq!(hex_of(0xabu8), "ab");
        assert_eq!(hex_of(0x1u16), "0001");
        assert_eq!(hex_of(0xdead_beefu32), "deadbeef");
        assert_eq!(hex_of(0x0123_4567_89ab_cdefu64), "0123456789abcdef");
        assert_eq!(hex_of(u64::MAX), "ffffffffffffffff");
    }

    #[test]
    fn appends_low_bits_for_explicit_width() {
        let mut s = String::new();
        append_hex(&mut s, 0x8000_1234_5678_9abc, 12).unwrap();
        assert_eq!(s, "123456789abc");

        s.clear();
        append_hex(&mut s, 0xff, 20).unwrap();
        assert_eq!(s, "000000000000000000ff");

        s.clear();
        append_hex(&mut s, 0xff, 0).unwrap();
        assert_eq!(s, "");
    }

    #[test]
    fn high_bit_values_do_not_sign_extend() {
        let mut s = String::new();
        append_hex(&mut s, u64::from(0x8000u16), 8).unwrap();
        assert_eq!(s, "00008000");
        assert_eq!(parse_hex("8000000000000000"), 0x8000_0000_0000_0000);
        assert_eq!(parse_hex_short("ffff"), 0xffff);
    }

    #[test]
    fn appends_bytes_in_order() {
        let mut s = String::new();
        append_bytes(&mut s, &[0x00, 0x1e, 0xc2, 0xff]).unwrap();
        assert_eq!(s, "001ec2ff");
        assert_eq!(encode_bytes(&[]), "");
    }

    #[test]
    fn parses_back_what_was_appended() {
        for &x in &[0u64, 1, 0x7fff_ffff_ffff_ffff, 0x8000_0000_0000_0000, u64::MAX] {
            assert_eq!(parse_hex(hex_of(x)), x);
        }
        for &x in &[0u16, 0x7fff, 0x8000, u16::MAX] {
            assert_eq!(parse_hex_short(hex_of(x)), x);
        }
    }

    #[test]
    fn skips_noise_characters() {
        assert_eq!(parse_hex("00-1C-23-AD-D1-5A"), 0x001c_23ad_d15a);
        assert_eq!(parse_hex("0x ff zz"), 0xff);
        assert_eq!(parse_hex("Überraschung 1"), 0xbeac1);
    }

    #[test]
    fn returns_zero_without_digits() {
        assert_eq!(parse_hex(""), 0);
        assert_eq!(parse_hex("ghijk - :"), 0);
        assert_eq!(parse_hex_short("xyz"), 0);
    }

    #[test]
    fn stops_at_digit_quota() {
        assert_eq!(parse_hex("0123456789abcdef0123"), 0x0123_4567_89ab_cdef);
        assert_eq!(parse_hex_short("1234-5678"), 0x1234);
        assert_eq!(parse_hex_short("12:34:56"), 0x1234);
    }
}
