// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::ParseError;
use crate::hex;
use crate::sequencer::{unpack, EPOCH_OFFSET, TICKS_PER_MILLI};
use chrono::{DateTime, TimeZone, Utc};
use std::{fmt, str};

/// A 128-bit identifier made of a time field and a clock-sequence-and-node field.
///
/// Ordering compares `time` first, then `clock_seq_and_node`, both unsigned.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid {
    time: u64,
    clock_seq_and_node: u64,
}

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self::from_fields(0, 0);

    /// Creates a UUID from its upper and lower 64 bits.
    pub const fn from_fields(time: u64, clock_seq_and_node: u64) -> Self {
        Self {
            time,
            clock_seq_and_node,
        }
    }

    /// Returns the nil UUID.
    pub const fn nil() -> Self {
        Self::NIL
    }

    /// The time field (upper 64 bits).
    pub const fn time(&self) -> u64 {
        self.time
    }

    /// The clock sequence and node field (lower 64 bits).
    pub const fn clock_seq_and_node(&self) -> u64 {
        self.clock_seq_and_node
    }

    /// The version nibble, `1` for generated identifiers.
    pub const fn version(&self) -> u8 {
        ((self.time >> 12) & 0x0f) as u8
    }

    /// 100-nanosecond ticks since 1582-10-15, unpacked from the time field.
    pub fn ticks(&self) -> u64 {
        unpack(self.time)
    }

    /// The instant the time field encodes, at millisecond precision.
    ///
    /// Returns `None` for values chrono cannot represent, e.g. a time field
    /// that does not come from a [`Generator`](crate::Generator).
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let millis = self.ticks().checked_sub(EPOCH_OFFSET)? / TICKS_PER_MILLI;
        Utc.timestamp_millis_opt(i64::try_from(millis).ok()?).single()
    }

    /// The 14-bit clock sequence.
    pub const fn clock_sequence(&self) -> u16 {
        ((self.clock_seq_and_node >> 48) & 0x3fff) as u16
    }

    /// The 48-bit node identifier.
    pub const fn node(&self) -> u64 {
        self.clock_seq_and_node & 0xffff_ffff_ffff
    }

    /// Best-effort decode of the `8-4-4-4-12` form.
    ///
    /// Characters 0..18 feed the time field and 19..36 the clock sequence and
    /// node field, each through [`hex::parse_hex`], which skips anything that
    /// is not a hex digit. Nothing is validated: short or malformed input
    /// yields some well-formed but possibly meaningless value instead of an
    /// error. Use `str::parse` for a validating decode.
    pub fn parse_lenient(text: &str) -> Self {
        let bytes = text.as_bytes();
        let split = bytes.len().min(18);
        let time = &bytes[..split];
        let rest = &bytes[bytes.len().min(19)..bytes.len().min(36)];
        Self::from_fields(hex::parse_hex(time), hex::parse_hex(rest))
    }

    /// Writes the canonical `8-4-4-4-12` lowercase form to `out`.
    pub fn write_to<W: fmt::Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        hex::append(out, (self.time >> 32) as u32)?;
        out.write_char('-')?;
        hex::append(out, (self.time >> 16) as u16)?;
        out.write_char('-')?;
        hex::append(out, self.time as u16)?;
        out.write_char('-')?;
        hex::append(out, (self.clock_seq_and_node >> 48) as u16)?;
        out.write_char('-')?;
        hex::append_hex(out, self.clock_seq_and_node, 12)
    }
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Validating decode of the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: ParseError = ParseError {};
        let bytes = src.as_bytes();
        if bytes.len() != 36 {
            return Err(ERR);
        }
        for (i, &c) in bytes.iter().enumerate() {
            let ok = match i {
                8 | 13 | 18 | 23 => c == b'-',
                _ => c.is_ascii_hexdigit(),
            };
            if !ok {
                return Err(ERR);
            }
        }
        Ok(Self::parse_lenient(src))
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        (u128::from(src.time) << 64) | u128::from(src.clock_seq_and_node)
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self::from_fields((src >> 64) as u64, src as u64)
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Uuid;

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [((u64, u64), &'static str)] {
        &[
            ((0, 0), "00000000-0000-0000-0000-000000000000"),
            ((u64::MAX, u64::MAX), "ffffffff-ffff-ffff-ffff-ffffffffffff"),
            (
                (0xd1e2_f3a4_b5c6_1d7e, 0x8f90_0013_f0a1_b2c3),
                "d1e2f3a4-b5c6-1d7e-8f90-0013f0a1b2c3",
            ),
            (
                (0x70d9_b500_fa26_11dd, 0x8000_0000_0000_0001),
                "70d9b500-fa26-11dd-8000-000000000001",
            ),
        ]
    }

    #[test]
    fn encodes_and_decodes_prepared_cases() {
        for ((time, node), text) in prepare_cases() {
            let e = Uuid::from_fields(*time, *node);
            assert_eq!(&e.to_string(), text);
            assert_eq!(Uuid::parse_lenient(text), e);
            assert_eq!(text.parse::<Uuid>(), Ok(e));
            assert_eq!(text.to_uppercase().parse::<Uuid>(), Ok(e));
        }
    }

    #[test]
    fn orders_by_time_then_node_unsigned() {
        let low = Uuid::from_fields(1, u64::MAX);
        let high = Uuid::from_fields(0x8000_0000_0000_0000, 0);
        assert!(low < high);

        let a = Uuid::from_fields(5, 1);
        let b = Uuid::from_fields(5, 0x8000_0000_0000_0000);
        assert!(a < b);
        assert_eq!(a, Uuid::from_fields(5, 1));
        assert_ne!(a, b);
    }

    #[test]
    fn lenient_parse_accepts_malformed_input() {
        // too short: whatever digits exist end up in the time field
        assert_eq!(Uuid::parse_lenient("abc"), Uuid::from_fields(0xabc, 0));
        assert_eq!(Uuid::parse_lenient(""), Uuid::NIL);
        // noise is skipped rather than rejected
        assert_eq!(
            Uuid::parse_lenient("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz"),
            Uuid::NIL
        );
        // braces shift the fixed offsets, giving a different but valid value
        let braced = Uuid::parse_lenient("{d1e2f3a4-b5c6-1d7e-8f90-0013f0a1b2c3}");
        assert_eq!(braced.time(), 0x0d1e_2f3a_4b5c_61d7);
        assert_eq!(braced.clock_seq_and_node(), 0x08f9_0001_3f0a_1b2c);
        // multi-byte characters never split a slice
        let _ = Uuid::parse_lenient("ääääääääääääääääääääääääääää");
    }

    #[test]
    fn validating_parse_rejects_malformed_input() {
        let cases = [
            "",
            "d1e2f3a4-b5c6-1d7e-8f90-0013f0a1b2c",
            " d1e2f3a4-b5c6-1d7e-8f90-0013f0a1b2c3",
            "d1e2f3a4-b5c6-1d7e-8f90-0013f0a1b2c3 ",
            "{d1e2f3a4-b5c6-1d7e-8f90-0013f0a1b2c3}",
            "d1e2f3a4b5c61d7e8f900013f0a1b2c3",
            "d1e2f3a4-b5c61d7e-8f90-0013f0a1b2c3",
            "d1e2f3g4-b5c6-1d7e-8f90-0013f0a1b2c3",
            "d1e2f3a4-b5c6-1d7e-8f90_0013f0a1b2c3",
        ];
        for e in cases {
            assert!(e.parse::<Uuid>().is_err(), "{:?}", e);
        }
    }

    #[test]
    fn decomposes_generated_layout() {
        let e: Uuid = "70d9b500-fa26-11dd-b123-0013f0a1b2c3".parse().unwrap();
        assert_eq!(e.version(), 1);
        assert_eq!(e.ticks(), 0x01DD_FA26_70D9_B500);
        assert_eq!(
            e.timestamp().map(|t| t.timestamp_millis()),
            Some(1_234_567_890_000)
        );
        assert_eq!(e.clock_sequence(), 0x3123);
        assert_eq!(e.node(), 0x0013_f0a1_b2c3);
        assert_eq!(Uuid::NIL.timestamp(), None);
    }

    #[test]
    fn has_symmetric_converters() {
        for ((time, node), _) in prepare_cases() {
            let e = Uuid::from_fields(*time, *node);
            assert_eq!(Uuid::from(u128::from(e)), e);
            assert_eq!(Uuid::parse_lenient(&String::from(e)), e);
        }
        assert_eq!(Uuid::nil(), Uuid::default());
    }
}
