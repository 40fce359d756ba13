// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 100-nanosecond ticks between 1582-10-15T00:00:00Z and the Unix epoch.
pub const EPOCH_OFFSET: u64 = 0x01B2_1DD2_1381_4000;
/// Ticks per millisecond.
pub(crate) const TICKS_PER_MILLI: u64 = 10_000;
/// Version nibble of time-based UUIDs, already in place.
pub(crate) const VERSION_1: u64 = 0x1000;

/// Issues strictly increasing UUID version 1 time fields.
///
/// Every value returned by one `Sequencer`, from any thread, is greater than
/// every value it returned before. When the clock stands still or moves
/// backwards the sequencer hands out `last + 1`, so issued ticks may run
/// ahead of the wall clock while callers outpace its millisecond resolution.
///
/// State is a single atomic updated by compare-and-swap. The retry loop has
/// no fixed bound; each lost race means another caller made progress.
#[derive(Debug, Default)]
pub struct Sequencer {
    last: AtomicU64,
}

impl Sequencer {
    /// Creates a sequencer that has issued nothing yet.
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Returns a new time field for the current wall clock.
    pub fn next_time(&self) -> u64 {
        self.time_at(Utc::now().timestamp_millis())
    }

    /// Returns a new time field for `unix_millis`.
    ///
    /// Identical inputs still produce distinct, increasing values.
    pub fn time_at(&self, unix_millis: i64) -> u64 {
        pack(self.next_tick(to_ticks(unix_millis)))
    }

    /// The most recently issued tick count, or 0 before the first call.
    pub fn last_tick(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }

    fn next_tick(&self, ticks: u64) -> u64 {
        let mut current = self.last.load(Ordering::Acquire);
        loop {
            let next = if ticks > current { ticks } else { current + 1 };
            match self
                .last
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }
}

/// Converts Unix milliseconds to 100-nanosecond ticks since the Gregorian epoch.
pub(crate) fn to_ticks(unix_millis: i64) -> u64 {
    (unix_millis as u64)
        .wrapping_mul(TICKS_PER_MILLI)
        .wrapping_add(EPOCH_OFFSET)
}

/// Lays a 60-bit tick count out as `time_low | time_mid | version | time_hi`.
pub(crate) fn pack(ticks: u64) -> u64 {
    (ticks << 32) | ((ticks & 0xFFFF_0000_0000) >> 16) | VERSION_1 | ((ticks >> 48) & 0x0FFF)
}

/// Inverse of [`pack`], dropping the version nibble.
pub(crate) fn unpack(time: u64) -> u64 {
    (time >> 32) | ((time & 0xFFFF_0000) << 16) | ((time & 0x0FFF) << 48)
}
