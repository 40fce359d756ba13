// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Finds hardware addresses in free-form network tool output.
//!
//! Two shapes are recognised anywhere in a line:
//!
//! - six groups of one or two hex digits joined by the same separator, `:`
//!   or `-` (`0:3:ba:1b:c4:74`, `00-1C-23-AD-D1-5A`);
//! - a run of exactly twelve hex digits with no separators
//!   (`001560045000`), as printed by `lanscan`.
//!
//! The match is returned verbatim, keeping its separators and letter case.

use crate::hex::{self, digit_value};

/// Candidate token tracked while walking a line.
#[derive(Debug, Default)]
struct Candidate {
    /// Start of each completed group, oldest first.
    starts: [usize; 5],
    /// Completed groups, each closed by a separator.
    groups: usize,
    /// Start of the group being read.
    group_start: usize,
    /// Hex digits in the group being read.
    digits: usize,
    separator: Option<u8>,
}

impl Candidate {
    fn reset(&mut self) {
        *self = Candidate::default();
    }

    fn digit(&mut self, i: usize) {
        if self.digits == 0 {
            self.group_start = i;
        }
        self.digits += 1;
    }

    /// Closes the current group with `sep`. Returns `false` when the group
    /// cannot be part of a grouped address.
    fn separator(&mut self, sep: u8) -> bool {
        if !(1..=2).contains(&self.digits) {
            return false;
        }
        if self.separator.map_or(false, |s| s != sep) {
            // another separator style begins with this group
            self.groups = 0;
        } else if self.groups == 5 {
            // a seventh group pushes the oldest one out
            self.starts.rotate_left(1);
            self.groups = 4;
        }
        self.starts[self.groups] = self.group_start;
        self.groups += 1;
        self.separator = Some(sep);
        self.digits = 0;
        true
    }

    /// The address ending before `end`, if the candidate forms one.
    fn address<'a>(&self, line: &'a str, end: usize) -> Option<&'a str> {
        if self.groups == 5 && (1..=2).contains(&self.digits) {
            Some(&line[self.starts[0]..end])
        } else if self.digits == 12 {
            Some(&line[self.group_start..end])
        } else {
            None
        }
    }
}

/// Returns the first hardware address found in `line`.
///
/// A line cut off inside the last group still yields the groups read so far
/// as long as all six groups have at least one digit, so `"… 0:3:ba:1b:c4:7"`
/// gives `"0:3:ba:1b:c4:7"`. When more than six groups are chained, the
/// last six form the address.
pub fn scan_line(line: &str) -> Option<&str> {
    let mut cand = Candidate::default();

    for (i, &c) in line.as_bytes().iter().enumerate() {
        if digit_value(c).is_some() {
            cand.digit(i);
            continue;
        }

        if c == b':' || c == b'-' {
            if cand.digits == 12 {
                return cand.address(line, i);
            }
            if cand.separator(c) {
                continue;
            }
        } else if let Some(found) = cand.address(line, i) {
            return Some(found);
        }
        cand.reset();
    }

    cand.address(line, line.len())
}

/// Returns the first hardware address found in any of `lines`.
pub fn scan_lines<'a, I>(lines: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().find_map(scan_line)
}

/// Converts an address found by [`scan_line`] into its six octets.
///
/// Grouped addresses are read group by group so one-digit groups keep their
/// position; the twelve-digit form is read as a single number.
pub fn to_octets(address: &str) -> Option<[u8; 6]> {
    let mut octets = [0u8; 6];
    if address.contains([':', '-']) {
        let mut groups = address.split([':', '-']);
        for octet in octets.iter_mut() {
            *octet = hex::parse_hex_short(groups.next()?) as u8;
        }
        if groups.next().is_some() {
            return None;
        }
    } else {
        if address.len() != 12 {
            return None;
        }
        let value = hex::parse_hex(address);
        octets.copy_from_slice(&value.to_be_bytes()[2..]);
    }
    Some(octets)
}
