// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error::Error as StdError;
use thiserror::Error;

/// Convenience type alias for usage within the generator.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// The error type for this crate.
///
/// Only [`Builder::finalize`] reports errors; generating, formatting and
/// leniently parsing identifiers never fail.
///
/// [`Builder::finalize`]: crate::Builder::finalize
#[derive(Error, Debug)]
pub enum Error {
    #[error("node_id returned an error: {0}")]
    NodeIdFailed(#[source] BoxDynError),
    #[error("node id {0:#x} does not fit into 48 bits")]
    NodeIdOutOfRange(u64),
    #[error("check_node_id returned false")]
    CheckNodeIdFailed,
    #[error("clock sequence {0:#x} does not fit into 14 bits")]
    InvalidClockSequence(u16),
}

/// Error parsing an invalid string representation of a UUID.
///
/// Returned only by the validating parse (`str::parse::<Uuid>()`); the
/// best-effort [`Uuid::parse_lenient`](crate::Uuid::parse_lenient) never fails.
#[derive(Error, Clone, Eq, PartialEq, Hash, Debug)]
#[error("invalid string representation")]
pub struct ParseError {}
