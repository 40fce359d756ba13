// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::{BoxDynError, Error};
use crate::generator::Generator;
use crate::node::{
    self, random_clock_sequence, NodeIdentity, NodeSource, DEFAULT_SOURCES, MAX_CLOCK_SEQUENCE,
    NODE_MASK,
};
use log::debug;

/// A builder for building the [`Generator`].
///
/// [`Generator`]: struct.Generator.html
pub struct Builder<'a> {
    node_id: Option<&'a dyn Fn() -> Result<u64, BoxDynError>>,
    check_node_id: Option<&'a dyn Fn(u64) -> bool>,
    clock_sequence: Option<u16>,
    sources: &'a [NodeSource],
}

impl<'a> Default for Builder<'a> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<'a> Builder<'a> {
    /// Construct a new builder for the build of [`Generator`].
    ///
    /// [`Generator`]: struct.Generator.html
    pub fn new() -> Self {
        Self {
            node_id: None,
            check_node_id: None,
            clock_sequence: None,
            sources: DEFAULT_SOURCES,
        }
    }

    /// Set the node ID, skipping discovery.
    /// If the provided closure returns an error, or a value wider than 48
    /// bits, 'finalize' will fail.
    pub fn node_id(mut self, node_id: &'a dyn Fn() -> Result<u64, BoxDynError>) -> Self {
        self.node_id = Some(node_id);
        self
    }

    /// Set up a function to check the node ID.
    /// If the function returns 'false', 'finalize' will fail.
    pub fn check_node_id(mut self, check_node_id: &'a dyn Fn(u64) -> bool) -> Self {
        self.check_node_id = Some(check_node_id);
        self
    }

    /// Set a fixed clock sequence instead of a random one.
    /// Values above `0x3FFF` make 'finalize' fail.
    pub fn clock_sequence(mut self, clock_sequence: u16) -> Self {
        self.clock_sequence = Some(clock_sequence);
        self
    }

    /// Set the order in which node sources are tried.
    /// Discovery falls back to a random node when none of them succeeds.
    pub fn sources(mut self, sources: &'a [NodeSource]) -> Self {
        self.sources = sources;
        self
    }

    /// Finish building and create a Generator instance.
    /// This method will return an error if the node closure fails or if
    /// validation fails. Node discovery itself never fails.
    pub fn finalize(self) -> Result<Generator, Error> {
        let clock_sequence = match self.clock_sequence {
            Some(seq) if seq > MAX_CLOCK_SEQUENCE => {
                return Err(Error::InvalidClockSequence(seq));
            }
            Some(seq) => seq,
            None => random_clock_sequence(),
        };

        let identity = if let Some(node_id_fn) = self.node_id {
            let node_id = node_id_fn().map_err(Error::NodeIdFailed)?;
            if node_id > NODE_MASK {
                return Err(Error::NodeIdOutOfRange(node_id));
            }
            debug!("using provided node {:012x}", node_id);
            NodeIdentity::new(node_id, clock_sequence)
        } else {
            NodeIdentity::from_discovered(node::discover(self.sources), clock_sequence)
        };

        if let Some(check_node_id) = self.check_node_id {
            if !check_node_id(identity.node()) {
                return Err(Error::CheckNodeIdFailed);
            }
        }

        Ok(Generator::with_identity(identity))
    }
}
