// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::builder::Builder;
use crate::node::{NodeIdentity, DEFAULT_SOURCES};
use crate::sequencer::Sequencer;
use crate::uuid::Uuid;
use std::sync::Arc;

/// SharedGenerator is shared between Generator instances.
/// This struct is not exposed to the public.
#[derive(Debug)]
pub(crate) struct SharedGenerator {
    pub(crate) sequencer: Sequencer,
    pub(crate) identity: NodeIdentity,
}

/// Generator issues time-based UUIDs.
///
/// It owns one time sequencer and one node identity, both fixed for its
/// lifetime. It is thread-safe and can be cloned to be used in multiple
/// threads; clones share the same state, so identifiers from all of them
/// are strictly ordered by time.
#[derive(Debug)]
pub struct Generator(pub(crate) Arc<SharedGenerator>);

impl Generator {
    /// Create a new Generator with the default configuration.
    ///
    /// The node is discovered from the default sources and falls back to a
    /// random value, so this cannot fail. For custom configuration see
    /// [`builder`].
    ///
    /// [`builder`]: struct.Generator.html#method.builder
    pub fn new() -> Self {
        Self::with_identity(NodeIdentity::resolve(DEFAULT_SOURCES))
    }

    /// Create a new [`Builder`] to construct a Generator.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder<'a>() -> Builder<'a> {
        Builder::new()
    }

    /// Create a Generator around an already resolved node identity.
    pub fn with_identity(identity: NodeIdentity) -> Self {
        Self::new_inner(Arc::new(SharedGenerator {
            sequencer: Sequencer::new(),
            identity,
        }))
    }

    pub(crate) fn new_inner(shared: Arc<SharedGenerator>) -> Self {
        Self(shared)
    }

    /// Generate the next UUID.
    ///
    /// Its time field is greater than that of every UUID this generator (or
    /// any of its clones) returned before. Never fails and never blocks.
    pub fn new_uuid(&self) -> Uuid {
        Uuid::from_fields(self.next_time(), self.clock_seq_and_node())
    }

    /// Generate the next time field on its own.
    pub fn next_time(&self) -> u64 {
        self.0.sequencer.next_time()
    }

    /// The clock sequence and node field shared by every UUID of this generator.
    pub fn clock_seq_and_node(&self) -> u64 {
        self.0.identity.clock_seq_and_node()
    }

    /// The hardware address the node was derived from. Not guaranteed to
    /// return anything.
    pub fn mac_address(&self) -> Option<&str> {
        self.0.identity.mac_address()
    }

    /// The resolved node identity.
    pub fn identity(&self) -> &NodeIdentity {
        &self.0.identity
    }
}

impl Default for Generator {
    fn default() -> Self {
        Generator::new()
    }
}

/// Returns a new `Generator` referencing the same state as `self`.
/// This is used for concurrent use.
impl Clone for Generator {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
