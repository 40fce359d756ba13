// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Node identifier discovery.
//!
//! A node is a 48-bit value that should differ between machines, ideally the
//! hardware address of a network card. Discovery walks a list of
//! [`NodeSource`]s and takes the first one that produces a value; the
//! [`NodeSource::Random`] source always does.

use crate::{hex, mac};
use log::{debug, info, warn};
use rand::Rng;
use std::process::{Command, Stdio};

#[cfg(feature = "ip-fallback")]
use std::net::IpAddr;

/// Mask of the 48 node bits.
pub const NODE_MASK: u64 = 0xFFFF_FFFF_FFFF;
/// Largest 14-bit clock sequence.
pub const MAX_CLOCK_SEQUENCE: u16 = 0x3FFF;
/// The `10` variant, of which only the top bit is set.
const VARIANT: u64 = 0x8000_0000_0000_0000;

/// The default discovery order.
pub const DEFAULT_SOURCES: &[NodeSource] = &[
    NodeSource::Interfaces,
    NodeSource::CommandOutput,
    NodeSource::LocalAddress,
    NodeSource::Random,
];

/// Ways of obtaining a node identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeSource {
    /// Hardware address of the first suitable network interface.
    Interfaces,
    /// First hardware address printed by the platform's network tool.
    CommandOutput,
    /// The first IPv4 address of an up, non-loopback interface.
    LocalAddress,
    /// A pseudo-random 31-bit value.
    Random,
}

/// A node value and where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Discovered {
    /// The 48-bit node value.
    pub node: u64,
    /// Text of the hardware address, when one was found.
    pub mac_address: Option<String>,
    /// The source that produced `node`.
    pub source: NodeSource,
}

impl NodeSource {
    /// Tries this source once.
    pub fn discover(self) -> Option<Discovered> {
        debug!("trying node source {:?}", self);
        match self {
            NodeSource::Interfaces => from_interfaces(),
            NodeSource::CommandOutput => from_commands(),
            NodeSource::LocalAddress => from_local_address(),
            NodeSource::Random => Some(random()),
        }
    }
}

fn random() -> Discovered {
    Discovered {
        node: rand::thread_rng().gen_range(0..0x7FFF_FFFF),
        mac_address: None,
        source: NodeSource::Random,
    }
}

/// Returns the first node produced by `sources`, falling back to
/// [`NodeSource::Random`] when none of them succeeds.
pub fn discover(sources: &[NodeSource]) -> Discovered {
    let found = sources
        .iter()
        .find_map(|source| source.discover())
        .unwrap_or_else(random);
    info!(
        "node {:012x} from {:?} ({})",
        found.node,
        found.source,
        found.mac_address.as_deref().unwrap_or("no hardware address")
    );
    found
}

/// The process-lifetime clock sequence and node value.
///
/// Built once per [`Generator`](crate::Generator) and never recomputed, even
/// if the network configuration changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeIdentity {
    clock_seq_and_node: u64,
    mac_address: Option<String>,
    source: Option<NodeSource>,
}

impl NodeIdentity {
    /// Combines a node and a clock sequence, keeping the low 48 and 14 bits.
    pub fn new(node: u64, clock_sequence: u16) -> Self {
        Self {
            clock_seq_and_node: compose(node, clock_sequence),
            mac_address: None,
            source: None,
        }
    }

    /// Discovers a node from `sources` and pairs it with a random clock sequence.
    pub fn resolve(sources: &[NodeSource]) -> Self {
        Self::from_discovered(discover(sources), random_clock_sequence())
    }

    pub(crate) fn from_discovered(found: Discovered, clock_sequence: u16) -> Self {
        Self {
            clock_seq_and_node: compose(found.node, clock_sequence),
            mac_address: found.mac_address,
            source: Some(found.source),
        }
    }

    /// Variant bits, clock sequence (bits 48..62) and node (bits 0..48).
    pub fn clock_seq_and_node(&self) -> u64 {
        self.clock_seq_and_node
    }

    /// The 48-bit node.
    pub fn node(&self) -> u64 {
        self.clock_seq_and_node & NODE_MASK
    }

    /// The hardware address the node came from, if any.
    pub fn mac_address(&self) -> Option<&str> {
        self.mac_address.as_deref()
    }

    /// The source that produced the node, or `None` if the caller supplied it.
    pub fn source(&self) -> Option<NodeSource> {
        self.source
    }
}

fn compose(node: u64, clock_sequence: u16) -> u64 {
    VARIANT | (node & NODE_MASK) | (u64::from(clock_sequence & MAX_CLOCK_SEQUENCE) << 48)
}

pub(crate) fn random_clock_sequence() -> u16 {
    rand::thread_rng().gen_range(0..=MAX_CLOCK_SEQUENCE)
}

/// Rejects placeholder addresses: wrong length, all zeros, or a second
/// octet of `0xff` as some drivers report.
pub fn is_plausible(octets: &[u8]) -> bool {
    octets.len() == 6 && octets[1] != 0xff && octets.iter().any(|&b| b != 0)
}

fn octets_to_node(octets: &[u8; 6]) -> u64 {
    octets.iter().fold(0, |acc, &b| (acc << 8) | u64::from(b))
}

fn from_interfaces() -> Option<Discovered> {
    pnet_datalink::interfaces()
        .iter()
        .filter_map(|iface| iface.mac.map(|mac| (iface.name.as_str(), mac)))
        .find_map(|(name, pnet_datalink::MacAddr(a, b, c, d, e, f))| {
            let octets = [a, b, c, d, e, f];
            if !is_plausible(&octets) {
                debug!("skipping hardware address of {}", name);
                return None;
            }
            Some(Discovered {
                node: octets_to_node(&octets),
                mac_address: Some(hex::encode_bytes(&octets)),
                source: NodeSource::Interfaces,
            })
        })
}

/// Network tools whose output lists hardware addresses, tried in order.
#[cfg(windows)]
const COMMANDS: &[(&str, &[&str])] = &[("ipconfig", &["/all"])];
#[cfg(target_os = "linux")]
const COMMANDS: &[(&str, &[&str])] = &[
    ("ip", &["link"]),
    ("/sbin/ifconfig", &["-a"]),
    ("ifconfig", &["-a"]),
];
#[cfg(not(any(windows, target_os = "linux")))]
const COMMANDS: &[(&str, &[&str])] = &[
    ("/sbin/ifconfig", &["-a"]),
    ("ifconfig", &["-a"]),
    ("/usr/sbin/lanscan", &["-ai"]),
];

fn from_commands() -> Option<Discovered> {
    COMMANDS.iter().find_map(|(program, args)| {
        let output = match Command::new(program)
            .args(*args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(err) => {
                debug!("could not run {}: {}", program, err);
                return None;
            }
        };
        if !output.status.success() {
            warn!("{} exited with {}", program, output.status);
        }
        scan_output(&String::from_utf8_lossy(&output.stdout))
    })
}

/// Finds the first plausible hardware address in a tool's output.
pub fn scan_output(text: &str) -> Option<Discovered> {
    text.lines().filter_map(mac::scan_line).find_map(|found| {
        let octets = mac::to_octets(found)?;
        if !is_plausible(&octets) {
            debug!("skipping placeholder address {}", found);
            return None;
        }
        Some(Discovered {
            node: octets_to_node(&octets),
            mac_address: Some(found.to_owned()),
            source: NodeSource::CommandOutput,
        })
    })
}

#[cfg(feature = "ip-fallback")]
fn from_local_address() -> Option<Discovered> {
    pnet_datalink::interfaces()
        .iter()
        .filter(|iface| iface.is_up() && !iface.is_loopback())
        .flat_map(|iface| iface.ips.iter())
        .find_map(|network| match network.ip() {
            IpAddr::V4(ipv4) => Some(Discovered {
                node: u64::from(u32::from(ipv4)),
                mac_address: None,
                source: NodeSource::LocalAddress,
            }),
            _ => None,
        })
}

#[cfg(not(feature = "ip-fallback"))]
fn from_local_address() -> Option<Discovered> {
    debug!("local address source needs the `ip-fallback` feature");
    None
}
