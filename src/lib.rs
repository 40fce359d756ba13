//! Globally ordered, time-based (version 1) UUIDs.
//!
//! Each identifier is two 64-bit fields: a time field counting 100-nanosecond
//! ticks since 1582-10-15, and a clock-sequence-and-node field that stays the
//! same for the lifetime of a [`Generator`]. The node is taken from the
//! host's hardware address when one can be found, so no coordination between
//! machines is needed.
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! timeuuid_me = "0.1"
//! ```
//!
//! Use the library like this:
//!
//! ```
//! use timeuuid_me::Generator;
//!
//! let generator = Generator::new();
//! let uuid = generator.new_uuid();
//! println!("{}", uuid); // e.g. "d1e2f3a4-b5c6-11ef-8f90-0013f0a1b2c3"
//! assert_eq!(uuid.version(), 1);
//! ```
//!
//! ## Concurrent use
//!
//! Generator is thread-safe. `clone` it before moving to another thread; all
//! clones share one sequencer, so their identifiers never collide:
//! ```
//! use timeuuid_me::Generator;
//! use std::thread;
//!
//! let generator = Generator::new();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_generator = generator.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_generator.new_uuid());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! ## Text form
//!
//! `Display` writes the lowercase `8-4-4-4-12` form. `str::parse` validates
//! it strictly, while [`Uuid::parse_lenient`] decodes whatever hex digits it
//! finds at the fixed offsets and never fails:
//!
//! ```
//! use timeuuid_me::Uuid;
//!
//! let text = "d1e2f3a4-b5c6-1d7e-8f90-0013f0a1b2c3";
//! let uuid: Uuid = text.parse().unwrap();
//! assert_eq!(uuid.to_string(), text);
//! assert_eq!(Uuid::parse_lenient(text), uuid);
//! assert!("not a uuid".parse::<Uuid>().is_err());
//! ```

mod builder;
mod error;
mod generator;
pub mod hex;
pub mod mac;
pub mod node;
mod sequencer;
mod uuid;

pub use crate::generator::*;
pub use builder::*;
pub use error::*;
pub use node::{NodeIdentity, NodeSource};
pub use sequencer::{Sequencer, EPOCH_OFFSET};
pub use uuid::Uuid;
