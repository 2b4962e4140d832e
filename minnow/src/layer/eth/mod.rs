//! The ethernet layer.
//!
//! This is tasked with putting IPv4 datagrams into Ethernet framing, resolving the hardware
//! address of their next hop with ARP, and unwrapping datagrams from received frames. All of it
//! happens in an [`Interface`] which owns the state of one network card.
//!
//! An interface never performs I/O by itself. Its owner runs a loop of the following shape:
//!
//! ```
//! use minnow::layer::eth::Interface;
//! use minnow::time::Duration;
//! use minnow::wire::{EthernetAddress, EthernetFrame, Ipv4Address};
//!
//! let mut interface = Interface::new(
//!     EthernetAddress([2, 0, 0, 0, 0, 1]),
//!     Ipv4Address::new(10, 0, 0, 1));
//! # let received: Vec<EthernetFrame<Vec<u8>>> = Vec::new();
//!
//! for frame in received {
//!     if let Some(datagram) = interface.receive_frame(frame) {
//!         // Hand to the IP layer.
//! #       drop(datagram);
//!     }
//! }
//!
//! interface.tick(Duration::from_millis(10));
//!
//! while let Some(frame) = interface.maybe_send() {
//!     // Transmit `frame.as_bytes()` on the link.
//! #   drop(frame);
//! }
//! ```
//!
//! [`Interface`]: struct.Interface.html
use crate::layer::arp::{NeighborCache, RequestTimers};
use crate::time::Duration;

mod interface;

pub use interface::Interface;

/// Timing configuration of an [`Interface`].
///
/// [`Interface`]: struct.Interface.html
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    /// How long a learned neighbor mapping is trusted.
    pub neighbor_lifetime: Duration,

    /// How long to wait for a reply before requesting the same address again.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            neighbor_lifetime: NeighborCache::ENTRY_LIFETIME,
            request_timeout: RequestTimers::SILENT_TIME,
        }
    }
}
