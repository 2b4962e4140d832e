/*! Low-level packet access and construction.

# An overview over packet representations

The `wire` module deals with the packet *representation* of everything that crosses the boundary
of the core: Ethernet frames, ARP messages, IPv4 datagrams and TCP sequence numbers. It provides
three levels of functionality.

 * First, it provides functions to extract fields from sequences of octets, and to insert fields
   into sequences of octets. This happens in the lowercase structures e.g. [`ethernet_frame`] or
   [`arp_packet`].
 * Second, it provides a compact, high-level representation of header data that can be created
   from parsing and emitted into a sequence of octets. This happens through the `Repr` family of
   structs and enums, e.g. [`ArpRepr`] or [`Ipv4Repr`].
 * Third, it provides a type wrapper around sequences of octets valid as a particular packet
   format which potentially owns its data, e.g. [`EthernetFrame`] and [`Ipv4Packet`]. The owned
   `Vec<u8>` instantiations are what the [`Interface`] queues and hands out.

[`ethernet_frame`]: struct.ethernet_frame.html
[`arp_packet`]: struct.arp_packet.html
[`ArpRepr`]: enum.ArpRepr.html
[`Ipv4Repr`]: struct.Ipv4Repr.html
[`EthernetFrame`]: struct.EthernetFrame.html
[`Ipv4Packet`]: struct.Ipv4Packet.html
[`Interface`]: ../layer/eth/struct.Interface.html

The lowercase family guarantees that, if `check_len()` returned `Ok(())`, then no field accessor
will panic. In the `Repr` family of data structures, the `Repr::parse()` method never panics and
the `Repr::emit()` method never panics as long as the underlying buffer is at least
`Repr::buffer_len()` octets long.

# Examples

To emit an IP datagram into an owned buffer, and then parse it back:

```rust
use minnow::wire::*;
let repr = Ipv4Repr {
    src_addr:    Ipv4Address::new(10, 0, 0, 1),
    dst_addr:    Ipv4Address::new(10, 0, 0, 2),
    protocol:    IpProtocol::Tcp,
    payload_len: 4,
    hop_limit:   64
};
let datagram = Ipv4Packet::new(repr, b"data");
let parsed = Ipv4Packet::new_checked(datagram.into_inner(), Checksum::Manual)
    .expect("malformed packet");
assert_eq!(parsed.repr(), repr);
assert_eq!(parsed.payload_slice(), b"data");
```
*/
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
//
// Applies to files in this folder unless otherwise noted. These are:
// * `arp.rs`
// * `error.rs`
// * `ethernet.rs`
// * `ip.rs`
// * `ipv4.rs`
// * `mod.rs` (this file)

// FIXME: Most fields should be self-explanatory and there is the general guide but enable once the
// other issues have been resolved.
#![allow(missing_docs)]

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
    pub(crate) type Rest  = ::core::ops::RangeFrom<usize>;
}

mod ethernet;
mod error;
pub(crate) mod arp;
pub(crate) mod ip;
mod ipv4;
mod seq;

/// Describes how to handle checksums.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Checksum {
    /// Checksum must be computed or checked manually.
    Manual,

    /// The checksum field is filled or checked by the NIC.
    Ignored,
}

pub use self::ethernet::{
    ethernet as ethernet_frame,
    EtherType as EthernetProtocol,
    Address as EthernetAddress,
    Frame as EthernetFrame,
    ParseAddressError as ParseEthernetAddressError,
    Repr as EthernetRepr};

pub use self::error::{
    Error,
    Result};

pub use self::arp::{
    arp as arp_packet,
    Hardware as ArpHardware,
    Operation as ArpOperation,
    Repr as ArpRepr};

pub use self::ip::Protocol as IpProtocol;

pub use self::ipv4::{
    ipv4 as ipv4_packet,
    Address as Ipv4Address,
    Packet as Ipv4Packet,
    ParseAddressError as ParseIpv4AddressError,
    Repr as Ipv4Repr,
    InternetDatagram};

pub use self::seq::SeqNumber;

/// Alias for the sequence number used by tcp.
pub type TcpSeqNumber = SeqNumber;

impl Checksum {
    /// Check if a checksum should be calculated by the library.
    ///
    /// Otherwise it is ignored due to the assumption that it was offloaded or is otherwise
    /// undesirable to check.
    pub fn manual(self) -> bool {
        match self {
            Checksum::Manual => true,
            Checksum::Ignored => false,
        }
    }
}
