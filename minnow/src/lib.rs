//! The lower half of a user-space TCP/IP stack.
//!
//! ## Table of contents
//!
//! 1. [Design](#design)
//! 2. [The wire module](wire/index.html)
//!    1. [Ethernet, ARP and IPv4 representations](wire/index.html#an-overview-over-packet-representations)
//!    1. [Sequence numbers](wire/struct.SeqNumber.html)
//! 3. [The storage module](storage/index.html)
//!    1. [Byte streams](storage/struct.ByteStream.html)
//!    1. [Reassembly](storage/struct.Reassembler.html)
//! 4. [The layers](layer/index.html)
//!    1. [Neighbor resolution](layer/arp/index.html)
//!    1. [The network interface](layer/eth/index.html)
//!
//! ## Design
//!
//! Three pieces carry the algorithmic weight of a TCP/IP implementation and live here:
//!
//! * An Ethernet interface that resolves next hops with ARP, holds datagrams back until their
//!   link address is known and rate limits its own requests.
//! * The bijection between 64-bit absolute stream indices and 32-bit wire sequence numbers.
//! * A reassembler turning arbitrarily ordered, overlapping byte ranges into an ordered stream.
//!
//! Nothing in here performs I/O or blocks. Every component is a plain state machine that is
//! driven by its owner: frames and datagrams are handed in, outgoing frames are polled with
//! [`maybe_send`], time advances only through [`tick`]. Malformed or unusable input is never an
//! error to the caller, it is dropped (and logged with the `log` feature).
//!
//! [`maybe_send`]: layer/eth/struct.Interface.html#method.maybe_send
//! [`tick`]: layer/eth/struct.Interface.html#method.tick
#![warn(missing_docs)]
#![warn(unreachable_pub)]

// tests should be able to use `std`
#![cfg_attr(all(
    not(feature = "std"),
    not(test)),
no_std)]

#[macro_use] mod macros;
pub mod layer;
pub mod storage;
pub mod time;
pub mod wire;

/// The `alloc` crate, all collections are taken from here.
pub extern crate alloc;
