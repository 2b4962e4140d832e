//! The protocol layers.
//!
//! Only the link layer lives here. An [`Interface`] sits between the IP layer above, which hands
//! it datagrams together with their next hop, and a driver below that moves Ethernet frames. The
//! [`arp`] module holds the two expiring stores it uses to resolve next hops.
//!
//! [`Interface`]: eth/struct.Interface.html
//! [`arp`]: arp/index.html
pub mod arp;
pub mod eth;
