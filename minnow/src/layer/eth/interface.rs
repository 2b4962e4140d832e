use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec::Vec;

use crate::layer::arp::{NeighborCache, RequestTimers};
use crate::time::{Duration, Instant};
use crate::wire::{
    arp_packet,
    ArpOperation,
    ArpRepr,
    Checksum,
    EthernetAddress,
    EthernetFrame,
    EthernetProtocol,
    EthernetRepr,
    InternetDatagram,
    Ipv4Address,
    Ipv4Packet,
};

use super::Config;

/// A network interface connecting an IPv4 host to an Ethernet link.
///
/// Outgoing datagrams are addressed to the hardware address of their next hop. When that is not
/// known yet the datagram is held back and an ARP request is broadcast, at most one per address
/// within the request timeout. Replies release all datagrams held for their sender, in the order
/// they were sent. Any ARP message teaches the interface the mapping of its sender.
///
/// The interface keeps its own clock, starting at zero and advanced only by [`tick`].
///
/// [`tick`]: #method.tick
#[derive(Clone, Debug)]
pub struct Interface {
    ethernet_addr: EthernetAddress,
    ip_addr: Ipv4Address,
    now: Instant,
    neighbors: NeighborCache,
    requests: RequestTimers,
    /// Datagrams waiting for their next hop to be resolved, per next hop.
    waiting: BTreeMap<Ipv4Address, VecDeque<InternetDatagram>>,
    frames_out: VecDeque<EthernetFrame<Vec<u8>>>,
}

impl Interface {
    /// Create an interface with the default timing configuration.
    pub fn new(ethernet_addr: EthernetAddress, ip_addr: Ipv4Address) -> Self {
        Interface::with_config(ethernet_addr, ip_addr, Config::default())
    }

    /// Create an interface with a custom timing configuration.
    pub fn with_config(ethernet_addr: EthernetAddress, ip_addr: Ipv4Address, config: Config) -> Self {
        net_debug!("eth: interface has Ethernet address {} and IP address {}", ethernet_addr, ip_addr);
        Interface {
            ethernet_addr,
            ip_addr,
            now: Instant::ZERO,
            neighbors: NeighborCache::with_lifetime(config.neighbor_lifetime),
            requests: RequestTimers::with_silent_time(config.request_timeout),
            waiting: BTreeMap::new(),
            frames_out: VecDeque::new(),
        }
    }

    /// Send a datagram towards its next hop.
    ///
    /// The datagram is framed right away if the hardware address of `next_hop` is cached.
    /// Otherwise it is queued until a reply arrives, and a request is broadcast unless one was
    /// already sent within the request timeout. Datagrams are never dropped.
    pub fn send_datagram(&mut self, datagram: InternetDatagram, next_hop: Ipv4Address) {
        if let Some(hardware_addr) = self.neighbors.lookup(next_hop) {
            let repr = EthernetRepr {
                src_addr: self.ethernet_addr,
                dst_addr: hardware_addr,
                ethertype: EthernetProtocol::Ipv4,
            };
            self.frames_out.push_back(EthernetFrame::new(repr, datagram.as_bytes()));
            return;
        }

        if !self.requests.is_requesting(next_hop) {
            net_debug!("eth: requesting address of {}", next_hop);
            self.send_arp(ArpOperation::Request, EthernetAddress::BROADCAST, next_hop);
            self.requests.requested(next_hop, self.now);
        }

        self.waiting
            .entry(next_hop)
            .or_default()
            .push_back(datagram);
    }

    /// Process a received frame.
    ///
    /// Returns the datagram carried by an IPv4 frame addressed to this interface. Frames for
    /// other hosts, unknown protocols and malformed payloads are dropped. ARP frames update the
    /// neighbor cache and are answered or release waiting datagrams as appropriate, but never
    /// yield a datagram.
    pub fn receive_frame<T: AsRef<[u8]>>(&mut self, frame: EthernetFrame<T>) -> Option<InternetDatagram> {
        let repr = frame.repr();
        if repr.dst_addr != self.ethernet_addr && !repr.dst_addr.is_broadcast() {
            net_trace!("eth: ignoring frame for {}", repr.dst_addr);
            return None;
        }

        match repr.ethertype {
            EthernetProtocol::Ipv4 => {
                match Ipv4Packet::new_checked(frame.payload_slice(), Checksum::Manual) {
                    Ok(packet) => Some(packet.to_datagram()),
                    Err(err) => {
                        net_debug!("eth: dropping malformed datagram from {}: {}", repr.src_addr, err);
                        None
                    },
                }
            },
            EthernetProtocol::Arp => {
                self.receive_arp(frame.payload_slice());
                None
            },
            other => {
                net_trace!("eth: ignoring frame of type {}", other);
                None
            },
        }
    }

    /// Advance the clock of the interface.
    ///
    /// Neighbor mappings and outstanding requests that reach their lifetime are forgotten. The
    /// step may be of any length, including zero.
    pub fn tick(&mut self, elapsed: Duration) {
        self.now += elapsed;

        let expired = self.neighbors.evict(self.now);
        let silenced = self.requests.evict(self.now);
        if expired + silenced > 0 {
            net_trace!("eth: at {} forgot {} neighbors and {} requests", self.now, expired, silenced);
        }
    }

    /// Take the oldest frame queued for transmission.
    pub fn maybe_send(&mut self) -> Option<EthernetFrame<Vec<u8>>> {
        self.frames_out.pop_front()
    }

    /// The hardware address of this interface.
    pub fn ethernet_address(&self) -> EthernetAddress {
        self.ethernet_addr
    }

    /// The protocol address of this interface.
    pub fn ip_address(&self) -> Ipv4Address {
        self.ip_addr
    }

    /// The current time of the interface clock.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// The cached hardware address of a neighbor.
    pub fn lookup(&self, ip_addr: Ipv4Address) -> Option<EthernetAddress> {
        self.neighbors.lookup(ip_addr)
    }

    /// Whether a request for the address was sent within the request timeout.
    pub fn is_requesting(&self, ip_addr: Ipv4Address) -> bool {
        self.requests.is_requesting(ip_addr)
    }

    /// The number of datagrams waiting for the address of `next_hop`.
    pub fn pending_datagrams(&self, next_hop: Ipv4Address) -> usize {
        self.waiting.get(&next_hop).map_or(0, VecDeque::len)
    }

    /// The number of frames waiting for transmission.
    pub fn frames_queued(&self) -> usize {
        self.frames_out.len()
    }

    fn receive_arp(&mut self, payload: &[u8]) {
        let repr = match arp_packet::new_checked(payload).and_then(ArpRepr::parse) {
            Ok(repr) => repr,
            Err(err) => {
                net_debug!("eth: dropping malformed arp message: {}", err);
                return;
            },
        };

        let ArpRepr::EthernetIpv4 {
            operation,
            source_hardware_addr,
            source_protocol_addr,
            target_protocol_addr,
            ..
        } = repr;

        if self.neighbors.fill(source_protocol_addr, source_hardware_addr, self.now).is_none() {
            net_debug!("eth: learned {} is at {}", source_protocol_addr, source_hardware_addr);
        }

        match operation {
            ArpOperation::Request => {
                if target_protocol_addr == self.ip_addr {
                    net_debug!("eth: answering request from {}", source_protocol_addr);
                    self.send_arp(ArpOperation::Reply, source_hardware_addr, source_protocol_addr);
                }
            },
            ArpOperation::Reply => {
                let queued = self.waiting.remove(&source_protocol_addr).unwrap_or_default();
                if !queued.is_empty() {
                    net_debug!("eth: sending {} datagrams to {}", queued.len(), source_protocol_addr);
                }
                for datagram in queued {
                    self.send_datagram(datagram, source_protocol_addr);
                }
            },
            ArpOperation::Unknown(_) => (),
        }
    }

    /// Queue an ARP message from this interface.
    ///
    /// Requests are broadcast and carry an unspecified target hardware address, replies go
    /// directly to the requester.
    fn send_arp(&mut self, operation: ArpOperation, target: EthernetAddress, target_protocol_addr: Ipv4Address) {
        let target_hardware_addr = match operation {
            ArpOperation::Reply => target,
            _ => EthernetAddress::UNSPECIFIED,
        };

        let arp = ArpRepr::EthernetIpv4 {
            operation,
            source_hardware_addr: self.ethernet_addr,
            source_protocol_addr: self.ip_addr,
            target_hardware_addr,
            target_protocol_addr,
        };

        let repr = EthernetRepr {
            src_addr: self.ethernet_addr,
            dst_addr: target,
            ethertype: EthernetProtocol::Arp,
        };

        self.frames_out.push_back(EthernetFrame::new(repr, &arp.to_bytes()));
    }
}
