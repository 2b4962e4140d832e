//! Two interfaces talking over a simulated Ethernet link.
//!
//! # Usage
//!
//! The example creates two hosts on the same link and lets the first one send a number of
//! datagrams to the second. Neither knows the hardware address of the other at the start, so the
//! first datagram triggers an ARP request and all datagrams are held back until the reply arrives.
//! Optionally, the first few ARP requests are lost on the link. The sender then has to wait for
//! the request timeout before asking again.
//!
//!   > $ cargo run --example arp_link -- 10.0.0.1 02:00:00:00:00:01 10.0.0.2 02:00:00:00:00:02 --count 8 --lose 1
use std::collections::VecDeque;
use std::io::{stdout, Write};
use structopt::StructOpt;

use minnow::layer::eth::Interface;
use minnow::time::Duration;
use minnow::wire::{
    EthernetAddress,
    EthernetProtocol,
    IpProtocol,
    Ipv4Address,
    Ipv4Packet,
    Ipv4Repr,
};

fn main() {
    let Config {
        host,
        hostmac,
        peer,
        peermac,
        count,
        interval,
        lose,
        rounds,
    } = Config::from_args();

    let mut sender = Interface::new(hostmac, host);
    let mut receiver = Interface::new(peermac, peer);
    let interval = Duration::from_millis(interval);

    let mut to_receiver = VecDeque::new();
    let mut to_sender = VecDeque::new();
    let mut lost = 0;
    let mut sent = 0;
    let mut delivered = 0;

    let out = stdout();
    let mut out = out.lock();

    for round in 0..rounds {
        if sent < count {
            let payload = format!("datagram {}", sent);
            let datagram = Ipv4Packet::new(Ipv4Repr {
                src_addr: host,
                dst_addr: peer,
                protocol: IpProtocol::Udp,
                payload_len: payload.len(),
                hop_limit: 64,
            }, payload.as_bytes());
            sender.send_datagram(datagram, peer);
            sent += 1;
        }

        while let Some(frame) = sender.maybe_send() {
            if frame.repr().ethertype == EthernetProtocol::Arp && lost < lose {
                writeln!(out, "[{}] lost {}", sender.now(), frame).unwrap();
                lost += 1;
                continue;
            }
            to_receiver.push_back(frame);
        }

        for frame in to_receiver.drain(..) {
            writeln!(out, "[{}] {} -> {}", receiver.now(), frame.repr().src_addr, frame).unwrap();
            if let Some(datagram) = receiver.receive_frame(frame) {
                writeln!(out, "[{}] received {}: {:?}",
                    receiver.now(),
                    datagram,
                    String::from_utf8_lossy(datagram.payload_slice())).unwrap();
                delivered += 1;
            }
        }

        while let Some(frame) = receiver.maybe_send() {
            to_sender.push_back(frame);
        }

        for frame in to_sender.drain(..) {
            writeln!(out, "[{}] {} -> {}", sender.now(), frame.repr().src_addr, frame).unwrap();
            sender.receive_frame(frame);
        }

        if delivered == count {
            writeln!(out, "All {} datagrams delivered after {} rounds", count, round + 1).unwrap();
            return;
        }

        sender.tick(interval);
        receiver.tick(interval);
    }

    writeln!(out, "Delivered {} of {} datagrams, {} still waiting",
        delivered, count, sender.pending_datagrams(peer)).unwrap();
}

#[derive(StructOpt)]
struct Config {
    host: Ipv4Address,
    hostmac: EthernetAddress,
    peer: Ipv4Address,
    peermac: EthernetAddress,
    /// Number of datagrams to send, one per round.
    #[structopt(long, default_value = "3")]
    count: usize,
    /// Simulated milliseconds between rounds.
    #[structopt(long, default_value = "1000")]
    interval: u64,
    /// Number of ARP messages from the host that are lost.
    #[structopt(long, default_value = "0")]
    lose: usize,
    /// Give up after this many rounds.
    #[structopt(long, default_value = "60")]
    rounds: usize,
}
