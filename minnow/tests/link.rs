//! A byte stream carried over a simulated link between two interfaces.
//!
//! Every datagram carries a wire sequence number, a flag byte and a slice of the stream. The
//! receiving side maps the sequence number back into the stream and reassembles.
use byteorder::{ByteOrder, NetworkEndian};

use minnow::layer::eth::Interface;
use minnow::storage::{ByteStream, Reassembler};
use minnow::time::Duration;
use minnow::wire::{
    EthernetAddress,
    InternetDatagram,
    IpProtocol,
    Ipv4Address,
    Ipv4Packet,
    Ipv4Repr,
    SeqNumber,
};

const MAC_ADDR_SENDER: EthernetAddress = EthernetAddress([2, 0, 0, 0, 0, 1]);
const IP_ADDR_SENDER: Ipv4Address = Ipv4Address::new(10, 0, 0, 1);
const MAC_ADDR_RECEIVER: EthernetAddress = EthernetAddress([2, 0, 0, 0, 0, 2]);
const IP_ADDR_RECEIVER: Ipv4Address = Ipv4Address::new(10, 0, 0, 2);

/// Close enough to the end of sequence space that the stream wraps.
const ZERO_POINT: SeqNumber = SeqNumber(0xffff_ffe0);

const FIN: u8 = 1;

fn segment(index: u64, data: &[u8], last: bool) -> InternetDatagram {
    let mut payload = vec![0; 5 + data.len()];
    NetworkEndian::write_u32(&mut payload[..4], SeqNumber::wrap(index, ZERO_POINT).0);
    payload[4] = if last { FIN } else { 0 };
    payload[5..].copy_from_slice(data);

    Ipv4Packet::new(Ipv4Repr {
        src_addr: IP_ADDR_SENDER,
        dst_addr: IP_ADDR_RECEIVER,
        protocol: IpProtocol::Tcp,
        payload_len: payload.len(),
        hop_limit: 64,
    }, &payload)
}

/// Shuffle frames between both interfaces until the link is quiet.
fn exchange(sender: &mut Interface, receiver: &mut Interface) -> Vec<InternetDatagram> {
    let mut received = Vec::new();
    loop {
        let mut idle = true;
        while let Some(frame) = sender.maybe_send() {
            idle = false;
            received.extend(receiver.receive_frame(frame));
        }
        while let Some(frame) = receiver.maybe_send() {
            idle = false;
            assert_eq!(sender.receive_frame(frame), None);
        }
        if idle {
            return received;
        }
    }
}

fn reassemble(datagrams: &[InternetDatagram], asm: &mut Reassembler, output: &mut ByteStream) {
    for datagram in datagrams {
        let payload = datagram.payload_slice();
        let seq = SeqNumber(NetworkEndian::read_u32(&payload[..4]));
        let index = seq.unwrap(ZERO_POINT, asm.next_index());
        asm.insert(index, &payload[5..], payload[4] & FIN != 0, output);
    }
}

fn link() -> (Interface, Interface) {
    (Interface::new(MAC_ADDR_SENDER, IP_ADDR_SENDER),
     Interface::new(MAC_ADDR_RECEIVER, IP_ADDR_RECEIVER))
}

#[test]
fn stream_across_link() {
    let (mut sender, mut receiver) = link();
    let stream: Vec<u8> = (0..100u8).collect();

    // Out of order, with one duplicate and one overlapping resend.
    let order = [(40, 60), (0, 20), (80, 100), (20, 40), (40, 60), (10, 50), (60, 80)];
    for &(start, end) in order.iter() {
        let data = &stream[start..end];
        sender.send_datagram(segment(start as u64, data, end == stream.len()), IP_ADDR_RECEIVER);
    }

    // All of them wait behind a single request.
    assert_eq!(sender.frames_queued(), 1);
    assert_eq!(sender.pending_datagrams(IP_ADDR_RECEIVER), order.len());

    let datagrams = exchange(&mut sender, &mut receiver);
    assert_eq!(datagrams.len(), order.len());
    assert_eq!(receiver.lookup(IP_ADDR_SENDER), Some(MAC_ADDR_SENDER));

    let mut asm = Reassembler::new();
    let mut output = ByteStream::new(256);
    reassemble(&datagrams, &mut asm, &mut output);

    assert_eq!(output.read(256), stream);
    assert!(output.is_finished());
    assert!(asm.is_empty());
    assert_eq!(asm.next_index(), 100);
}

#[test]
fn lost_request_is_repeated() {
    let (mut sender, mut receiver) = link();
    let mut asm = Reassembler::new();
    let mut output = ByteStream::new(64);

    sender.send_datagram(segment(0, b"hello ", false), IP_ADDR_RECEIVER);
    // The request never makes it onto the link.
    assert!(sender.maybe_send().is_some());

    sender.tick(Duration::from_millis(2_000));
    sender.send_datagram(segment(6, b"world", true), IP_ADDR_RECEIVER);
    assert!(exchange(&mut sender, &mut receiver).is_empty());

    sender.tick(Duration::from_millis(3_000));
    sender.send_datagram(segment(6, b"world", true), IP_ADDR_RECEIVER);
    let datagrams = exchange(&mut sender, &mut receiver);
    assert_eq!(datagrams.len(), 3);

    reassemble(&datagrams, &mut asm, &mut output);
    assert_eq!(output.read(64), b"hello world");
    assert!(output.is_finished());
}

#[test]
fn receiver_answers_with_learned_address() {
    let (mut sender, mut receiver) = link();

    sender.send_datagram(segment(0, b"ping", false), IP_ADDR_RECEIVER);
    let datagrams = exchange(&mut sender, &mut receiver);
    assert_eq!(datagrams.len(), 1);

    // The request taught the receiver where the sender is, no request needed in return.
    let reply = segment(0, b"pong", false);
    receiver.send_datagram(reply.clone(), IP_ADDR_SENDER);
    let frame = receiver.maybe_send().expect("a datagram frame");
    assert_eq!(frame.repr().dst_addr, MAC_ADDR_SENDER);
    assert_eq!(sender.receive_frame(frame), Some(reply));
}
