use core::{fmt, ops::Range};
use alloc::vec::Vec;
use byteorder::{ByteOrder, NetworkEndian};

use super::{Error, Result};
use super::{EthernetAddress, EthernetProtocol, Ipv4Address};

enum_with_unknown! {
    /// The kind of link a message resolves addresses for.
    pub enum Hardware(u16) {
        Ethernet = 1
    }
}

enum_with_unknown! {
    /// Whether a message asks or answers.
    pub enum Operation(u16) {
        Request = 1,
        Reply = 2
    }
}

byte_wrapper! {
    /// A byte slice viewed as an ARP message.
    #[derive(Debug, PartialEq, Eq)]
    pub struct arp([u8]);
}

mod field {
    use crate::wire::field::Field;

    pub(crate) const HTYPE: Field = 0..2;
    pub(crate) const PTYPE: Field = 2..4;
    pub(crate) const HLEN:  usize = 4;
    pub(crate) const PLEN:  usize = 5;
    pub(crate) const OPER:  Field = 6..8;
}

/// The four addresses following the fixed header, in wire order.
#[derive(Clone, Copy)]
enum Slot {
    SenderHardware,
    SenderProtocol,
    TargetHardware,
    TargetProtocol,
}

impl arp {
    pub fn new_unchecked(buffer: &[u8]) -> &arp {
        Self::__from_macro_new_unchecked(buffer)
    }

    pub fn new_unchecked_mut(buffer: &mut [u8]) -> &mut arp {
        Self::__from_macro_new_unchecked_mut(buffer)
    }

    /// View a buffer as a message if it holds the header and all four addresses.
    pub fn new_checked(data: &[u8]) -> Result<&arp> {
        let packet = Self::new_unchecked(data);
        packet.check_len()?;
        Ok(packet)
    }

    /// Check the buffer against the address lengths the message announces.
    pub fn check_len(&self) -> Result<()> {
        if self.0.len() < field::OPER.end || self.0.len() < self.message_len() {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    pub fn hardware_type(&self) -> Hardware {
        Hardware::from(NetworkEndian::read_u16(&self.0[field::HTYPE]))
    }

    pub fn protocol_type(&self) -> EthernetProtocol {
        EthernetProtocol::from(NetworkEndian::read_u16(&self.0[field::PTYPE]))
    }

    pub fn hardware_len(&self) -> u8 {
        self.0[field::HLEN]
    }

    pub fn protocol_len(&self) -> u8 {
        self.0[field::PLEN]
    }

    pub fn operation(&self) -> Operation {
        Operation::from(NetworkEndian::read_u16(&self.0[field::OPER]))
    }

    fn message_len(&self) -> usize {
        self.slot(Slot::TargetProtocol).end
    }

    fn slot(&self, slot: Slot) -> Range<usize> {
        let hlen = usize::from(self.hardware_len());
        let plen = usize::from(self.protocol_len());
        let start = field::OPER.end + match slot {
            Slot::SenderHardware => 0,
            Slot::SenderProtocol => hlen,
            Slot::TargetHardware => hlen + plen,
            Slot::TargetProtocol => 2*hlen + plen,
        };
        let len = match slot {
            Slot::SenderHardware | Slot::TargetHardware => hlen,
            Slot::SenderProtocol | Slot::TargetProtocol => plen,
        };
        start..start + len
    }

    fn address(&self, slot: Slot) -> &[u8] {
        &self.0[self.slot(slot)]
    }
}

/// An ARP message mapping IPv4 to Ethernet addresses.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Repr {
    EthernetIpv4 {
        operation: Operation,
        source_hardware_addr: EthernetAddress,
        source_protocol_addr: Ipv4Address,
        target_hardware_addr: EthernetAddress,
        target_protocol_addr: Ipv4Address,
    },
}

impl Repr {
    /// Parse a request or reply between Ethernet and IPv4 addresses.
    ///
    /// Any other hardware, protocol, address length or operation is `Unrecognized`.
    pub fn parse(packet: &arp) -> Result<Repr> {
        packet.check_len()?;
        let ethernet_ipv4 = packet.hardware_type() == Hardware::Ethernet
            && packet.protocol_type() == EthernetProtocol::Ipv4
            && packet.hardware_len() == 6
            && packet.protocol_len() == 4;
        let operation = packet.operation();
        if !ethernet_ipv4 || !matches!(operation, Operation::Request | Operation::Reply) {
            return Err(Error::Unrecognized);
        }

        Ok(Repr::EthernetIpv4 {
            operation,
            source_hardware_addr: EthernetAddress::from_bytes(packet.address(Slot::SenderHardware)),
            source_protocol_addr: Ipv4Address::from_bytes(packet.address(Slot::SenderProtocol)),
            target_hardware_addr: EthernetAddress::from_bytes(packet.address(Slot::TargetHardware)),
            target_protocol_addr: Ipv4Address::from_bytes(packet.address(Slot::TargetProtocol)),
        })
    }

    pub fn buffer_len(&self) -> usize {
        match self {
            Repr::EthernetIpv4 { .. } => field::OPER.end + 2*6 + 2*4,
        }
    }

    /// Write the message, `packet` must hold at least `buffer_len` octets.
    pub fn emit(&self, packet: &mut arp) {
        let Repr::EthernetIpv4 {
            operation,
            source_hardware_addr,
            source_protocol_addr,
            target_hardware_addr,
            target_protocol_addr,
        } = *self;

        NetworkEndian::write_u16(&mut packet.0[field::HTYPE], Hardware::Ethernet.into());
        NetworkEndian::write_u16(&mut packet.0[field::PTYPE], EthernetProtocol::Ipv4.into());
        packet.0[field::HLEN] = 6;
        packet.0[field::PLEN] = 4;
        NetworkEndian::write_u16(&mut packet.0[field::OPER], operation.into());

        let addresses = [
            (Slot::SenderHardware, source_hardware_addr.as_bytes()),
            (Slot::SenderProtocol, source_protocol_addr.as_bytes()),
            (Slot::TargetHardware, target_hardware_addr.as_bytes()),
            (Slot::TargetProtocol, target_protocol_addr.as_bytes()),
        ];
        for (slot, bytes) in addresses.iter() {
            let range = packet.slot(*slot);
            packet.0[range].copy_from_slice(bytes);
        }
    }

    /// The message as the payload of an Ethernet frame.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = alloc::vec![0; self.buffer_len()];
        self.emit(arp::new_unchecked_mut(&mut buffer));
        buffer
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Repr::EthernetIpv4 {
            operation,
            source_hardware_addr,
            source_protocol_addr,
            target_hardware_addr,
            target_protocol_addr,
        } = self;

        match operation {
            Operation::Request => write!(f, "ARP who has {}? tell {} at {}",
                target_protocol_addr, source_protocol_addr, source_hardware_addr),
            Operation::Reply => write!(f, "ARP {} is at {} (to {} at {})",
                source_protocol_addr, source_hardware_addr, target_protocol_addr, target_hardware_addr),
            Operation::Unknown(op) => write!(f, "ARP operation {} from {}", op, source_protocol_addr),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const HOST_MAC: EthernetAddress = EthernetAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
    const HOST_IP: Ipv4Address = Ipv4Address::new(10, 0, 0, 1);
    const PEER_IP: Ipv4Address = Ipv4Address::new(10, 0, 0, 2);

    /// 02:00:00:00:00:01 at 10.0.0.1 asking for 10.0.0.2.
    #[rustfmt::skip]
    static WHO_HAS: [u8; 28] = [
        0x00, 0x01, 0x08, 0x00,
        0x06, 0x04, 0x00, 0x01,
        0x02, 0x00, 0x00, 0x00, 0x00, 0x01,
        0x0a, 0x00, 0x00, 0x01,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x0a, 0x00, 0x00, 0x02,
    ];

    fn who_has(operation: Operation) -> Repr {
        Repr::EthernetIpv4 {
            operation,
            source_hardware_addr: HOST_MAC,
            source_protocol_addr: HOST_IP,
            target_hardware_addr: EthernetAddress::UNSPECIFIED,
            target_protocol_addr: PEER_IP,
        }
    }

    #[test]
    fn parse_request() {
        let packet = arp::new_checked(&WHO_HAS[..]).unwrap();
        assert_eq!(packet.hardware_type(), Hardware::Ethernet);
        assert_eq!(packet.protocol_type(), EthernetProtocol::Ipv4);
        assert_eq!(Repr::parse(packet), Ok(who_has(Operation::Request)));
        assert_eq!(
            format!("{}", who_has(Operation::Request)),
            "ARP who has 10.0.0.2? tell 10.0.0.1 at 02:00:00:00:00:01");
    }

    #[test]
    fn parse_reply() {
        let mut bytes = WHO_HAS;
        bytes[7] = 2;
        let repr = Repr::parse(arp::new_unchecked(&bytes[..]));
        assert_eq!(repr, Ok(who_has(Operation::Reply)));
    }

    #[test]
    fn unrecognized() {
        let mut op = WHO_HAS;
        op[7] = 3;
        assert_eq!(Repr::parse(arp::new_unchecked(&op[..])), Err(Error::Unrecognized));

        let mut hardware = WHO_HAS;
        hardware[1] = 6;
        assert_eq!(Repr::parse(arp::new_unchecked(&hardware[..])), Err(Error::Unrecognized));

        // IPv6-sized protocol addresses, with enough bytes to hold them.
        let mut long = WHO_HAS.to_vec();
        long[5] = 16;
        long.resize(8 + 2*6 + 2*16, 0);
        assert_eq!(Repr::parse(arp::new_unchecked(&long)), Err(Error::Unrecognized));
    }

    #[test]
    fn truncated() {
        let mut long = WHO_HAS;
        long[5] = 16;
        assert_eq!(arp::new_checked(&long[..]).unwrap_err(), Error::Truncated);

        assert_eq!(Repr::parse(arp::new_unchecked(&WHO_HAS[..27])), Err(Error::Truncated));
        assert_eq!(Repr::parse(arp::new_unchecked(&WHO_HAS[..7])), Err(Error::Truncated));
    }

    #[test]
    fn emit() {
        let repr = who_has(Operation::Request);
        assert_eq!(repr.buffer_len(), WHO_HAS.len());
        assert_eq!(repr.to_bytes(), &WHO_HAS[..]);
    }
}
