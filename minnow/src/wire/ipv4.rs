use core::{fmt, ops, str::FromStr};
use alloc::vec::Vec;
use byteorder::{ByteOrder, NetworkEndian};

use super::{Checksum, Error, Result};
use super::ip::checksum;

pub(crate) use super::IpProtocol as Protocol;

/// A four-octet IPv4 address.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Address(pub [u8; 4]);

impl Address {
    /// `0.0.0.0`
    pub const UNSPECIFIED: Address = Address([0; 4]);

    /// `255.255.255.255`
    pub const BROADCAST: Address = Address([0xff; 4]);

    /// The address `a.b.c.d`.
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Address {
        Address([a, b, c, d])
    }

    /// Read an address from the first four octets of `data`.
    ///
    /// # Panics
    /// When `data` is shorter than four octets.
    pub fn from_bytes(data: &[u8]) -> Address {
        let mut octets = [0; 4];
        octets.copy_from_slice(&data[..4]);
        Address(octets)
    }

    /// The address in transmission order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The address as a number, `10.0.0.1` being `0x0a00_0001`.
    pub fn to_network_integer(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Inverse of [`to_network_integer`].
    ///
    /// [`to_network_integer`]: #method.to_network_integer
    pub fn from_network_integer(num: u32) -> Self {
        Address(num.to_be_bytes())
    }
}

#[cfg(feature = "std")]
impl From<std::net::Ipv4Addr> for Address {
    fn from(addr: std::net::Ipv4Addr) -> Address {
        Address(addr.octets())
    }
}

#[cfg(feature = "std")]
impl From<Address> for std::net::Ipv4Addr {
    fn from(addr: Address) -> std::net::Ipv4Addr {
        addr.0.into()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

/// The error of parsing an address in dotted-quad notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseAddressError {
    /// There were not exactly four octets.
    Length,
    /// An octet was not a decimal number below 256.
    Octet,
}

impl fmt::Display for ParseAddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ParseAddressError::Length => "ipv4 address needs four octets",
            ParseAddressError::Octet => "invalid octet in ipv4 address",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseAddressError {}

fn decimal_octet(part: &str) -> Option<u8> {
    // `u8::from_str` would also take a leading `+`.
    if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(src: &str) -> core::result::Result<Address, ParseAddressError> {
        let mut octets = [0u8; 4];
        let mut count = 0;
        for part in src.split('.') {
            let slot = octets.get_mut(count).ok_or(ParseAddressError::Length)?;
            *slot = decimal_octet(part).ok_or(ParseAddressError::Octet)?;
            count += 1;
        }

        if count == octets.len() {
            Ok(Address(octets))
        } else {
            Err(ParseAddressError::Length)
        }
    }
}

byte_wrapper! {
    /// A byte slice viewed as an IPv4 datagram.
    #[derive(Debug, PartialEq, Eq)]
    pub struct ipv4([u8]);
}

mod field {
    use crate::wire::field::Field;

    pub(crate) const VER_IHL:  usize = 0;
    pub(crate) const LENGTH:   Field = 2..4;
    pub(crate) const FRAGMENT: Field = 6..8;
    pub(crate) const TTL:      usize = 8;
    pub(crate) const PROTOCOL: usize = 9;
    pub(crate) const CHECKSUM: Field = 10..12;
    pub(crate) const SRC_ADDR: Field = 12..16;
    pub(crate) const DST_ADDR: Field = 16..20;
}

/// A header without options, the only kind ever emitted.
const HEADER_LEN: usize = field::DST_ADDR.end;

const DONT_FRAGMENT: u16 = 0x4000;
const MORE_FRAGMENTS: u16 = 0x2000;
const OFFSET_MASK: u16 = 0x1fff;

impl ipv4 {
    /// View a buffer as a datagram without checking it.
    pub fn new_unchecked(buffer: &[u8]) -> &ipv4 {
        Self::__from_macro_new_unchecked(buffer)
    }

    /// View a mutable buffer as a datagram without checking it.
    pub fn new_unchecked_mut(buffer: &mut [u8]) -> &mut ipv4 {
        Self::__from_macro_new_unchecked_mut(buffer)
    }

    /// View a buffer as a datagram if its lengths are consistent.
    pub fn new_checked(data: &[u8]) -> Result<&ipv4> {
        let packet = Self::new_unchecked(data);
        packet.check_len()?;
        Ok(packet)
    }

    /// Check that the header and the payload it announces are present, so no accessor panics.
    ///
    /// Bytes past the total length are fine, links pad short frames. A header length below the
    /// minimum or beyond the total length is `Malformed`.
    pub fn check_len(&self) -> Result<()> {
        if self.0.len() < HEADER_LEN {
            return Err(Error::Truncated);
        }

        let header_len = self.header_len();
        let total_len = usize::from(self.total_len());
        if header_len < HEADER_LEN || header_len > total_len {
            Err(Error::Malformed)
        } else if self.0.len() < total_len {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    pub fn version(&self) -> u8 {
        self.0[field::VER_IHL] >> 4
    }

    /// The header length in octets, options included.
    pub fn header_len(&self) -> usize {
        usize::from(self.0[field::VER_IHL] & 0x0f) * 4
    }

    /// The length of header and payload in octets.
    pub fn total_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::LENGTH])
    }

    /// Whether this is only a part of a larger datagram.
    pub fn is_fragment(&self) -> bool {
        NetworkEndian::read_u16(&self.0[field::FRAGMENT]) & (MORE_FRAGMENTS | OFFSET_MASK) != 0
    }

    pub fn hop_limit(&self) -> u8 {
        self.0[field::TTL]
    }

    pub fn protocol(&self) -> Protocol {
        Protocol::from(self.0[field::PROTOCOL])
    }

    pub fn src_addr(&self) -> Address {
        Address::from_bytes(&self.0[field::SRC_ADDR])
    }

    pub fn dst_addr(&self) -> Address {
        Address::from_bytes(&self.0[field::DST_ADDR])
    }

    /// Whether the header sums up to the all-ones word.
    pub fn verify_checksum(&self) -> bool {
        checksum::data(&self.0[..self.header_len()]) == !0
    }

    /// The payload, without trailing link padding.
    pub fn payload_slice(&self) -> &[u8] {
        &self.0[self.header_len()..usize::from(self.total_len())]
    }
}

/// A checked IPv4 datagram around some byte container.
///
/// Only constructible through a successful parse or by serializing a [`Repr`], so the accessors
/// reached through `Deref` never panic.
///
/// [`Repr`]: struct.Ipv4Repr.html
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Packet<T> {
    buffer: T,
    repr: Repr,
}

/// An owned IPv4 datagram, the unit exchanged between the network interface and the layer above.
pub type InternetDatagram = Packet<Vec<u8>>;

impl Packet<Vec<u8>> {
    /// Serialize a datagram with the given header and payload.
    ///
    /// The `payload_len` of `repr` is replaced by the actual length of `payload`, and the header
    /// checksum is always computed.
    pub fn new(repr: Repr, payload: &[u8]) -> Self {
        let repr = Repr { payload_len: payload.len(), ..repr };
        let mut buffer = Vec::with_capacity(HEADER_LEN + payload.len());
        buffer.resize(HEADER_LEN, 0);
        repr.emit(ipv4::new_unchecked_mut(&mut buffer), Checksum::Manual);
        buffer.extend_from_slice(payload);
        Packet { buffer, repr }
    }
}

impl<T: AsRef<[u8]>> Packet<T> {
    /// Check and parse a datagram.
    pub fn new_checked(buffer: T, checksum: Checksum) -> Result<Packet<T>> {
        let repr = Repr::parse(ipv4::new_checked(buffer.as_ref())?, checksum)?;
        Ok(Packet { buffer, repr })
    }

    pub fn repr(&self) -> Repr {
        self.repr
    }

    /// The whole datagram, header included.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }

    /// Copy the datagram into an owned buffer, leaving behind any bytes after its total length.
    pub fn to_datagram(&self) -> InternetDatagram {
        let len = usize::from(self.total_len());
        Packet {
            buffer: self.as_bytes()[..len].to_vec(),
            repr: self.repr,
        }
    }
}

impl<T: AsRef<[u8]>> ops::Deref for Packet<T> {
    type Target = ipv4;

    fn deref(&self) -> &ipv4 {
        // Lengths were checked on construction.
        ipv4::new_unchecked(self.buffer.as_ref())
    }
}

impl<T: AsRef<[u8]>> fmt::Display for Packet<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} with {} bytes", self.repr, self.repr.payload_len)
    }
}

/// The header of an unfragmented IPv4 datagram.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Repr {
    pub src_addr:    Address,
    pub dst_addr:    Address,
    pub protocol:    Protocol,
    pub payload_len: usize,
    pub hop_limit:   u8,
}

impl Repr {
    /// Parse a datagram header.
    ///
    /// Fragments are `Unsupported`, nothing here reassembles them.
    pub fn parse(packet: &ipv4, checksum: Checksum) -> Result<Repr> {
        packet.check_len()?;
        if packet.version() != 4 {
            return Err(Error::Malformed);
        }
        if checksum.manual() && !packet.verify_checksum() {
            return Err(Error::WrongChecksum);
        }
        if packet.is_fragment() {
            return Err(Error::Unsupported);
        }

        Ok(Repr {
            src_addr: packet.src_addr(),
            dst_addr: packet.dst_addr(),
            protocol: packet.protocol(),
            payload_len: usize::from(packet.total_len()) - packet.header_len(),
            hop_limit: packet.hop_limit(),
        })
    }

    /// The length of the emitted header.
    pub fn buffer_len(&self) -> usize {
        HEADER_LEN
    }

    /// Write the header into the start of `packet`.
    ///
    /// Identification, type of service and options are left zero and "don't fragment" is set.
    pub fn emit(&self, packet: &mut ipv4, checksum: Checksum) {
        let header = &mut packet.0[..HEADER_LEN];
        header.fill(0);
        header[field::VER_IHL] = 0x40 | (HEADER_LEN / 4) as u8;
        NetworkEndian::write_u16(&mut header[field::LENGTH], (HEADER_LEN + self.payload_len) as u16);
        NetworkEndian::write_u16(&mut header[field::FRAGMENT], DONT_FRAGMENT);
        header[field::TTL] = self.hop_limit;
        header[field::PROTOCOL] = self.protocol.into();
        header[field::SRC_ADDR].copy_from_slice(self.src_addr.as_bytes());
        header[field::DST_ADDR].copy_from_slice(self.dst_addr.as_bytes());

        if checksum.manual() {
            let sum = !checksum::data(header);
            NetworkEndian::write_u16(&mut header[field::CHECKSUM], sum);
        }
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "IPv4 {} > {} {}", self.src_addr, self.dst_addr, self.protocol)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// A UDP datagram with payload `ping` from 10.0.0.1 to 10.0.0.2.
    #[rustfmt::skip]
    static PING: [u8; 24] = [
        0x45, 0x00, 0x00, 0x18,
        0x00, 0x00, 0x40, 0x00,
        0x40, 0x11, 0x26, 0xd3,
        0x0a, 0x00, 0x00, 0x01,
        0x0a, 0x00, 0x00, 0x02,
        b'p', b'i', b'n', b'g',
    ];

    fn ping_repr() -> Repr {
        Repr {
            src_addr: Address::new(10, 0, 0, 1),
            dst_addr: Address::new(10, 0, 0, 2),
            protocol: Protocol::Udp,
            payload_len: 4,
            hop_limit: 64,
        }
    }

    #[test]
    fn build() {
        let datagram = InternetDatagram::new(ping_repr(), b"ping");
        assert_eq!(datagram.as_bytes(), &PING[..]);
        assert!(datagram.verify_checksum());
        assert_eq!(format!("{}", datagram), "IPv4 10.0.0.1 > 10.0.0.2 UDP with 4 bytes");
    }

    #[test]
    fn build_overrides_payload_len() {
        let repr = Repr { payload_len: 100, ..ping_repr() };
        let datagram = InternetDatagram::new(repr, b"ping");
        assert_eq!(datagram.repr(), ping_repr());
        assert_eq!(datagram.total_len(), 24);
    }

    #[test]
    fn parse() {
        let packet = Packet::new_checked(&PING[..], Checksum::Manual).unwrap();
        assert_eq!(packet.repr(), ping_repr());
        assert_eq!(packet.header_len(), 20);
        assert_eq!(packet.payload_slice(), b"ping");
    }

    #[test]
    fn wrong_checksum() {
        let mut bytes = PING;
        bytes[11] ^= 0x01;
        assert_eq!(Packet::new_checked(&bytes[..], Checksum::Manual), Err(Error::WrongChecksum));
        assert!(Packet::new_checked(&bytes[..], Checksum::Ignored).is_ok());
    }

    #[test]
    fn wrong_version() {
        let mut bytes = PING;
        bytes[0] = 0x65;
        assert_eq!(Packet::new_checked(&bytes[..], Checksum::Ignored), Err(Error::Malformed));
    }

    #[test]
    fn fragments_unsupported() {
        let mut more = PING;
        more[6] = 0x20;
        assert_eq!(Packet::new_checked(&more[..], Checksum::Ignored), Err(Error::Unsupported));

        let mut offset = PING;
        offset[6..8].copy_from_slice(&[0x40, 0x10]);
        assert_eq!(Packet::new_checked(&offset[..], Checksum::Ignored), Err(Error::Unsupported));
    }

    #[test]
    fn truncated() {
        assert_eq!(Packet::new_checked(&PING[..19], Checksum::Ignored), Err(Error::Truncated));
        assert_eq!(Packet::new_checked(&PING[..23], Checksum::Ignored), Err(Error::Truncated));
    }

    #[test]
    fn inconsistent_lengths() {
        let mut short_total = PING;
        short_total[3] = 0x10;
        assert_eq!(Packet::new_checked(&short_total[..], Checksum::Ignored), Err(Error::Malformed));

        let mut short_header = PING;
        short_header[0] = 0x44;
        assert_eq!(Packet::new_checked(&short_header[..], Checksum::Ignored), Err(Error::Malformed));
    }

    #[test]
    fn padding_stripped() {
        let mut padded = PING.to_vec();
        padded.extend_from_slice(&[0; 22]);
        let packet = Packet::new_checked(&padded[..], Checksum::Manual).unwrap();
        assert_eq!(packet.payload_slice(), b"ping");

        let owned = packet.to_datagram();
        assert_eq!(owned.as_bytes(), &PING[..]);
        assert_eq!(owned.repr(), ping_repr());
    }

    #[test]
    fn network_integer() {
        let addr = Address::new(192, 168, 1, 2);
        assert_eq!(addr.to_network_integer(), 0xc0a8_0102);
        assert_eq!(Address::from_network_integer(0xc0a8_0102), addr);
    }

    #[test]
    fn address_text() {
        assert_eq!("10.0.0.1".parse(), Ok(Address::new(10, 0, 0, 1)));
        assert_eq!(format!("{}", Address::new(10, 0, 0, 1)), "10.0.0.1");
        assert_eq!("10.0.0".parse::<Address>(), Err(ParseAddressError::Length));
        assert_eq!("10.0.0.1.5".parse::<Address>(), Err(ParseAddressError::Length));
        assert_eq!("10.0.0.256".parse::<Address>(), Err(ParseAddressError::Octet));
        assert_eq!("10.+0.0.1".parse::<Address>(), Err(ParseAddressError::Octet));
        assert_eq!("10..0.1".parse::<Address>(), Err(ParseAddressError::Octet));
    }
}
