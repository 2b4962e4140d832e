use core::{fmt, ops, str::FromStr};
use alloc::vec::Vec;
use byteorder::{ByteOrder, NetworkEndian};

use crate::wire::{Error, Result};

enum_with_unknown! {
    /// The protocol carried in a frame.
    pub enum EtherType(u16) {
        Ipv4 = 0x0800,
        Arp  = 0x0806,
        Ipv6 = 0x86DD,
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            EtherType::Ipv4 => "IPv4",
            EtherType::Arp => "ARP",
            EtherType::Ipv6 => "IPv6",
            EtherType::Unknown(raw) => return write!(f, "0x{:04x}", raw),
        };
        f.write_str(name)
    }
}

/// A hardware address on the link.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Address(pub [u8; 6]);

impl Address {
    /// Every host on the link.
    pub const BROADCAST: Address = Address([0xff; 6]);

    /// The all-zero address, the unknown target of an ARP request.
    pub const UNSPECIFIED: Address = Address([0; 6]);

    /// Read an address from the first six octets of `data`.
    ///
    /// # Panics
    /// When `data` is shorter than six octets.
    pub fn from_bytes(data: &[u8]) -> Address {
        let mut octets = [0; 6];
        octets.copy_from_slice(&data[..6]);
        Address(octets)
    }

    /// The address in transmission order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether frames to this address reach every host.
    pub fn is_broadcast(&self) -> bool {
        *self == Address::BROADCAST
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, octet) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02x}", octet)?;
        }
        Ok(())
    }
}

/// The error of parsing an address in `02:00:5e:10:00:01` notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseAddressError {
    /// There were not exactly six octets.
    Length,
    /// An octet was not one or two hexadecimal digits.
    Octet,
}

impl fmt::Display for ParseAddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ParseAddressError::Length => "ethernet address needs six octets",
            ParseAddressError::Octet => "invalid octet in ethernet address",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseAddressError {}

fn hex_octet(part: &str) -> Option<u8> {
    let digits = part.len() == 1 || part.len() == 2;
    if !digits || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(part, 16).ok()
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(src: &str) -> core::result::Result<Address, ParseAddressError> {
        let mut octets = [0u8; 6];
        let mut count = 0;
        for part in src.split(':') {
            let slot = octets.get_mut(count).ok_or(ParseAddressError::Length)?;
            *slot = hex_octet(part).ok_or(ParseAddressError::Octet)?;
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
    /// A byte slice viewed as an Ethernet II frame.
    #[derive(Debug, PartialEq, Eq)]
    pub struct ethernet([u8]);
}

mod field {
    use crate::wire::field::*;

    pub(crate) const DST:     Field =  0..6;
    pub(crate) const SRC:     Field =  6..12;
    pub(crate) const TYPE:    Field = 12..14;
    pub(crate) const PAYLOAD: Rest  = 14..;
}

/// Octets in front of the payload.
const HEADER_LEN: usize = field::PAYLOAD.start;

impl ethernet {
    /// View a buffer as a frame without checking its length.
    pub fn new_unchecked(data: &[u8]) -> &Self {
        Self::__from_macro_new_unchecked(data)
    }

    /// View a mutable buffer as a frame without checking its length.
    pub fn new_unchecked_mut(data: &mut [u8]) -> &mut Self {
        Self::__from_macro_new_unchecked_mut(data)
    }

    /// View a buffer as a frame if it holds a complete header.
    pub fn new_checked(data: &[u8]) -> Result<&Self> {
        let frame = Self::new_unchecked(data);
        frame.check_len()?;
        Ok(frame)
    }

    /// Check that the header is complete, so no accessor panics.
    pub fn check_len(&self) -> Result<()> {
        if self.0.len() < HEADER_LEN {
            Err(Error::Truncated)
        } else {
            Ok(())
        }
    }

    pub fn dst_addr(&self) -> Address {
        Address::from_bytes(&self.0[field::DST])
    }

    pub fn src_addr(&self) -> Address {
        Address::from_bytes(&self.0[field::SRC])
    }

    /// The EtherType field. 802.1Q tags are not looked through.
    pub fn ethertype(&self) -> EtherType {
        EtherType::from(NetworkEndian::read_u16(&self.0[field::TYPE]))
    }

    pub fn set_dst_addr(&mut self, value: Address) {
        self.0[field::DST].copy_from_slice(value.as_bytes())
    }

    pub fn set_src_addr(&mut self, value: Address) {
        self.0[field::SRC].copy_from_slice(value.as_bytes())
    }

    pub fn set_ethertype(&mut self, value: EtherType) {
        NetworkEndian::write_u16(&mut self.0[field::TYPE], value.into())
    }

    pub fn payload_slice(&self) -> &[u8] {
        &self.0[field::PAYLOAD]
    }

    pub fn payload_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0[field::PAYLOAD]
    }
}

/// An Ethernet II frame with a parsed header, owning or borrowing its bytes.
///
/// The owned `Vec<u8>` flavour is what an [`Interface`] queues for transmission. Its bytes, from
/// [`as_bytes`], are the frame as it goes on the link.
///
/// [`Interface`]: ../layer/eth/struct.Interface.html
/// [`as_bytes`]: #method.as_bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<T> {
    buffer: T,
    repr: Repr,
}

impl Frame<Vec<u8>> {
    /// Serialize a frame from its header and payload.
    pub fn new(repr: Repr, payload: &[u8]) -> Self {
        let mut buffer = Vec::with_capacity(HEADER_LEN + payload.len());
        buffer.resize(HEADER_LEN, 0);
        repr.emit(ethernet::new_unchecked_mut(&mut buffer));
        buffer.extend_from_slice(payload);
        Frame { buffer, repr }
    }
}

impl<T: AsRef<[u8]>> Frame<T> {
    /// Parse the header of a received frame.
    pub fn new_checked(buffer: T) -> Result<Self> {
        let repr = Repr::parse(ethernet::new_checked(buffer.as_ref())?)?;
        Ok(Frame { buffer, repr })
    }

    pub fn repr(&self) -> Repr {
        self.repr
    }

    /// The whole frame, header included.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    pub fn into_inner(self) -> T {
        self.buffer
    }
}

impl<T: AsRef<[u8]>> ops::Deref for Frame<T> {
    type Target = ethernet;

    fn deref(&self) -> &ethernet {
        // Length was checked on construction.
        ethernet::new_unchecked(self.buffer.as_ref())
    }
}

impl<T: AsRef<[u8]>> fmt::Display for Frame<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} with {} bytes", self.repr, self.payload_slice().len())
    }
}

/// The header of an Ethernet II frame.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Repr {
    pub src_addr:  Address,
    pub dst_addr:  Address,
    pub ethertype: EtherType,
}

impl Repr {
    pub fn parse(frame: &ethernet) -> Result<Repr> {
        frame.check_len()?;
        Ok(Repr {
            src_addr: frame.src_addr(),
            dst_addr: frame.dst_addr(),
            ethertype: frame.ethertype(),
        })
    }

    /// Write the header, the buffer must hold at least the header.
    pub fn emit(&self, frame: &mut ethernet) {
        frame.set_dst_addr(self.dst_addr);
        frame.set_src_addr(self.src_addr);
        frame.set_ethertype(self.ethertype);
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} > {}", self.ethertype, self.src_addr, self.dst_addr)
    }
}
