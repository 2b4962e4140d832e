use core::fmt;

/// The error type for parsing of the collaborator wire formats.
///
/// None of these ever reaches the owner of an interface or reassembler. They are produced by the
/// checked constructors in this module and the layers drop the offending input when they see one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// An incoming packet could not be parsed because it was shorter than assumed.
    ///
    /// The packet may be shorter than the minimum length specified, a size longer than the actual
    /// payload. For variable length packets, this may be because some of its fields were out of
    /// bounds of the received data.
    Truncated,

    /// An incoming packet had an incorrect checksum and was dropped.
    WrongChecksum,

    /// An incoming packet could not be recognized and was dropped.
    ///
    /// E.g. an ARP message for a hardware type other than Ethernet. This may be due to an
    /// outdated implementation of the standard or registry which defines identifiers in packets.
    Unrecognized,

    /// An incoming packet was recognized but was self-contradictory.
    ///
    /// Examples: an IPv4 header claiming to be longer than the total length of its datagram; a
    /// version field that is not 4.
    Malformed,

    /// Parsing depends on information derived from a non-implemented feature.
    ///
    /// Similar to `Unrecognized` but in contrast we know that our implementation is incomplete.
    /// An example is a fragmented IPv4 datagram, which we never reassemble.
    Unsupported,
}

/// The result type for the wire module.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Truncated     => write!(f, "truncated packet"),
            Error::WrongChecksum => write!(f, "checksum error"),
            Error::Unrecognized  => write!(f, "unrecognized packet"),
            Error::Unsupported   => write!(f, "unsupported option"),
            Error::Malformed     => write!(f, "malformed packet"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
