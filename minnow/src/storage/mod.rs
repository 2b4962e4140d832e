//! Byte buffers between the layers.
//!
//! The [`Reassembler`] orders arbitrarily arriving byte ranges of a stream and hands the
//! contiguous prefix to a [`Writer`], usually a bounded [`ByteStream`] that the application
//! reads from. [`Expiring`] is the keyed store behind the neighbor cache and the request timers
//! of the network interface.
//!
//! [`Reassembler`]: struct.Reassembler.html
//! [`Writer`]: trait.Writer.html
//! [`ByteStream`]: struct.ByteStream.html
//! [`Expiring`]: struct.Expiring.html
mod assembler;
mod expiry;
mod stream;

pub use self::assembler::{PendingRanges, Reassembler};
pub use self::expiry::Expiring;
pub use self::stream::{ByteStream, Writer};
