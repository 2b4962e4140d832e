use alloc::collections::VecDeque;
use alloc::vec::Vec;

/// The producing half of a bounded byte stream.
///
/// This is all the [`Reassembler`] needs from its output. A producer must never push more than
/// `available_capacity()` bytes at once; implementations are free to drop the excess.
///
/// [`Reassembler`]: struct.Reassembler.html
pub trait Writer {
    /// Append bytes to the stream.
    fn push(&mut self, data: &[u8]);

    /// The number of bytes that can currently be pushed.
    fn available_capacity(&self) -> usize;

    /// Signal that no more bytes will be pushed.
    ///
    /// Closing an already closed stream has no effect.
    fn close(&mut self);

    /// Whether `close` has been called.
    fn is_closed(&self) -> bool;
}

impl<W: Writer + ?Sized> Writer for &'_ mut W {
    fn push(&mut self, data: &[u8]) {
        (**self).push(data)
    }

    fn available_capacity(&self) -> usize {
        (**self).available_capacity()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

/// An in-memory byte stream with a fixed capacity.
///
/// The capacity bounds the bytes that were pushed but not yet popped. Both ends are owned by the
/// same value, the writing end is the [`Writer`] implementation and reading happens with
/// [`peek`], [`pop`] and [`read`].
///
/// ```
/// use minnow::storage::{ByteStream, Writer};
/// let mut stream = ByteStream::new(4);
/// stream.push(b"hello");
/// assert_eq!(stream.read(8), b"hell");
/// assert_eq!(stream.available_capacity(), 4);
/// ```
///
/// [`Writer`]: trait.Writer.html
/// [`peek`]: #method.peek
/// [`pop`]: #method.pop
/// [`read`]: #method.read
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ByteStream {
    buffer: VecDeque<u8>,
    capacity: usize,
    pushed: u64,
    popped: u64,
    closed: bool,
}

impl ByteStream {
    /// Create an empty, open stream.
    pub fn new(capacity: usize) -> Self {
        ByteStream {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            pushed: 0,
            popped: 0,
            closed: false,
        }
    }

    /// The maximum number of bytes buffered at any time.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// A contiguous prefix of the buffered bytes.
    ///
    /// Empty only if no bytes are buffered. It need not contain all of them.
    pub fn peek(&self) -> &[u8] {
        self.buffer.as_slices().0
    }

    /// Remove up to `len` bytes from the front.
    pub fn pop(&mut self, len: usize) {
        let len = len.min(self.buffer.len());
        self.buffer.drain(..len);
        self.popped += len as u64;
    }

    /// Remove and return up to `len` bytes from the front.
    pub fn read(&mut self, len: usize) -> Vec<u8> {
        let len = len.min(self.buffer.len());
        let data: Vec<u8> = self.buffer.drain(..len).collect();
        self.popped += len as u64;
        data
    }

    /// The number of bytes pushed but not yet popped.
    pub fn bytes_buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Total number of bytes ever pushed.
    pub fn bytes_pushed(&self) -> u64 {
        self.pushed
    }

    /// Total number of bytes ever popped.
    pub fn bytes_popped(&self) -> u64 {
        self.popped
    }

    /// The stream is closed and every byte has been read.
    pub fn is_finished(&self) -> bool {
        self.closed && self.buffer.is_empty()
    }
}

impl Writer for ByteStream {
    fn push(&mut self, data: &[u8]) {
        if self.closed {
            net_debug!("stream: push of {} bytes after close", data.len());
            return;
        }

        let len = data.len().min(self.available_capacity());
        if len < data.len() {
            net_debug!("stream: truncated push from {} to {} bytes", data.len(), len);
        }

        self.buffer.extend(&data[..len]);
        self.pushed += len as u64;
    }

    fn available_capacity(&self) -> usize {
        self.capacity - self.buffer.len()
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
