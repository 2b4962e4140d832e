use core::{fmt, iter, slice};
use alloc::vec::Vec;

use super::Writer;

/// A stream (re)assembler.
///
/// Accepts byte ranges of a stream tagged with their absolute index, in any order and possibly
/// overlapping, and pushes the bytes to a [`Writer`] in stream order without duplicates. Ranges
/// that can not be delivered yet are held in a pending buffer: a sorted list of disjoint segments
/// that never touch, each starting strictly after the next expected index.
///
/// Nothing past what the output can currently accept is ever buffered. The window is
/// `[next_index, next_index + available_capacity)` and is evaluated anew on each insertion, so
/// everything pending can be pushed in full once it becomes contiguous.
///
/// ## Example
///
/// ```
/// use minnow::storage::{ByteStream, Reassembler};
/// let mut output = ByteStream::new(64);
/// let mut asm = Reassembler::new();
///
/// asm.insert(6, b"world", true, &mut output);
/// assert_eq!(asm.bytes_pending(), 5);
/// asm.insert(0, b"hello ", false, &mut output);
/// assert_eq!(output.read(64), b"hello world");
/// assert!(output.is_finished());
/// ```
///
/// [`Writer`]: trait.Writer.html
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reassembler {
    /// Sorted by start, disjoint and not adjacent.
    pending: Vec<Segment>,
    /// The sum of all pending segment lengths.
    pending_bytes: usize,
    /// Absolute index of the next byte the output expects.
    next_index: u64,
    /// The end of the stream has been seen.
    has_last: bool,
}

/// A contiguous range of buffered bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Segment {
    start: u64,
    data: Vec<u8>,
}

/// Iterator over the half-open index ranges held back by a reassembler.
pub struct PendingRanges<'a> {
    inner: slice::Iter<'a, Segment>,
}

impl Segment {
    fn end(&self) -> u64 {
        self.start + self.data.len() as u64
    }
}

impl Reassembler {
    /// Create an empty reassembler expecting the byte at index zero.
    pub fn new() -> Self {
        Reassembler::default()
    }

    /// Insert a byte range starting at absolute index `first_index`.
    ///
    /// Bytes that are already delivered or lie beyond the current capacity of `output` are
    /// trimmed. A range trimmed at its end is never the end of the stream, whatever `is_last`
    /// claims. When the stream has been delivered completely and the end was seen, `output` is
    /// closed. Inserting into a reassembler whose output was closed has no effect.
    pub fn insert<W>(&mut self, first_index: u64, data: &[u8], is_last: bool, output: &mut W)
        where W: Writer + ?Sized,
    {
        if output.is_closed() {
            net_trace!("reassembler: ignoring {} bytes at {} after close", data.len(), first_index);
            return;
        }

        if data.is_empty() {
            if is_last {
                self.has_last = true;
                self.flush(output);
            }
            return;
        }

        let capacity_end = self.next_index + output.available_capacity() as u64;
        let mut start = first_index;
        let mut end = first_index.saturating_add(data.len() as u64);
        let mut is_last = is_last;

        if end <= self.next_index || capacity_end <= start {
            net_trace!("reassembler: dropped [{}, {}) outside of [{}, {})",
                start, end, self.next_index, capacity_end);
            return;
        }

        if start < self.next_index {
            start = self.next_index;
        }

        if end > capacity_end {
            net_trace!("reassembler: trimmed [{}, {}) to capacity end {}", start, end, capacity_end);
            end = capacity_end;
            is_last = false;
        }

        let data = &data[(start - first_index) as usize..(end - first_index) as usize];

        if start != self.next_index {
            self.store(start, data);
        } else {
            match self.pending.first() {
                None => self.deliver(data, output),
                Some(first) if end <= first.end() => {
                    // Bytes already buffered in the first segment win.
                    let cut = end.min(first.start);
                    self.deliver(&data[..(cut - start) as usize], output);
                },
                Some(_) => self.store(start, data),
            }
        }

        self.has_last |= is_last;
        self.flush(output);
    }

    /// The number of bytes held back, waiting for a gap before them to be filled.
    pub fn bytes_pending(&self) -> usize {
        self.pending_bytes
    }

    /// Absolute index of the next byte expected by the output.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Whether no bytes are held back.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether the end of the stream has been seen.
    pub fn has_last(&self) -> bool {
        self.has_last
    }

    /// The ranges of pending bytes, as ordered half-open `(start, end)` index pairs.
    pub fn pending_ranges(&self) -> PendingRanges<'_> {
        PendingRanges {
            inner: self.pending.iter(),
        }
    }

    /// Push bytes starting at the next index.
    fn deliver<W: Writer + ?Sized>(&mut self, data: &[u8], output: &mut W) {
        if data.is_empty() {
            return;
        }

        output.push(data);
        self.next_index += data.len() as u64;
    }

    /// Merge a range into the pending buffer, the new bytes override buffered ones.
    fn store(&mut self, start: u64, data: &[u8]) {
        let end = start + data.len() as u64;

        // All segments overlapping or touching `[start, end)`.
        let lo = self.pending.partition_point(|segment| segment.end() < start);
        let hi = self.pending.partition_point(|segment| segment.start <= end);

        if lo == hi {
            self.pending_bytes += data.len();
            self.pending.insert(lo, Segment { start, data: data.to_vec() });
            return;
        }

        let merged_start = start.min(self.pending[lo].start);
        let merged_end = end.max(self.pending[hi - 1].end());
        let mut merged = alloc::vec![0; (merged_end - merged_start) as usize];

        for segment in &self.pending[lo..hi] {
            let offset = (segment.start - merged_start) as usize;
            merged[offset..offset + segment.data.len()].copy_from_slice(&segment.data);
            self.pending_bytes -= segment.data.len();
        }

        let offset = (start - merged_start) as usize;
        merged[offset..offset + data.len()].copy_from_slice(data);
        self.pending_bytes += merged.len();

        self.pending.splice(lo..hi, iter::once(Segment { start: merged_start, data: merged }));
    }

    /// Push every segment that became contiguous, then close the output if the stream is done.
    fn flush<W: Writer + ?Sized>(&mut self, output: &mut W) {
        let ready = self.pending
            .iter()
            .take_while(|segment| segment.start == self.next_index)
            .count();
        debug_assert!(ready <= 1, "pending segments must not touch");

        for segment in self.pending.drain(..ready) {
            self.pending_bytes -= segment.data.len();
            output.push(&segment.data);
            self.next_index += segment.data.len() as u64;
        }

        if self.has_last && self.pending.is_empty() && !output.is_closed() {
            net_debug!("reassembler: stream complete at {}", self.next_index);
            output.close();
        }
    }
}

impl<'a> Iterator for PendingRanges<'a> {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<(u64, u64)> {
        self.inner.next().map(|segment| (segment.start, segment.end()))
    }
}

impl fmt::Display for Reassembler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} [ ", self.next_index)?;
        for (start, end) in self.pending_ranges() {
            write!(f, "{}..{} ", start, end)?;
        }
        write!(f, "]")
    }
}
