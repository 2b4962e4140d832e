use core::{cmp, fmt, ops};

/// A TCP sequence number.
///
/// A sequence number is an absolute stream index modulo 2<sup>32</sup>, offset by a zero point
/// (the initial sequence number). Sequence numbers do not have a discontiguity when compared
/// pairwise across a signed overflow.
///
/// Converting between the two domains is done with [`wrap`] and [`unwrap`]. The latter needs a
/// checkpoint, some recently seen absolute index, to decide which of the infinitely many
/// candidates congruent to the wire value was meant.
///
/// ```
/// use minnow::wire::SeqNumber;
/// let isn = SeqNumber(0xffff_fff0);
/// let seq = SeqNumber::wrap(0x20, isn);
/// assert_eq!(seq, SeqNumber(0x10));
/// assert_eq!(seq.unwrap(isn, 0), 0x20);
/// assert_eq!(seq.unwrap(isn, 3 << 32), (3 << 32) + 0x20);
/// ```
///
/// [`wrap`]: #method.wrap
/// [`unwrap`]: #method.unwrap
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct SeqNumber(pub u32);

impl SeqNumber {
    /// Place an absolute index on the wire, relative to the zero point.
    pub fn wrap(absolute: u64, zero_point: SeqNumber) -> SeqNumber {
        SeqNumber(zero_point.0.wrapping_add(absolute as u32))
    }

    /// Find the absolute index closest to `checkpoint` that wraps to `self`.
    ///
    /// When two candidates are equally close the smaller one is chosen. The result never
    /// underflows below zero nor overflows past `u64::MAX`; the closest representable candidate
    /// is returned instead.
    pub fn unwrap(self, zero_point: SeqNumber, checkpoint: u64) -> u64 {
        let check = SeqNumber::wrap(checkpoint, zero_point);
        // Both distances lie within one cycle and are never negative.
        let left = u64::from(check.0.wrapping_sub(self.0));
        let right = u64::from(self.0.wrapping_sub(check.0));

        if left <= right && checkpoint >= left {
            return checkpoint - left;
        }

        match checkpoint.checked_add(right) {
            Some(index) => index,
            // Only reachable when the checkpoint is within one cycle of `u64::MAX`.
            None => checkpoint - left,
        }
    }
}

impl fmt::Display for SeqNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SeqNumber {
    fn from(raw: u32) -> Self {
        SeqNumber(raw)
    }
}

impl From<SeqNumber> for u32 {
    fn from(seq: SeqNumber) -> Self {
        seq.0
    }
}

impl ops::Add<u32> for SeqNumber {
    type Output = SeqNumber;

    fn add(self, rhs: u32) -> SeqNumber {
        SeqNumber(self.0.wrapping_add(rhs))
    }
}

impl ops::AddAssign<u32> for SeqNumber {
    fn add_assign(&mut self, rhs: u32) {
        *self = *self + rhs;
    }
}

impl ops::Sub for SeqNumber {
    type Output = i32;

    /// The signed distance from `rhs` to `self`.
    fn sub(self, rhs: SeqNumber) -> i32 {
        self.0.wrapping_sub(rhs.0) as i32
    }
}

impl cmp::PartialOrd for SeqNumber {
    fn partial_cmp(&self, other: &SeqNumber) -> Option<cmp::Ordering> {
        (*self - *other).partial_cmp(&0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CYCLE: u64 = 1 << 32;

    #[test]
    fn wrap_offsets_by_zero_point() {
        assert_eq!(SeqNumber::wrap(3 * CYCLE + 17, SeqNumber(15)), SeqNumber(32));
        assert_eq!(SeqNumber::wrap(3 * CYCLE + 17, SeqNumber(u32::max_value())), SeqNumber(16));
        assert_eq!(SeqNumber::wrap(0, SeqNumber(1 << 31)), SeqNumber(1 << 31));
    }

    #[test]
    fn unwrap_first_cycle() {
        let isn = SeqNumber(0);
        assert_eq!(SeqNumber(1).unwrap(isn, 0), 1);
        assert_eq!(SeqNumber(1).unwrap(isn, CYCLE - 1), CYCLE + 1);
        assert_eq!(SeqNumber(u32::max_value() - 1).unwrap(isn, 3 * CYCLE), 3 * CYCLE - 2);
    }

    #[test]
    fn unwrap_near_zero() {
        // The left candidate would be negative, so the only valid one lies to the right.
        let isn = SeqNumber(10);
        assert_eq!(SeqNumber(9).unwrap(isn, 0), CYCLE - 1);
        assert_eq!(SeqNumber(10).unwrap(isn, 0), 0);
    }

    #[test]
    fn unwrap_near_max() {
        let isn = SeqNumber(0);
        assert_eq!(SeqNumber::wrap(u64::max_value(), isn).unwrap(isn, u64::max_value()),
                   u64::max_value());
        // The right candidate would overflow.
        let checkpoint = u64::max_value() - 2;
        let seq = SeqNumber::wrap(checkpoint, isn) + 10;
        assert_eq!(seq.unwrap(isn, checkpoint), checkpoint - CYCLE + 10);
    }

    #[test]
    fn unwrap_ties_prefer_lower() {
        let isn = SeqNumber(0);
        let half = SeqNumber(1 << 31);
        assert_eq!(half.unwrap(isn, CYCLE), CYCLE - (1 << 31));
        assert_eq!(half.unwrap(isn, 0), 1 << 31);
        assert_eq!(SeqNumber(0).unwrap(isn, 1 << 31), 0);
    }

    #[test]
    fn unwrap_is_closest() {
        let zero_points = [0, 1, 1 << 31, u32::max_value()];
        let checkpoints = [0, 1, CYCLE - 1, CYCLE, 7 * CYCLE + 12345, u64::max_value() - CYCLE];
        let offsets: [i64; 5] = [0, 1, -1, (1 << 31) - 1, -(1 << 31) + 1];
        for &zero in &zero_points {
            for &checkpoint in &checkpoints {
                for &offset in &offsets {
                    let absolute = checkpoint as i128 + i128::from(offset);
                    if absolute < 0 {
                        continue;
                    }
                    let absolute = absolute as u64;
                    let seq = SeqNumber::wrap(absolute, SeqNumber(zero));
                    assert_eq!(seq.unwrap(SeqNumber(zero), checkpoint), absolute,
                        "zero={} checkpoint={} offset={}", zero, checkpoint, offset);
                }
            }
        }
    }

    #[test]
    fn arithmetic() {
        let seq = SeqNumber(u32::max_value());
        assert_eq!(seq + 2, SeqNumber(1));
        assert_eq!(SeqNumber(1) - seq, 2);
        assert_eq!(seq - SeqNumber(1), -2);
        assert!(seq < SeqNumber(1));
        assert_eq!(u32::from(SeqNumber::from(7)), 7);
        assert_eq!(format!("{}", seq), "4294967295");
    }
}
