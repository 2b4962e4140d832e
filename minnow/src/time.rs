/*! Simulated time.

Nothing in this crate reads a clock. The owner of an [`Interface`] advances its notion of time
explicitly with `tick`, and that is the only source of instants. Lengths of time are plain
[`Duration`]s.

[`Interface`]: ../layer/eth/struct.Interface.html
[`Duration`]: https://doc.rust-lang.org/core/time/struct.Duration.html
*/
use core::{convert::TryFrom, fmt, ops};
pub use core::time::Duration;

/// A point in time, in milliseconds since the interface came up.
///
/// Arithmetic with a [`Duration`] saturates instead of wrapping around.
///
/// [`Duration`]: https://doc.rust-lang.org/core/time/struct.Duration.html
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Instant {
    millis: u64,
}

impl Instant {
    /// The moment an interface starts at.
    pub const ZERO: Instant = Instant { millis: 0 };

    pub const fn from_millis(millis: u64) -> Instant {
        Instant { millis }
    }

    pub fn total_millis(&self) -> u64 {
        self.millis
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:03}s", self.millis / 1000, self.millis % 1000)
    }
}

fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::max_value())
}

impl ops::Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant::from_millis(self.millis.saturating_add(whole_millis(rhs)))
    }
}

impl ops::AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl ops::Sub<Duration> for Instant {
    type Output = Instant;

    fn sub(self, rhs: Duration) -> Instant {
        Instant::from_millis(self.millis.saturating_sub(whole_millis(rhs)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn arithmetic() {
        let mut now = Instant::from_millis(4) + Duration::from_millis(6);
        assert_eq!(now, Instant::from_millis(10));
        now += Duration::from_secs(2);
        assert_eq!(now.total_millis(), 2_010);
        assert_eq!(now - Duration::from_millis(10), Instant::from_millis(2_000));
    }

    #[test]
    fn sub_millisecond_durations_are_dropped() {
        assert_eq!(Instant::ZERO + Duration::from_micros(999), Instant::ZERO);
    }

    #[test]
    fn saturates() {
        let end = Instant::from_millis(u64::max_value() - 1);
        assert_eq!(end + Duration::from_secs(u64::max_value()), Instant::from_millis(u64::max_value()));
        assert_eq!(Instant::from_millis(5) - Duration::from_millis(10), Instant::ZERO);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Instant::from_millis(5_674)), "5.674s");
        assert_eq!(format!("{}", Instant::from_millis(42)), "0.042s");
    }
}
