use crate::storage::Expiring;
use crate::time::{Duration, Instant};
use crate::wire::{EthernetAddress, Ipv4Address};

/// A neighbor cache.
///
/// Maps the protocol address of a neighbor to its hardware address. Every mapping is dropped a
/// fixed lifetime after it was last learned, whether or not it was used in between.
///
/// ```rust
/// use minnow::layer::arp::NeighborCache;
/// use minnow::time::Instant;
/// use minnow::wire::{EthernetAddress, Ipv4Address};
///
/// let mut cache = NeighborCache::new();
/// let host = Ipv4Address::new(10, 0, 0, 2);
/// cache.fill(host, EthernetAddress([2, 0, 0, 0, 0, 2]), Instant::from_millis(0));
/// assert!(cache.lookup(host).is_some());
///
/// cache.evict(Instant::from_millis(30_000));
/// assert!(cache.lookup(host).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Cache {
    entries: Expiring<Ipv4Address, EthernetAddress>,
    lifetime: Duration,
}

/// Outstanding address requests.
///
/// While an entry for an address exists no further request for it should be sent. Entries are
/// not removed when the address is resolved, they only time out.
#[derive(Clone, Debug)]
pub struct RequestTimers {
    entries: Expiring<Ipv4Address, ()>,
    silent_time: Duration,
}

impl Cache {
    /// Neighbor entry lifetime.
    pub const ENTRY_LIFETIME: Duration = Duration::from_millis(30_000);

    /// Create an empty cache with the default entry lifetime.
    pub fn new() -> Self {
        Cache::with_lifetime(Self::ENTRY_LIFETIME)
    }

    /// Create an empty cache whose entries live for `lifetime`.
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Cache {
            entries: Expiring::new(),
            lifetime,
        }
    }

    /// Add or refresh a mapping learned at `now`.
    ///
    /// Returns the hardware address previously mapped, if any.
    pub fn fill(
        &mut self,
        protocol_addr: Ipv4Address,
        hardware_addr: EthernetAddress,
        now: Instant,
    ) -> Option<EthernetAddress> {
        self.entries.insert(protocol_addr, hardware_addr, now, self.lifetime)
    }

    /// Find the hardware address of a neighbor.
    pub fn lookup(&self, protocol_addr: Ipv4Address) -> Option<EthernetAddress> {
        self.entries.get(&protocol_addr).copied()
    }

    /// Remove all mappings that have reached their lifetime at `now`.
    pub fn evict(&mut self, now: Instant) -> usize {
        self.entries.evict(now)
    }

    /// The lifetime of new entries.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// The number of cached neighbors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no neighbor is known.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RequestTimers {
    /// Minimum delay between requests for the same address.
    pub const SILENT_TIME: Duration = Duration::from_millis(5_000);

    /// Create an empty set with the default silent time.
    pub fn new() -> Self {
        RequestTimers::with_silent_time(Self::SILENT_TIME)
    }

    /// Create an empty set that stays silent for `silent_time` after each request.
    pub fn with_silent_time(silent_time: Duration) -> Self {
        RequestTimers {
            entries: Expiring::new(),
            silent_time,
        }
    }

    /// Record that a request for `protocol_addr` was sent at `now`.
    pub fn requested(&mut self, protocol_addr: Ipv4Address, now: Instant) {
        self.entries.insert(protocol_addr, (), now, self.silent_time);
    }

    /// Whether a request for the address was sent within the silent time.
    pub fn is_requesting(&self, protocol_addr: Ipv4Address) -> bool {
        self.entries.contains(&protocol_addr)
    }

    /// Forget all requests whose silent time has passed at `now`.
    pub fn evict(&mut self, now: Instant) -> usize {
        self.entries.evict(now)
    }

    /// The number of outstanding requests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no outstanding requests.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Cache {
    fn default() -> Self {
        Cache::new()
    }
}

impl Default for RequestTimers {
    fn default() -> Self {
        RequestTimers::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const IP_ADDR_1: Ipv4Address = Ipv4Address::new(10, 0, 0, 1);
    const IP_ADDR_2: Ipv4Address = Ipv4Address::new(10, 0, 0, 2);

    const HADDR_A: EthernetAddress = EthernetAddress([0, 0, 0, 0, 0, 1]);
    const HADDR_B: EthernetAddress = EthernetAddress([0, 0, 0, 0, 0, 2]);

    #[test]
    fn fill() {
        let mut cache = Cache::new();

        assert_eq!(cache.lookup(IP_ADDR_1), None);
        assert_eq!(cache.fill(IP_ADDR_1, HADDR_A, Instant::from_millis(0)), None);
        assert_eq!(cache.lookup(IP_ADDR_1), Some(HADDR_A));
        assert_eq!(cache.lookup(IP_ADDR_2), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expire() {
        let mut cache = Cache::new();
        cache.fill(IP_ADDR_1, HADDR_A, Instant::from_millis(0));

        assert_eq!(cache.evict(Instant::from_millis(0) + Cache::ENTRY_LIFETIME - Duration::from_millis(1)), 0);
        assert_eq!(cache.lookup(IP_ADDR_1), Some(HADDR_A));
        assert_eq!(cache.evict(Instant::from_millis(0) + Cache::ENTRY_LIFETIME), 1);
        assert_eq!(cache.lookup(IP_ADDR_1), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn replace() {
        let mut cache = Cache::new();

        cache.fill(IP_ADDR_1, HADDR_A, Instant::from_millis(0));
        assert_eq!(cache.fill(IP_ADDR_1, HADDR_B, Instant::from_millis(10_000)), Some(HADDR_A));
        assert_eq!(cache.lookup(IP_ADDR_1), Some(HADDR_B));

        // The refresh moved the deadline.
        assert_eq!(cache.evict(Instant::from_millis(30_000)), 0);
        assert_eq!(cache.evict(Instant::from_millis(40_000)), 1);
    }

    #[test]
    fn custom_lifetime() {
        let mut cache = Cache::with_lifetime(Duration::from_millis(100));
        cache.fill(IP_ADDR_1, HADDR_A, Instant::from_millis(0));
        assert_eq!(cache.lifetime(), Duration::from_millis(100));
        assert_eq!(cache.evict(Instant::from_millis(100)), 1);
    }

    #[test]
    fn requests_time_out() {
        let mut timers = RequestTimers::new();
        assert!(!timers.is_requesting(IP_ADDR_1));

        timers.requested(IP_ADDR_1, Instant::from_millis(1_000));
        timers.requested(IP_ADDR_2, Instant::from_millis(3_000));
        assert!(timers.is_requesting(IP_ADDR_1));

        assert_eq!(timers.evict(Instant::from_millis(5_999)), 0);
        assert_eq!(timers.evict(Instant::from_millis(6_000)), 1);
        assert!(!timers.is_requesting(IP_ADDR_1));
        assert!(timers.is_requesting(IP_ADDR_2));
        assert_eq!(timers.len(), 1);
    }
}
