//! Address resolution state.
//!
//! As noted in RFC 826, arp assumes that at least the mapping and identities of the own host are
//! fully known to the resolver. What it learns about others is kept in a [`NeighborCache`] for a
//! limited time, and the [`RequestTimers`] rate limit the requests for addresses still unknown.
//! Both are independent stores that age out on their own.
//!
//! [`NeighborCache`]: struct.NeighborCache.html
//! [`RequestTimers`]: struct.RequestTimers.html
mod neighbor;

pub use neighbor::{
    Cache as NeighborCache,
    RequestTimers,
};
