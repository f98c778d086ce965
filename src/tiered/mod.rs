//! Tiered Cache Module
//!
//! Coordinates lookups and promotion across an ordered set of caches.

mod cache;
mod view;

pub use cache::TieredCache;
pub use view::TierView;
