//! Static product data.
//!
//! Real and scene dimensions, display labels and marketing copy for each
//! product the viewer can show.

/// Product kinds, measurements and info lookups with the napkin fallback.
pub mod catalog;
