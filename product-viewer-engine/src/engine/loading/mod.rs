//! Texture loading for product surfaces.
//!
//! Every product starts with a generated placeholder; the real image is
//! fetched through the asset server and applied only if still relevant.

/// Placeholder painting, load queue and stale-completion filtering.
///
/// Completions carry a `TextureToken` checked against the displayed product.
pub mod texture_provider;
