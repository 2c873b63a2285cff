//! # vedha-image
//!
//! Image delivery for the VedhaTrendz storefront. Product, banner and review
//! images are stored as plain references and served through an image CDN
//! that resizes and re-encodes on the fly; this crate decides which URL to
//! ask for and when.
//!
//! # Pipeline
//!
//! ```text
//! reference ──▶ normalize ──▶ encode ──▶ compose ──▶ URL
//!                                           │
//!                        srcset / blur-up ◀─┘──▶ LazyImage ──▶ markup
//! ```
//!
//! Everything up to the URL is a pure function of (reference, request,
//! config): no network calls, no caching, no shared state. The same inputs
//! always produce the same bytes, which keeps CDN cache keys stable.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`reference`] | Canonical form for stored references (absolute URL vs storage key) |
//! | [`transform`] | Transformation requests and their provider encodings |
//! | [`compose`] | [`UrlComposer`](compose::UrlComposer): origin + transform + key → URL |
//! | [`responsive`] | `srcset` descriptors and blur-up placeholder/full pairs |
//! | [`preset`] | Named image variants (thumbnail, product card, gallery, ...) |
//! | [`loader`] | Viewport-gated lazy loading state machine and observer seam |
//! | [`render`] | Maud markup for `<img>`, `<picture>` and lazy images |
//! | [`config`] | `vedha-image.toml` loading, validation, merging, env overrides |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Composer, Three Spellings
//!
//! The storefront talks to providers that spell transformations as a path
//! segment (`/w-400,q-80/`), as query parameters (`?width=400&quality=80`),
//! or as options behind a resizing proxy route (`/cdn-cgi/image/width=400/`).
//! The spelling is a [`Convention`](transform::Convention) picked once in
//! config; call sites never branch on provider.
//!
//! ## Explicit Configuration
//!
//! Origins come from an [`ImageConfig`](config::ImageConfig) handed to the
//! composer at construction. Environment variables are read only by the
//! binary, so tests pin a fixed origin instead of patching process state.
//!
//! ## Degrade, Don't Fail
//!
//! URL operations never return errors. An empty reference yields an empty
//! string, an unset origin yields a relative URL, and an unknown format or
//! fit value is forwarded to the provider verbatim.
//!
//! ## Lazy Loading Owns Its Observation
//!
//! A [`LazyImage`](loader::LazyImage) holds its visibility registration as a
//! guard. Leaving `Pending` (visible, eager, failed) or dropping the image
//! releases it, so no exit path leaks an observer. Load failures end in an
//! explicit `Failed` state that swaps in a fallback asset.

pub mod compose;
pub mod config;
pub mod loader;
pub mod output;
pub mod preset;
pub mod reference;
pub mod render;
pub mod responsive;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_helpers;
