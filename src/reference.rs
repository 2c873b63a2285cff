//! Canonical form for stored image references.
//!
//! Product documents store images either as absolute URLs (uploaded through
//! the CDN dashboard, or copied from a supplier) or as bare storage keys
//! written by the admin uploader. Both shapes flow through [`normalize`]
//! before any URL is composed, so the composer only ever sees one of three
//! cases.
//!
//! ## Absolute URLs
//!
//! Two consumers disagree about absolute URLs, so the policy is chosen by
//! the caller:
//! - [`AbsolutePolicy::PassThrough`]: the URL is already final and is kept
//!   byte-for-byte.
//! - [`AbsolutePolicy::StripOrigin`]: scheme and host are dropped and the
//!   path is rebased onto the configured origin.
//!
//! ## Keys
//!
//! - `"/products/abc.jpg"` → `"products/abc.jpg"`
//! - `"products//2024///abc.jpg"` → `"products/2024/abc.jpg"`
//! - `"//products/abc.jpg"` → `"products/abc.jpg"`
//! - `"///"` → empty
//! - `""` → empty

use serde::{Deserialize, Serialize};

/// How absolute `http(s)` references are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbsolutePolicy {
    /// Keep absolute URLs unchanged.
    #[default]
    PassThrough,
    /// Drop scheme and host, keep path + query as a storage key.
    StripOrigin,
}

/// Result of normalizing an image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedRef {
    /// Empty or blank input. Composes to an empty string.
    Empty,
    /// Absolute URL kept as-is under [`AbsolutePolicy::PassThrough`].
    Absolute(String),
    /// Relative storage key, no leading slash, no repeated slashes.
    Key(String),
}

impl NormalizedRef {
    pub fn as_str(&self) -> &str {
        match self {
            NormalizedRef::Empty => "",
            NormalizedRef::Absolute(url) => url,
            NormalizedRef::Key(key) => key,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, NormalizedRef::Empty)
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self, NormalizedRef::Absolute(_))
    }
}

/// Length of the `http://` / `https://` scheme prefix, if present.
///
/// Matched case-insensitively. A bare leading `//` is not a scheme: it is
/// a key with extra slashes.
fn scheme_len(reference: &str) -> Option<usize> {
    let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    if lower.starts_with("https://") {
        Some(8)
    } else if lower.starts_with("http://") {
        Some(7)
    } else {
        None
    }
}

/// Normalize a stored image reference.
///
/// Never fails: blank input yields [`NormalizedRef::Empty`] and anything
/// without a recognisable scheme is treated as a key.
pub fn normalize(reference: &str, policy: AbsolutePolicy) -> NormalizedRef {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return NormalizedRef::Empty;
    }

    match scheme_len(trimmed) {
        Some(len) => match policy {
            AbsolutePolicy::PassThrough => NormalizedRef::Absolute(trimmed.to_string()),
            AbsolutePolicy::StripOrigin => {
                let after_scheme = &trimmed[len..];
                // Host ends at the first '/', '?' or '#'.
                let path = after_scheme
                    .find(['/', '?', '#'])
                    .map(|pos| &after_scheme[pos..])
                    .unwrap_or("");
                normalize_key(path)
            }
        },
        None => normalize_key(trimmed),
    }
}

/// Strip leading slashes and collapse repeated slashes in the path part.
///
/// The query string and fragment are left untouched.
fn normalize_key(raw: &str) -> NormalizedRef {
    let (path, rest) = match raw.find(['?', '#']) {
        Some(pos) => raw.split_at(pos),
        None => (raw, ""),
    };

    let collapsed = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    // Keep the trailing slash of a directory-like key.
    let mut key = collapsed;
    if path.ends_with('/') && !key.is_empty() {
        key.push('/');
    }

    if key.is_empty() {
        return NormalizedRef::Empty;
    }
    key.push_str(rest);
    NormalizedRef::Key(key)
}
