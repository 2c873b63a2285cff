//! URL composition: reference + transformations + origin → fetchable URL.
//!
//! [`UrlComposer`] is the single entry point the storefront uses to turn a
//! stored image reference into a URL. It is built from an explicit
//! [`ImageConfig`] (never from process environment) and is a pure function
//! of its inputs: no I/O, no caching, no interior state.
//!
//! ## URL Shapes
//!
//! ```text
//! path-segment    {origin}/{w-400,q-80,f-webp}/{key}
//! query-string    {origin}/{key}?width=400&quality=80&format=webp
//! proxy-options   {origin}{proxy}/{width=400,quality=80,format=webp}/{key}
//! absolute url    {origin}{proxy}/{width=400,quality=80,format=webp}/{absolute url}
//! ```
//!
//! An empty transformation never adds a separator: the bare
//! `{origin}/{key}` is returned, and an absolute URL comes back unchanged.

use crate::config::ImageConfig;
use crate::reference::{AbsolutePolicy, NormalizedRef, normalize};
use crate::transform::{Convention, TransformationRequest, encode};

/// Composes delivery URLs for one configured origin and provider convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlComposer {
    origin: String,
    convention: Convention,
    absolute: AbsolutePolicy,
    proxy_prefix: Option<String>,
}

impl UrlComposer {
    /// Build a composer from explicit settings.
    ///
    /// `origin` has trailing slashes trimmed. A blank `proxy_prefix`
    /// disables proxy wrapping of absolute URLs.
    pub fn new(
        origin: impl Into<String>,
        convention: Convention,
        absolute: AbsolutePolicy,
        proxy_prefix: Option<&str>,
    ) -> Self {
        let origin = origin.into();
        let proxy_prefix = proxy_prefix
            .map(|p| p.trim().trim_end_matches('/'))
            .filter(|p| !p.is_empty())
            .map(|p| {
                if p.starts_with('/') || p.contains("://") {
                    p.to_string()
                } else {
                    format!("/{p}")
                }
            });
        Self {
            origin: origin.trim().trim_end_matches('/').to_string(),
            convention,
            absolute,
            proxy_prefix,
        }
    }

    pub fn from_config(config: &ImageConfig) -> Self {
        Self::new(
            config.origin.resolve(),
            config.delivery.convention,
            config.delivery.absolute,
            Some(config.delivery.proxy_prefix.as_str()),
        )
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    pub fn absolute_policy(&self) -> AbsolutePolicy {
        self.absolute
    }

    /// Compose the URL for `reference` with `request` applied.
    ///
    /// Empty references yield an empty string.
    pub fn compose(&self, reference: &str, request: &TransformationRequest) -> String {
        match normalize(reference, self.absolute) {
            NormalizedRef::Empty => String::new(),
            NormalizedRef::Absolute(url) => self.compose_absolute(url, request),
            NormalizedRef::Key(key) => self.compose_key(&key, request),
        }
    }

    fn compose_key(&self, key: &str, request: &TransformationRequest) -> String {
        let segment = encode(request, self.convention);
        let url = if segment.is_empty() {
            format!("{}/{}", self.origin, key)
        } else {
            match self.convention {
                Convention::PathSegment => format!("{}/{}/{}", self.origin, segment, key),
                Convention::QueryString => {
                    // Parameters go before any fragment so they reach the CDN.
                    let (resource, fragment) = key.split_at(key.find('#').unwrap_or(key.len()));
                    let joiner = if resource.contains('?') { '&' } else { '?' };
                    format!("{}/{}{}{}{}", self.origin, resource, joiner, segment, fragment)
                }
                Convention::ProxyOptions => format!(
                    "{}{}/{}/{}",
                    self.origin,
                    self.proxy_prefix.as_deref().unwrap_or(""),
                    segment,
                    key
                ),
            }
        };
        tracing::trace!(key, %url, "composed key url");
        url
    }

    fn compose_absolute(&self, url: String, request: &TransformationRequest) -> String {
        if request.is_empty() {
            return url;
        }
        match &self.proxy_prefix {
            Some(prefix) => {
                let options = encode(request, Convention::ProxyOptions);
                format!("{}{}/{}/{}", self.origin, prefix, options, url)
            }
            None => {
                tracing::debug!(%url, "absolute url kept as-is: no proxy prefix configured");
                url
            }
        }
    }
}
