//! Provider-specific spelling of a [`TransformationRequest`].
//!
//! Three spellings are in use across the storefront's image providers:
//!
//! | Convention | Example |
//! |---|---|
//! | [`Convention::PathSegment`] | `w-400,h-400,q-80,f-webp` |
//! | [`Convention::QueryString`] | `width=400&height=400&quality=80&format=webp` |
//! | [`Convention::ProxyOptions`] | `width=400,height=400,quality=80,format=webp` |
//!
//! Field order is fixed (width, height, quality, format, fit, gravity, blur)
//! so identical requests always produce byte-identical output. Generated
//! URLs double as CDN cache keys.

use super::params::{Fit, TransformationRequest};
use serde::{Deserialize, Serialize};

/// How transformation parameters are written into a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Convention {
    /// Comma-joined `key-value` tokens used as a path segment.
    #[default]
    PathSegment,
    /// `key=value` pairs appended as URL query parameters.
    QueryString,
    /// Comma-joined `key=value` options behind a resizing proxy route.
    ProxyOptions,
}

impl Convention {
    fn separator(self) -> &'static str {
        match self {
            Convention::QueryString => "&",
            Convention::PathSegment | Convention::ProxyOptions => ",",
        }
    }

    fn pair(self, long: &str, short: &str, value: &str) -> String {
        match self {
            Convention::PathSegment => format!("{short}-{value}"),
            Convention::QueryString => format!("{long}={}", urlencoding::encode(value)),
            Convention::ProxyOptions => format!("{long}={value}"),
        }
    }
}

/// Path-segment providers name crop modes differently.
fn path_segment_fit(fit: &Fit) -> &str {
    match fit {
        Fit::ScaleDown | Fit::Contain => "at_max",
        Fit::Cover => "maintain_ratio",
        Fit::Crop => "force",
        Fit::Pad => "pad_resize",
        Fit::Other(value) => value,
    }
}

fn fit_value(fit: &Fit, convention: Convention) -> &str {
    match convention {
        Convention::PathSegment => path_segment_fit(fit),
        Convention::QueryString | Convention::ProxyOptions => fit.as_str(),
    }
}

/// Encode a request for the given convention.
///
/// Returns an empty string when the request sets nothing.
pub fn encode(request: &TransformationRequest, convention: Convention) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(7);

    if let Some(width) = request.width.filter(|w| *w > 0) {
        parts.push(convention.pair("width", "w", &width.to_string()));
    }
    if let Some(height) = request.height.filter(|h| *h > 0) {
        parts.push(convention.pair("height", "h", &height.to_string()));
    }
    if let Some(quality) = request.quality {
        parts.push(convention.pair("quality", "q", &quality.value().to_string()));
    }
    if let Some(format) = &request.format {
        parts.push(convention.pair("format", "f", format.as_str()));
    }
    if let Some(fit) = &request.fit {
        parts.push(convention.pair("fit", "c", fit_value(fit, convention)));
    }
    if let Some(gravity) = &request.gravity {
        parts.push(convention.pair("gravity", "fo", gravity.as_str()));
    }
    if let Some(blur) = request.blur.filter(|b| *b > 0) {
        parts.push(convention.pair("blur", "bl", &blur.to_string()));
    }

    parts.join(convention.separator())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> TransformationRequest {
        TransformationRequest::new()
            .with_width(400)
            .with_height(400)
            .with_quality(80)
            .with_format("webp")
            .with_fit("cover")
            .with_gravity("face")
            .with_blur(10)
    }

    #[test]
    fn empty_request_encodes_to_empty_string() {
        let req = TransformationRequest::new();
        assert_eq!(encode(&req, Convention::PathSegment), "");
        assert_eq!(encode(&req, Convention::QueryString), "");
        assert_eq!(encode(&req, Convention::ProxyOptions), "");
    }

    #[test]
    fn path_segment_canonical_order() {
        assert_eq!(
            encode(&full_request(), Convention::PathSegment),
            "w-400,h-400,q-80,f-webp,c-maintain_ratio,fo-face,bl-10"
        );
    }

    #[test]
    fn query_string_canonical_order() {
        assert_eq!(
            encode(&full_request(), Convention::QueryString),
            "width=400&height=400&quality=80&format=webp&fit=cover&gravity=face&blur=10"
        );
    }

    #[test]
    fn proxy_options_canonical_order() {
        assert_eq!(
            encode(&full_request(), Convention::ProxyOptions),
            "width=400,height=400,quality=80,format=webp,fit=cover,gravity=face,blur=10"
        );
    }

    #[test]
    fn order_does_not_depend_on_builder_order() {
        let a = TransformationRequest::new()
            .with_format("webp")
            .with_quality(80)
            .with_width(400);
        let b = TransformationRequest::new()
            .with_width(400)
            .with_quality(80)
            .with_format("webp");
        assert_eq!(
            encode(&a, Convention::PathSegment),
            encode(&b, Convention::PathSegment)
        );
        assert_eq!(encode(&a, Convention::PathSegment), "w-400,q-80,f-webp");
    }

    #[test]
    fn path_segment_fit_names() {
        let enc = |fit: &str| encode(&TransformationRequest::new().with_fit(fit), Convention::PathSegment);
        assert_eq!(enc("scale-down"), "c-at_max");
        assert_eq!(enc("contain"), "c-at_max");
        assert_eq!(enc("crop"), "c-force");
        assert_eq!(enc("pad"), "c-pad_resize");
        assert_eq!(enc("at_least"), "c-at_least");
    }

    #[test]
    fn unknown_values_are_forwarded() {
        let req = TransformationRequest::new()
            .with_format("heic")
            .with_gravity("north_east");
        assert_eq!(encode(&req, Convention::PathSegment), "f-heic,fo-north_east");
        assert_eq!(encode(&req, Convention::QueryString), "format=heic&gravity=north_east");
    }

    #[test]
    fn query_string_values_are_percent_encoded() {
        let req = TransformationRequest::new().with_fit("a&b");
        assert_eq!(encode(&req, Convention::QueryString), "fit=a%26b");
    }
}
