//! Responsive image sets and blur-up pairs.
//!
//! Both are thin loops over [`UrlComposer::compose`]:
//!
//! - [`ResponsiveBuilder::srcset`] composes one URL per target width and
//!   joins them into an HTML `srcset` descriptor.
//! - [`ResponsiveBuilder::progressive`] composes a tiny, low-quality,
//!   blurred placeholder and the full-resolution URL from the same reference.
//!
//! ```text
//! https://cdn/w-400,f-webp/a.jpg 400w, https://cdn/w-800,f-webp/a.jpg 800w
//! ```

use crate::compose::UrlComposer;
use crate::config::{ImageConfig, PlaceholderConfig};
use crate::transform::{Format, TransformationRequest};
use serde::Serialize;

/// Widths used when no width list is configured.
pub const DEFAULT_WIDTHS: [u32; 4] = [400, 800, 1200, 1600];

/// One `srcset` candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsiveEntry {
    pub width: u32,
    pub url: String,
}

/// Width-indexed URLs for one image.
///
/// Entries keep the order of the requested widths. Consumers pick by width
/// (see [`ResponsiveSet::best_for`]), never by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponsiveSet {
    pub entries: Vec<ResponsiveEntry>,
}

impl ResponsiveSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `"{url} {w}w, {url} {w}w"`. Empty set → empty string.
    pub fn descriptor(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{} {}w", e.url, e.width))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Smallest entry at least `viewport_width` wide, or the widest entry.
    pub fn best_for(&self, viewport_width: u32) -> Option<&ResponsiveEntry> {
        self.entries
            .iter()
            .filter(|e| e.width >= viewport_width)
            .min_by_key(|e| e.width)
            .or_else(|| self.entries.iter().max_by_key(|e| e.width))
    }
}

/// Placeholder and full-resolution URLs for one reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressivePair {
    pub placeholder: String,
    pub full: String,
}

impl ProgressivePair {
    pub fn is_empty(&self) -> bool {
        self.placeholder.is_empty() && self.full.is_empty()
    }
}

/// Builds [`ResponsiveSet`]s and [`ProgressivePair`]s on top of a composer.
#[derive(Debug, Clone)]
pub struct ResponsiveBuilder {
    composer: UrlComposer,
    widths: Vec<u32>,
    format: Format,
    placeholder: PlaceholderConfig,
}

/// `base.height` rescaled to `width`, rounded to the nearest pixel.
fn scaled_height(base: &TransformationRequest, width: u32) -> Option<u32> {
    let height = base.height.filter(|&h| h > 0)?;
    let base_width = base.width.filter(|&w| w > 0)?;
    let (h, w, bw) = (u64::from(height), u64::from(width), u64::from(base_width));
    let scaled = (h * w + bw / 2) / bw;
    Some(u32::try_from(scaled).unwrap_or(u32::MAX).max(1))
}

impl ResponsiveBuilder {
    pub fn new(composer: UrlComposer) -> Self {
        Self {
            composer,
            widths: DEFAULT_WIDTHS.to_vec(),
            format: Format::WebP,
            placeholder: PlaceholderConfig::default(),
        }
    }

    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            composer: UrlComposer::from_config(config),
            widths: config.responsive.widths.clone(),
            format: config.responsive.format.clone(),
            placeholder: config.placeholder.clone(),
        }
    }

    pub fn with_widths(mut self, widths: &[u32]) -> Self {
        self.widths = widths.to_vec();
        self
    }

    pub fn with_placeholder(mut self, placeholder: PlaceholderConfig) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn composer(&self) -> &UrlComposer {
        &self.composer
    }

    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    /// Srcset over the configured widths.
    pub fn default_srcset(&self, reference: &str, base: &TransformationRequest) -> ResponsiveSet {
        self.srcset(reference, &self.widths, base)
    }

    /// One composed URL per positive width in `widths`.
    ///
    /// `base` supplies every field except width; its format wins over the
    /// builder's default format when set. A base height is scaled with each
    /// width so every candidate keeps the base aspect ratio, and dropped when
    /// the base has no width to scale from. Zero widths are skipped.
    pub fn srcset(
        &self,
        reference: &str,
        widths: &[u32],
        base: &TransformationRequest,
    ) -> ResponsiveSet {
        if reference.trim().is_empty() {
            return ResponsiveSet::default();
        }

        let mut request = base.clone();
        if request.format.is_none() {
            request.format = Some(self.format.clone());
        }

        let entries = widths
            .iter()
            .filter(|&&w| w > 0)
            .map(|&width| {
                let sized = TransformationRequest {
                    width: Some(width),
                    height: scaled_height(base, width),
                    ..request.clone()
                };
                ResponsiveEntry {
                    width,
                    url: self.composer.compose(reference, &sized),
                }
            })
            .collect();

        ResponsiveSet { entries }
    }

    /// The placeholder request derived from config, keeping the caller's format.
    fn placeholder_request(&self, full: &TransformationRequest) -> TransformationRequest {
        let mut request = TransformationRequest::new()
            .with_width(self.placeholder.width)
            .with_quality(self.placeholder.quality)
            .with_blur(self.placeholder.blur);
        request.format = full.format.clone();
        request
    }

    /// Placeholder at the configured small width/low quality, and `full` as given.
    pub fn progressive(&self, reference: &str, full: &TransformationRequest) -> ProgressivePair {
        ProgressivePair {
            placeholder: self
                .composer
                .compose(reference, &self.placeholder_request(full)),
            full: self.composer.compose(reference, full),
        }
    }
}
