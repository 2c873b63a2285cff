//! HTML markup for storefront images.
//!
//! One parameterised renderer serves every image variant; the [`Preset`]
//! decides the transformation, widths, `sizes` and loading mode.
//!
//! - [`ImageRenderer::img`]: plain `<img>` with `srcset`
//! - [`ImageRenderer::picture`]: `<picture>` with AVIF and WebP sources
//! - [`ImageRenderer::lazy`]: a [`LazyImage`] wired with the blur-up pair
//!
//! Markup is generated with [maud](https://maud.lambda.xyz/), so every
//! interpolated URL and alt text is escaped.

use crate::config::{ImageConfig, LoaderConfig};
use crate::loader::{ElementId, LazyImage};
use crate::preset::Preset;
use crate::responsive::{ResponsiveBuilder, ResponsiveSet};
use crate::transform::{Format, TransformationRequest};
use maud::{Markup, html};

/// Renders image markup for one configured origin.
#[derive(Debug, Clone)]
pub struct ImageRenderer {
    builder: ResponsiveBuilder,
    default_quality: u32,
    loader: LoaderConfig,
}

impl ImageRenderer {
    pub fn from_config(config: &ImageConfig) -> Self {
        Self {
            builder: ResponsiveBuilder::from_config(config),
            default_quality: config.delivery.default_quality,
            loader: config.loader.clone(),
        }
    }

    pub fn builder(&self) -> &ResponsiveBuilder {
        &self.builder
    }

    /// The preset's base request with the configured default quality.
    pub fn request(&self, preset: Preset) -> TransformationRequest {
        preset.request(self.default_quality)
    }

    fn srcset(&self, reference: &str, preset: Preset, base: &TransformationRequest) -> ResponsiveSet {
        let widths = preset.widths().unwrap_or(self.builder.widths());
        self.builder.srcset(reference, widths, base)
    }

    /// `<img>` with `src`, `srcset` and `sizes`. Empty reference → no markup.
    pub fn img(&self, reference: &str, preset: Preset, alt: &str) -> Markup {
        let request = self.request(preset);
        let src = self.builder.composer().compose(reference, &request);
        if src.is_empty() {
            return html! {};
        }
        let srcset = self.srcset(reference, preset, &request).descriptor();
        let loading = if preset.lazy() { "lazy" } else { "eager" };
        let srcset_attr = (!srcset.is_empty()).then_some(srcset.as_str());
        let sizes_attr = srcset_attr.map(|_| preset.sizes());
        html! {
            img src=(src)
                srcset=[srcset_attr]
                sizes=[sizes_attr]
                width=[request.width]
                height=[request.height]
                alt=(alt)
                loading=(loading)
                decoding="async";
        }
    }

    /// `<picture>` with AVIF and WebP sources and a fallback `<img>`.
    pub fn picture(&self, reference: &str, preset: Preset, alt: &str) -> Markup {
        let request = self.request(preset);
        let src = self.builder.composer().compose(reference, &request);
        if src.is_empty() {
            return html! {};
        }
        let avif = TransformationRequest {
            format: Some(Format::Avif),
            ..request.clone()
        };
        let webp = TransformationRequest {
            format: Some(Format::WebP),
            ..request.clone()
        };
        let srcset_avif = self.srcset(reference, preset, &avif).descriptor();
        let srcset_webp = self.srcset(reference, preset, &webp).descriptor();
        let loading = if preset.lazy() { "lazy" } else { "eager" };
        html! {
            picture {
                @if !srcset_avif.is_empty() {
                    source type="image/avif" srcset=(srcset_avif) sizes=(preset.sizes());
                }
                @if !srcset_webp.is_empty() {
                    source type="image/webp" srcset=(srcset_webp) sizes=(preset.sizes());
                }
                img src=(src) alt=(alt) loading=(loading) decoding="async";
            }
        }
    }

    /// A lazy image for `reference`. Eager presets start in `InView`.
    ///
    /// The caller mounts it against its observer.
    pub fn lazy(&self, element: ElementId, reference: &str, preset: Preset, alt: &str) -> LazyImage {
        let request = self.request(preset);
        let pair = self.builder.progressive(reference, &request);
        let srcset = self.srcset(reference, preset, &request).descriptor();
        let mut image = LazyImage::new(element, pair, &self.loader)
            .with_alt(alt)
            .with_srcset(srcset, preset.sizes());
        if !preset.lazy() && !image.pair().full.is_empty() {
            image.load_eagerly();
        }
        image
    }
}
