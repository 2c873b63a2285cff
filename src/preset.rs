//! Named image variants used across the storefront.
//!
//! Thumbnails, product cards, the PDP gallery, hero banners and blur-up
//! tiles differ only in their transformation parameters, `srcset` widths and
//! `sizes` attribute. [`Preset`] carries those differences so a single
//! render path serves every variant.

use crate::transform::TransformationRequest;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Cart lines, order history, admin tables.
    Thumbnail,
    /// Category and search grid cards.
    ProductCard,
    /// Product detail page gallery.
    Gallery,
    /// Full-width home page banners.
    Banner,
    /// Small blurred tile used behind slow-loading content.
    BlurUp,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Thumbnail,
        Preset::ProductCard,
        Preset::Gallery,
        Preset::Banner,
        Preset::BlurUp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Thumbnail => "thumbnail",
            Preset::ProductCard => "product-card",
            Preset::Gallery => "gallery",
            Preset::Banner => "banner",
            Preset::BlurUp => "blur-up",
        }
    }

    /// Base transformation for this variant.
    ///
    /// `default_quality` fills in quality for variants that do not pin one.
    pub fn request(self, default_quality: u32) -> TransformationRequest {
        let request = match self {
            Preset::Thumbnail => TransformationRequest::new()
                .with_width(150)
                .with_height(150)
                .with_fit("cover")
                .with_gravity("auto"),
            Preset::ProductCard => TransformationRequest::new()
                .with_width(400)
                .with_height(533)
                .with_fit("cover")
                .with_gravity("center"),
            Preset::Gallery => TransformationRequest::new()
                .with_width(1200)
                .with_fit("contain")
                .with_quality(90),
            Preset::Banner => TransformationRequest::new()
                .with_width(1920)
                .with_height(600)
                .with_fit("cover")
                .with_gravity("center"),
            Preset::BlurUp => TransformationRequest::new()
                .with_width(50)
                .with_quality(20)
                .with_blur(10),
        };
        if request.quality.is_none() {
            request.with_quality(default_quality)
        } else {
            request
        }
    }

    /// Widths for this variant's `srcset`. `None` uses the configured widths.
    pub fn widths(self) -> Option<&'static [u32]> {
        match self {
            Preset::Thumbnail => Some(&[150, 300]),
            Preset::ProductCard => Some(&[300, 400, 600, 800]),
            Preset::Gallery => None,
            Preset::Banner => Some(&[800, 1200, 1920, 2560]),
            Preset::BlurUp => Some(&[]),
        }
    }

    /// The HTML `sizes` attribute.
    pub fn sizes(self) -> &'static str {
        match self {
            Preset::Thumbnail => "150px",
            Preset::ProductCard => "(max-width: 640px) 50vw, (max-width: 1024px) 33vw, 25vw",
            Preset::Gallery => "(max-width: 768px) 100vw, 60vw",
            Preset::Banner => "100vw",
            Preset::BlurUp => "50px",
        }
    }

    /// Above-the-fold variants load eagerly.
    pub fn lazy(self) -> bool {
        !matches!(self, Preset::Banner)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset '{0}' (expected one of: thumbnail, product-card, gallery, banner, blur-up)")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Convention, Quality, encode};

    #[test]
    fn parse_all_names() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>(), Ok(preset));
        }
        assert_eq!("Product_Card".parse::<Preset>(), Ok(Preset::ProductCard));
    }

    #[test]
    fn unknown_preset_is_error() {
        assert!(matches!("hero".parse::<Preset>(), Err(UnknownPreset(name)) if name == "hero"));
    }

    #[test]
    fn default_quality_fills_unpinned_presets() {
        assert_eq!(Preset::Thumbnail.request(75).quality, Some(Quality::new(75)));
        assert_eq!(Preset::Gallery.request(75).quality, Some(Quality::new(90)));
    }

    #[test]
    fn thumbnail_encoding() {
        assert_eq!(
            encode(&Preset::Thumbnail.request(80), Convention::PathSegment),
            "w-150,h-150,q-80,c-maintain_ratio,fo-auto"
        );
    }

    #[test]
    fn banner_is_eager() {
        assert!(!Preset::Banner.lazy());
        assert!(Preset::ProductCard.lazy());
    }

    #[test]
    fn serde_names_match_display() {
        for preset in Preset::ALL {
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{preset}\""));
        }
    }
}
