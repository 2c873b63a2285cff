//! Transformation request types.
//!
//! These types describe *what* the CDN should do to an image, not *how* a
//! provider spells it. Spelling is the job of [`encode`](crate::transform::encode()).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100). Clamped on construction.
//! - [`Format`]: Output format. `jpg` parses to [`Format::Jpeg`].
//! - [`Fit`]: How the image is resized into the requested box.
//! - [`Gravity`]: Focus point for crops.
//! - [`TransformationRequest`]: The full, all-optional request.
//!
//! The enums carry an `Other` variant: spellings we do not recognise are
//! kept verbatim and forwarded to the provider, which is trusted to reject
//! what it does not understand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

impl From<u32> for Quality {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u32 {
    fn from(q: Quality) -> Self {
        q.0
    }
}

/// Defines a string-backed enum with a verbatim `Other` fallback.
///
/// Each variant lists its canonical spelling first, then accepted aliases.
macro_rules! passthrough_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $canonical:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Unrecognised value, forwarded verbatim.
            Other(String),
        }

        impl $name {
            /// Canonical spelling, or the verbatim value for `Other`.
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $canonical, )+
                    $name::Other(value) => value,
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value.trim().to_ascii_lowercase().as_str() {
                    $( $canonical $(| $alias)* => $name::$variant, )+
                    _ => $name::Other(value.trim().to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name::from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name::from(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

passthrough_enum! {
    /// Output image format.
    Format {
        WebP => "webp",
        Jpeg => "jpeg" | "jpg",
        Png => "png",
        Avif => "avif",
        /// Let the CDN negotiate from the `Accept` header.
        Auto => "auto",
    }
}

passthrough_enum! {
    /// How the image is fitted into the requested width/height box.
    Fit {
        /// Shrink to fit, never enlarge.
        ScaleDown => "scale-down" | "scale_down",
        /// Fit entirely inside the box, preserving aspect ratio.
        Contain => "contain",
        /// Fill the box, cropping overflow.
        Cover => "cover",
        /// Fill the box exactly, cropping as needed.
        Crop => "crop",
        /// Fit inside the box and pad the remainder.
        Pad => "pad",
    }
}

passthrough_enum! {
    /// Focus point used when the fit mode crops.
    Gravity {
        Auto => "auto",
        Center => "center" | "centre",
        Face => "face",
        Top => "top",
        Bottom => "bottom",
        Left => "left",
        Right => "right",
        Side => "side",
    }
}

/// A requested set of transformations. Every field is optional.
///
/// Absent fields are never filled in silently; callers that want a
/// baseline quality merge a preset underneath (see [`crate::preset`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<Fit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<Gravity>,
    /// Gaussian blur radius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<u32>,
}

impl TransformationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero is treated as "not set".
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = (width > 0).then_some(width);
        self
    }

    /// Zero is treated as "not set".
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = (height > 0).then_some(height);
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(Quality::new(quality));
        self
    }

    pub fn with_format(mut self, format: impl Into<Format>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_fit(mut self, fit: impl Into<Fit>) -> Self {
        self.fit = Some(fit.into());
        self
    }

    pub fn with_gravity(mut self, gravity: impl Into<Gravity>) -> Self {
        self.gravity = Some(gravity.into());
        self
    }

    /// Zero is treated as "not set".
    pub fn with_blur(mut self, radius: u32) -> Self {
        self.blur = (radius > 0).then_some(radius);
        self
    }

    /// True when no field would be emitted by the encoder.
    pub fn is_empty(&self) -> bool {
        self.width.is_none_or(|w| w == 0)
            && self.height.is_none_or(|h| h == 0)
            && self.quality.is_none()
            && self.format.is_none()
            && self.fit.is_none()
            && self.gravity.is_none()
            && self.blur.is_none_or(|b| b == 0)
    }

    /// Layer `overlay` on top of `self`: fields set in the overlay win.
    pub fn merge(&self, overlay: &TransformationRequest) -> TransformationRequest {
        TransformationRequest {
            width: overlay.width.or(self.width),
            height: overlay.height.or(self.height),
            quality: overlay.quality.or(self.quality),
            format: overlay.format.clone().or_else(|| self.format.clone()),
            fit: overlay.fit.clone().or_else(|| self.fit.clone()),
            gravity: overlay.gravity.clone().or_else(|| self.gravity.clone()),
            blur: overlay.blur.or(self.blur),
        }
    }
}
