//! Image delivery configuration.
//!
//! Handles loading, validating, and merging `vedha-image.toml`. Stock
//! defaults are the base layer; a user file overrides any subset of keys;
//! environment variables override the origins last.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [origin]
//! base_url = "https://ik.imagekit.io/vedhatrendz"  # Primary image origin
//! cdn_url = "https://images.vedhatrendz.com"       # Used when base_url is unset
//!
//! [delivery]
//! convention = "path-segment"   # path-segment | query-string | proxy-options
//! absolute = "pass-through"     # pass-through | strip-origin
//! proxy_prefix = "/cdn-cgi/image"
//! default_quality = 80
//!
//! [responsive]
//! widths = [400, 800, 1200, 1600]
//! format = "webp"
//!
//! [placeholder]
//! width = 50
//! quality = 20
//! blur = 10
//!
//! [loader]
//! root_margin_px = 100.0
//! threshold = 0.1
//! fallback_url = "/images/placeholder-broken.svg"
//! ```
//!
//! ## Environment Overrides
//!
//! The storefront build injects its origins through the environment. The
//! CLI applies them with [`apply_env_overrides`]; library code only ever
//! sees the resolved [`ImageConfig`], so tests pin origins directly.
//!
//! | Variable | Key |
//! |---|---|
//! | `VEDHA_IMAGE_BASE_URL` | `origin.base_url` |
//! | `VEDHA_IMAGE_CDN_URL` | `origin.cdn_url` |
//!
//! Unknown keys are rejected to catch typos early.

use crate::reference::AbsolutePolicy;
use crate::transform::{Convention, Format};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const ENV_BASE_URL: &str = "VEDHA_IMAGE_BASE_URL";
pub const ENV_CDN_URL: &str = "VEDHA_IMAGE_CDN_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Image delivery configuration loaded from `vedha-image.toml`.
///
/// All fields have defaults. User files need only specify the values they
/// want to override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageConfig {
    /// Where images are served from.
    pub origin: OriginConfig,
    /// URL shape and transformation defaults.
    pub delivery: DeliveryConfig,
    /// Width set for `srcset` descriptors.
    pub responsive: ResponsiveConfig,
    /// Blur-up placeholder parameters.
    pub placeholder: PlaceholderConfig,
    /// Viewport-gated loading parameters.
    pub loader: LoaderConfig,
}

impl ImageConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.delivery.default_quality) {
            return Err(ConfigError::Validation(
                "delivery.default_quality must be 1-100".into(),
            ));
        }
        if self.responsive.widths.is_empty() {
            return Err(ConfigError::Validation(
                "responsive.widths must not be empty".into(),
            ));
        }
        if self.responsive.widths.contains(&0) {
            return Err(ConfigError::Validation(
                "responsive.widths values must be non-zero".into(),
            ));
        }
        if self.placeholder.width == 0 {
            return Err(ConfigError::Validation(
                "placeholder.width must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.placeholder.quality) {
            return Err(ConfigError::Validation(
                "placeholder.quality must be 1-100".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.loader.threshold) {
            return Err(ConfigError::Validation(
                "loader.threshold must be between 0.0 and 1.0".into(),
            ));
        }
        if !self.loader.root_margin_px.is_finite() || self.loader.root_margin_px < 0.0 {
            return Err(ConfigError::Validation(
                "loader.root_margin_px must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

/// Image origins. `base_url` wins; `cdn_url` is the fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OriginConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdn_url: Option<String>,
}

impl OriginConfig {
    /// The origin URLs are composed against: `base_url`, else `cdn_url`,
    /// else empty. Blank values count as unset; trailing slashes are trimmed.
    pub fn resolve(&self) -> String {
        [&self.base_url, &self.cdn_url]
            .into_iter()
            .flatten()
            .map(|url| url.trim().trim_end_matches('/'))
            .find(|url| !url.is_empty())
            .unwrap_or("")
            .to_string()
    }
}

/// URL shape settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeliveryConfig {
    /// How transformation parameters are spelled.
    pub convention: Convention,
    /// What happens to references that are already absolute URLs.
    pub absolute: AbsolutePolicy,
    /// Route of the resizing proxy used to transform absolute URLs.
    /// Empty disables proxy wrapping.
    pub proxy_prefix: String,
    /// Quality used by presets that do not pin one.
    pub default_quality: u32,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            convention: Convention::PathSegment,
            absolute: AbsolutePolicy::PassThrough,
            proxy_prefix: "/cdn-cgi/image".to_string(),
            default_quality: 80,
        }
    }
}

/// Responsive `srcset` settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResponsiveConfig {
    /// Pixel widths emitted in `srcset` descriptors.
    pub widths: Vec<u32>,
    /// Format forced on every entry unless the request sets one.
    pub format: Format,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            widths: crate::responsive::DEFAULT_WIDTHS.to_vec(),
            format: Format::WebP,
        }
    }
}

/// Blur-up placeholder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderConfig {
    pub width: u32,
    pub quality: u32,
    /// Blur radius. `0` disables blurring.
    pub blur: u32,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            width: 50,
            quality: 20,
            blur: 10,
        }
    }
}

/// Viewport-gated loader settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Pixels the viewport is grown by on every side before testing visibility.
    pub root_margin_px: f64,
    /// Fraction of the element that must be visible (0.0-1.0).
    pub threshold: f64,
    /// Image shown when the full-resolution asset fails to load.
    pub fallback_url: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root_margin_px: 100.0,
            threshold: 0.1,
            fallback_url: "/images/placeholder-broken.svg".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ImageConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using stock defaults");
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ImageConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ImageConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, layered over stock defaults.
pub fn load_config(path: &Path) -> Result<ImageConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Apply origin overrides from an environment lookup.
///
/// Takes the lookup as a function so callers decide where values come from
/// (`std::env::var` in the binary, a fixed map in tests). Blank values are
/// ignored.
pub fn apply_env_overrides<F>(config: &mut ImageConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    if let Some(base) = get(ENV_BASE_URL) {
        tracing::debug!(%base, "origin.base_url overridden from environment");
        config.origin.base_url = Some(base);
    }
    if let Some(cdn) = get(ENV_CDN_URL) {
        tracing::debug!(%cdn, "origin.cdn_url overridden from environment");
        config.origin.cdn_url = Some(cdn);
    }
}

/// Returns a fully-commented stock `vedha-image.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# VedhaTrendz image delivery configuration
# =========================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Origins
# ---------------------------------------------------------------------------
[origin]
# Primary origin every URL is composed against.
# Overridden by VEDHA_IMAGE_BASE_URL.
# base_url = "https://ik.imagekit.io/vedhatrendz"

# Fallback origin, used only when base_url is unset.
# Overridden by VEDHA_IMAGE_CDN_URL.
# cdn_url = "https://images.vedhatrendz.com"

# ---------------------------------------------------------------------------
# Delivery
# ---------------------------------------------------------------------------
[delivery]
# How transformations are written into the URL:
#   path-segment   {origin}/w-400,q-80,f-webp/{key}
#   query-string   {origin}/{key}?width=400&quality=80&format=webp
#   proxy-options  {origin}{proxy_prefix}/width=400,quality=80/{key}
convention = "path-segment"

# Absolute http(s) references:
#   pass-through   keep the URL (wrapped by proxy_prefix when transformed)
#   strip-origin   drop scheme + host and rebase onto the origin
absolute = "pass-through"

# Resizing proxy route used to transform absolute URLs. "" disables it.
proxy_prefix = "/cdn-cgi/image"

# Quality used by presets that do not pin their own (1-100).
default_quality = 80

# ---------------------------------------------------------------------------
# Responsive images
# ---------------------------------------------------------------------------
[responsive]
# Widths emitted in srcset descriptors.
widths = [400, 800, 1200, 1600]

# Format forced on srcset entries unless a request sets one.
format = "webp"

# ---------------------------------------------------------------------------
# Blur-up placeholder
# ---------------------------------------------------------------------------
[placeholder]
width = 50
quality = 20
# Blur radius; 0 disables blurring.
blur = 10

# ---------------------------------------------------------------------------
# Lazy loading
# ---------------------------------------------------------------------------
[loader]
# Pixels added around the viewport before testing visibility.
root_margin_px = 100.0

# Fraction of the image that must be visible to start loading (0.0-1.0).
threshold = 0.1

# Shown when the full-resolution image fails to load.
fallback_url = "/images/placeholder-broken.svg"
"##
}
