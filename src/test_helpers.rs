//! Shared test utilities.
//!
//! Every test composes against the fixed origin [`CDN`] so expected URLs can
//! be written out literally.

use crate::compose::UrlComposer;
use crate::config::ImageConfig;
use crate::reference::AbsolutePolicy;
use crate::responsive::ResponsiveBuilder;
use crate::transform::Convention;

pub const CDN: &str = "https://cdn.example.com";

/// Composer on [`CDN`] with pass-through absolute URLs and the stock proxy prefix.
pub fn composer(convention: Convention) -> UrlComposer {
    UrlComposer::new(
        CDN,
        convention,
        AbsolutePolicy::PassThrough,
        Some("/cdn-cgi/image"),
    )
}

/// Stock config with the origin pinned to [`CDN`].
pub fn config() -> ImageConfig {
    let mut config = ImageConfig::default();
    config.origin.base_url = Some(CDN.to_string());
    config
}

/// Builder over [`config`].
pub fn builder() -> ResponsiveBuilder {
    ResponsiveBuilder::from_config(&config())
}
