//! End-to-end checks of the delivery contract through the public API.
//!
//! Everything composes against a pinned origin so expected URLs are literal.

use vedha_image::compose::UrlComposer;
use vedha_image::config::{self, ImageConfig};
use vedha_image::loader::{LazyImage, LoadState, Rect, Viewport};
use vedha_image::preset::Preset;
use vedha_image::reference::AbsolutePolicy;
use vedha_image::render::ImageRenderer;
use vedha_image::responsive::ResponsiveBuilder;
use vedha_image::transform::{Convention, TransformationRequest};

const CDN: &str = "https://cdn.example.com";

fn config() -> ImageConfig {
    let mut config = ImageConfig::default();
    config.origin.base_url = Some(CDN.to_string());
    config
}

fn composer(convention: Convention) -> UrlComposer {
    UrlComposer::new(CDN, convention, AbsolutePolicy::PassThrough, Some("/cdn-cgi/image"))
}

fn card_request() -> TransformationRequest {
    TransformationRequest::new()
        .with_width(400)
        .with_quality(80)
        .with_format("webp")
}

// =========================================================================
// URL composition
// =========================================================================

#[test]
fn empty_reference_is_empty_for_every_convention() {
    for convention in [
        Convention::PathSegment,
        Convention::QueryString,
        Convention::ProxyOptions,
    ] {
        let c = composer(convention);
        assert_eq!(c.compose("", &card_request()), "");
        assert_eq!(c.compose("   ", &TransformationRequest::new()), "");
    }
}

#[test]
fn absolute_url_without_transformations_is_untouched() {
    let url = "https://pub-1234.r2.dev/products/saree.jpg";
    for convention in [
        Convention::PathSegment,
        Convention::QueryString,
        Convention::ProxyOptions,
    ] {
        assert_eq!(composer(convention).compose(url, &TransformationRequest::new()), url);
    }
}

#[test]
fn absolute_url_with_transformations_goes_through_proxy() {
    let url = "https://pub-1234.r2.dev/products/saree.jpg";
    assert_eq!(
        composer(Convention::PathSegment).compose(url, &card_request()),
        "https://cdn.example.com/cdn-cgi/image/width=400,quality=80,format=webp/https://pub-1234.r2.dev/products/saree.jpg"
    );
}

#[test]
fn composition_is_deterministic() {
    let c = composer(Convention::PathSegment);
    let first = c.compose("products/abc.jpg", &card_request());
    for _ in 0..10 {
        assert_eq!(c.compose("products/abc.jpg", &card_request()), first);
    }
}

#[test]
fn path_segment_literal() {
    assert_eq!(
        composer(Convention::PathSegment).compose("products/abc.jpg", &card_request()),
        "https://cdn.example.com/w-400,q-80,f-webp/products/abc.jpg"
    );
}

#[test]
fn query_string_literal() {
    assert_eq!(
        composer(Convention::QueryString).compose("products/abc.jpg", &card_request()),
        "https://cdn.example.com/products/abc.jpg?width=400&quality=80&format=webp"
    );
}

#[test]
fn leading_slashes_are_normalized_away() {
    let c = composer(Convention::PathSegment);
    assert_eq!(
        c.compose("/products/abc.jpg", &card_request()),
        c.compose("products/abc.jpg", &card_request())
    );
}

#[test]
fn cdn_origin_used_when_base_unset() {
    let mut config = ImageConfig::default();
    config.origin.cdn_url = Some("https://images.example.net/".to_string());
    let c = UrlComposer::from_config(&config);
    assert_eq!(
        c.compose("a.jpg", &TransformationRequest::new()),
        "https://images.example.net/a.jpg"
    );
}

#[test]
fn unset_origin_yields_relative_url() {
    let c = UrlComposer::from_config(&ImageConfig::default());
    assert_eq!(c.compose("a.jpg", &TransformationRequest::new()), "/a.jpg");
}

// =========================================================================
// Responsive sets
// =========================================================================

#[test]
fn srcset_has_one_entry_per_width() {
    let builder = ResponsiveBuilder::from_config(&config());
    let widths = [400, 800, 1200, 1600];
    let set = builder.srcset("products/abc.jpg", &widths, &TransformationRequest::new());
    assert_eq!(set.len(), widths.len());

    let descriptor = set.descriptor();
    let parts: Vec<&str> = descriptor.split(", ").collect();
    assert_eq!(parts.len(), widths.len());
    for (part, w) in parts.iter().zip(widths) {
        let (url, descriptor) = part.rsplit_once(' ').expect("url and width");
        assert_eq!(descriptor, format!("{w}w"));
        assert!(url.starts_with(CDN));
        assert!(url.contains("f-webp"));
    }
}

#[test]
fn srcset_empty_for_empty_reference() {
    let builder = ResponsiveBuilder::from_config(&config());
    let set = builder.default_srcset("", &TransformationRequest::new());
    assert!(set.is_empty());
    assert_eq!(set.descriptor(), "");
}

#[test]
fn progressive_pair_placeholder_is_tiny_and_blurred() {
    let builder = ResponsiveBuilder::from_config(&config());
    let pair = builder.progressive("products/abc.jpg", &card_request());
    assert_eq!(
        pair.full,
        "https://cdn.example.com/w-400,q-80,f-webp/products/abc.jpg"
    );
    assert!(pair.placeholder.contains("w-50"));
    assert!(pair.placeholder.contains("q-20"));
    assert!(pair.placeholder.contains("bl-10"));
}

// =========================================================================
// Lazy loading lifecycle
// =========================================================================

fn lazy_card(viewport: &Viewport, element: u64) -> LazyImage {
    let renderer = ImageRenderer::from_config(&config());
    let mut image = renderer.lazy(element, "products/abc.jpg", Preset::ProductCard, "Saree");
    image.mount(viewport);
    image
}

#[test]
fn image_below_the_fold_loads_after_scrolling() {
    let viewport = Viewport::new(Rect::new(0.0, 0.0, 400.0, 800.0));
    viewport.place(7, Rect::new(0.0, 2000.0, 300.0, 400.0));
    let mut image = lazy_card(&viewport, 7);

    assert_eq!(image.state(), LoadState::Pending);
    assert!(viewport.is_observing(7));
    for entry in viewport.entries() {
        assert!(!image.on_intersection(&entry));
    }

    for entry in viewport.scroll_to(0.0, 1500.0) {
        image.on_intersection(&entry);
    }
    assert_eq!(image.state(), LoadState::InView);
    assert!(!viewport.is_observing(7), "observer released once visible");

    assert!(image.on_load());
    assert_eq!(image.state(), LoadState::Loaded);
    let html = image.render().into_string();
    assert!(html.contains(r#"data-state="loaded""#));
}

#[test]
fn failed_load_shows_fallback() {
    let viewport = Viewport::new(Rect::new(0.0, 0.0, 400.0, 800.0));
    viewport.place(3, Rect::new(0.0, 100.0, 300.0, 400.0));
    let mut image = lazy_card(&viewport, 3);
    for entry in viewport.entries() {
        image.on_intersection(&entry);
    }
    assert!(image.on_error());
    assert_eq!(image.state(), LoadState::Failed);
    assert!(!image.on_load(), "failed is terminal");
    let html = image.render().into_string();
    assert!(html.contains("/images/placeholder-broken.svg"));
}

#[test]
fn dropping_a_pending_image_stops_observation() {
    let viewport = Viewport::new(Rect::new(0.0, 0.0, 400.0, 800.0));
    viewport.place(9, Rect::new(0.0, 5000.0, 300.0, 400.0));
    {
        let _image = lazy_card(&viewport, 9);
        assert_eq!(viewport.observed(), vec![9]);
    }
    assert!(viewport.observed().is_empty());
}

#[test]
fn eager_preset_skips_observation() {
    let viewport = Viewport::new(Rect::new(0.0, 0.0, 400.0, 800.0));
    let renderer = ImageRenderer::from_config(&config());
    let mut image = renderer.lazy(1, "banners/diwali.jpg", Preset::Banner, "Diwali");
    image.mount(&viewport);
    assert_eq!(image.state(), LoadState::InView);
    assert!(viewport.observed().is_empty());
}

// =========================================================================
// Config files
// =========================================================================

#[test]
fn config_file_overrides_stock_defaults() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("vedha-image.toml");
    std::fs::write(
        &path,
        r#"
[origin]
base_url = "https://ik.imagekit.io/vedha/"

[responsive]
widths = [320, 640]
"#,
    )
    .unwrap();

    let config = config::load_config(&path).unwrap();
    assert_eq!(config.origin.resolve(), "https://ik.imagekit.io/vedha");
    assert_eq!(config.responsive.widths, vec![320, 640]);
    assert_eq!(config.placeholder.width, 50);

    let builder = ResponsiveBuilder::from_config(&config);
    let set = builder.default_srcset("a.jpg", &TransformationRequest::new());
    assert_eq!(
        set.descriptor(),
        "https://ik.imagekit.io/vedha/w-320,f-webp/a.jpg 320w, https://ik.imagekit.io/vedha/w-640,f-webp/a.jpg 640w"
    );
}

#[test]
fn stock_config_round_trips() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("vedha-image.toml");
    std::fs::write(&path, config::stock_config_toml()).unwrap();
    assert_eq!(config::load_config(&path).unwrap(), ImageConfig::default());
}
