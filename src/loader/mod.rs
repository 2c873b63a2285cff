//! Viewport-gated lazy loading.
//!
//! Each rendered image owns one [`LazyImage`]: its placeholder/full URL
//! pair, its load state and, while pending, its visibility registration.
//! Images never share state with each other.
//!
//! ## States
//!
//! ```text
//!            visible (ratio >= threshold)        load event
//! Pending ───────────────────────────────▶ InView ──────────▶ Loaded
//!                                            │
//!                                            │ error event
//!                                            ▼
//!                                          Failed
//! ```
//!
//! - Every transition fires at most once; events arriving in the wrong
//!   state are ignored.
//! - The visibility registration is released the moment the image leaves
//!   `Pending`, and on drop, so an unmounted image never keeps observing.
//! - `Failed` shows the configured fallback asset instead of leaving the
//!   blurred placeholder up forever.

mod observer;

pub use observer::{
    ElementId, IntersectionEntry, IntersectionObserver, ObserveOptions, Observation, Rect,
    Viewport, intersect,
};

use crate::config::LoaderConfig;
use crate::responsive::ProgressivePair;
use maud::{Markup, html};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadState {
    /// Not yet near the viewport. Only the placeholder is shown.
    Pending,
    /// Crossed the visibility threshold; full resolution is loading.
    InView,
    /// Full resolution loaded; placeholder hidden.
    Loaded,
    /// Full resolution failed; fallback shown.
    Failed,
}

impl LoadState {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadState::Pending => "pending",
            LoadState::InView => "in-view",
            LoadState::Loaded => "loaded",
            LoadState::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Failed)
    }
}

/// Inputs that move a [`LazyImage`] between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadEvent {
    /// Visibility threshold crossed.
    Visible,
    /// Full-resolution asset finished loading.
    Loaded,
    /// Full-resolution asset failed to load.
    Errored,
}

/// The transition table. `None` means the event is ignored in `state`.
pub fn next_state(state: LoadState, event: LoadEvent) -> Option<LoadState> {
    match (state, event) {
        (LoadState::Pending, LoadEvent::Visible) => Some(LoadState::InView),
        (LoadState::InView, LoadEvent::Loaded) => Some(LoadState::Loaded),
        (LoadState::InView, LoadEvent::Errored) => Some(LoadState::Failed),
        _ => None,
    }
}

impl From<&LoaderConfig> for ObserveOptions {
    fn from(config: &LoaderConfig) -> Self {
        Self {
            root_margin_px: config.root_margin_px,
            threshold: config.threshold,
        }
    }
}

/// Lazy-loading state for one image element.
#[derive(Debug)]
pub struct LazyImage {
    element: ElementId,
    pair: ProgressivePair,
    alt: String,
    srcset: Option<String>,
    sizes: Option<String>,
    fallback_url: String,
    options: ObserveOptions,
    state: LoadState,
    observation: Option<Observation>,
}

impl LazyImage {
    pub fn new(element: ElementId, pair: ProgressivePair, config: &LoaderConfig) -> Self {
        Self {
            element,
            pair,
            alt: String::new(),
            srcset: None,
            sizes: None,
            fallback_url: config.fallback_url.clone(),
            options: ObserveOptions::from(config),
            state: LoadState::Pending,
            observation: None,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    /// Attach a `srcset` descriptor and `sizes` to the full-resolution image.
    /// An empty descriptor is ignored.
    pub fn with_srcset(mut self, descriptor: impl Into<String>, sizes: impl Into<String>) -> Self {
        let descriptor = descriptor.into();
        if !descriptor.is_empty() {
            self.srcset = Some(descriptor);
            self.sizes = Some(sizes.into());
        }
        self
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn pair(&self) -> &ProgressivePair {
        &self.pair
    }

    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    /// Start observing visibility. No-op unless pending and unobserved, or
    /// when there is nothing to load.
    pub fn mount(&mut self, observer: &impl IntersectionObserver) {
        if self.state != LoadState::Pending || self.observation.is_some() {
            return;
        }
        if self.pair.full.is_empty() {
            tracing::debug!(element = self.element, "empty image reference, not observing");
            return;
        }
        self.observation = Some(observer.observe(self.element, self.options));
        tracing::trace!(element = self.element, "observing visibility");
    }

    /// Skip observation and start loading immediately (above-the-fold images).
    pub fn load_eagerly(&mut self) -> bool {
        self.apply(LoadEvent::Visible)
    }

    /// Feed a visibility entry. Returns `true` if it moved the image to `InView`.
    ///
    /// Entries for other elements, or below the threshold, are ignored.
    pub fn on_intersection(&mut self, entry: &IntersectionEntry) -> bool {
        if entry.element != self.element || self.observation.is_none() {
            return false;
        }
        if !entry.crosses(self.options.threshold) {
            return false;
        }
        self.apply(LoadEvent::Visible)
    }

    /// Full-resolution load completed.
    pub fn on_load(&mut self) -> bool {
        self.apply(LoadEvent::Loaded)
    }

    /// Full-resolution load failed.
    pub fn on_error(&mut self) -> bool {
        self.apply(LoadEvent::Errored)
    }

    /// Release the visibility registration. Called implicitly on drop.
    pub fn unmount(&mut self) {
        if let Some(observation) = self.observation.take() {
            observation.release();
        }
    }

    fn apply(&mut self, event: LoadEvent) -> bool {
        let Some(next) = next_state(self.state, event) else {
            tracing::trace!(
                element = self.element,
                state = self.state.as_str(),
                ?event,
                "event ignored"
            );
            return false;
        };
        // Leaving Pending ends observation, whatever the reason.
        self.unmount();
        tracing::debug!(
            element = self.element,
            from = self.state.as_str(),
            to = next.as_str(),
            "lazy image transition"
        );
        if next == LoadState::Failed {
            tracing::warn!(element = self.element, url = %self.pair.full, "full-resolution image failed to load");
        }
        self.state = next;
        true
    }

    /// Markup for the current state.
    ///
    /// - `Pending`: placeholder only
    /// - `InView`: placeholder plus the loading full image
    /// - `Loaded`: full image, placeholder `hidden`
    /// - `Failed`: fallback image, placeholder `hidden`
    pub fn render(&self) -> Markup {
        if self.pair.is_empty() {
            return html! {};
        }
        let hide_placeholder = self.state.is_terminal();
        html! {
            span.lazy-image data-state=(self.state.as_str()) {
                @if !self.pair.placeholder.is_empty() {
                    img.lazy-placeholder src=(self.pair.placeholder) alt="" aria-hidden="true" hidden[hide_placeholder];
                }
                @match self.state {
                    LoadState::Pending => {}
                    LoadState::InView => {
                        img.lazy-full src=(self.pair.full) srcset=[self.srcset.as_deref()] sizes=[self.sizes.as_deref()] alt=(self.alt) decoding="async" data-loading="true";
                    }
                    LoadState::Loaded => {
                        img.lazy-full src=(self.pair.full) srcset=[self.srcset.as_deref()] sizes=[self.sizes.as_deref()] alt=(self.alt) decoding="async";
                    }
                    LoadState::Failed => {
                        img.lazy-fallback src=(self.fallback_url) alt=(self.alt);
                    }
                }
            }
        }
    }
}

impl Drop for LazyImage {
    fn drop(&mut self) {
        self.unmount();
    }
}
