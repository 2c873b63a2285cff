//! Visibility observation: geometry, the observer seam, and a headless viewport.
//!
//! The browser's intersection observer is modelled as the
//! [`IntersectionObserver`] trait. Observing an element hands back an
//! [`Observation`] guard; dropping or releasing the guard disconnects the
//! element, so every exit path (fired, unmounted, failed) gives the
//! registration back.
//!
//! [`Viewport`] is a headless implementation: callers place element
//! rectangles, move the viewport, and collect the resulting
//! [`IntersectionEntry`]s. Server-side rendering and tests drive the loader
//! through it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Identifies one rendered image element.
pub type ElementId = u64;

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Grow by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Overlap with `other`, or `None` when they do not touch.
    ///
    /// Edge-adjacent rectangles touch and yield a zero-area overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Options passed when an element starts being observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Pixels the viewport is grown by before testing.
    pub root_margin_px: f64,
    /// Minimum visible fraction of the element (0.0-1.0).
    pub threshold: f64,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            root_margin_px: 100.0,
            threshold: 0.1,
        }
    }
}

/// One visibility observation for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub element: ElementId,
    /// Visible fraction of the element's area, 0.0-1.0.
    pub ratio: f64,
    /// Whether the element touches the (margin-expanded) viewport at all.
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// True when this entry satisfies `threshold`.
    pub fn crosses(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

/// Compute the entry for `element` against `viewport` grown by `root_margin`.
///
/// Zero-area elements count as fully visible when they sit inside the root.
pub fn intersect(
    id: ElementId,
    element: &Rect,
    viewport: &Rect,
    root_margin: f64,
) -> IntersectionEntry {
    let root = viewport.expand(root_margin);
    match element.intersection(&root) {
        None => IntersectionEntry {
            element: id,
            ratio: 0.0,
            is_intersecting: false,
        },
        Some(overlap) => {
            let area = element.area();
            let ratio = if area > 0.0 {
                (overlap.area() / area).clamp(0.0, 1.0)
            } else {
                1.0
            };
            IntersectionEntry {
                element: id,
                ratio,
                is_intersecting: true,
            }
        }
    }
}

/// Scoped registration with an observer. Disconnects on drop.
pub struct Observation {
    element: ElementId,
    disconnect: Option<Box<dyn FnOnce(ElementId)>>,
}

impl Observation {
    pub fn new(element: ElementId, disconnect: impl FnOnce(ElementId) + 'static) -> Self {
        Self {
            element,
            disconnect: Some(Box::new(disconnect)),
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Disconnect now. Equivalent to dropping the guard.
    pub fn release(mut self) {
        self.disconnect_once();
    }

    fn disconnect_once(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            tracing::trace!(element = self.element, "observation released");
            disconnect(self.element);
        }
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        self.disconnect_once();
    }
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("element", &self.element)
            .field("live", &self.disconnect.is_some())
            .finish()
    }
}

/// Platform visibility observation.
pub trait IntersectionObserver {
    /// Start observing `element`. The registration lives as long as the
    /// returned guard.
    fn observe(&self, element: ElementId, options: ObserveOptions) -> Observation;
}

#[derive(Debug, Default)]
struct ViewportState {
    rect: Rect,
    layout: BTreeMap<ElementId, Rect>,
    observed: BTreeMap<ElementId, ObserveOptions>,
}

/// Headless viewport that evaluates intersections for placed elements.
///
/// Cloning yields another handle onto the same viewport.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    state: Rc<RefCell<ViewportState>>,
}

impl Viewport {
    pub fn new(rect: Rect) -> Self {
        Self {
            state: Rc::new(RefCell::new(ViewportState {
                rect,
                ..ViewportState::default()
            })),
        }
    }

    /// Record where `element` is laid out.
    pub fn place(&self, element: ElementId, bounds: Rect) {
        self.state.borrow_mut().layout.insert(element, bounds);
    }

    pub fn rect(&self) -> Rect {
        self.state.borrow().rect
    }

    /// Move the viewport's top-left corner and report entries for observed elements.
    pub fn scroll_to(&self, x: f64, y: f64) -> Vec<IntersectionEntry> {
        {
            let mut state = self.state.borrow_mut();
            state.rect.x = x;
            state.rect.y = y;
        }
        self.entries()
    }

    /// Current entries for every observed element that has been placed.
    pub fn entries(&self) -> Vec<IntersectionEntry> {
        let state = self.state.borrow();
        state
            .observed
            .iter()
            .filter_map(|(id, options)| {
                state
                    .layout
                    .get(id)
                    .map(|bounds| intersect(*id, bounds, &state.rect, options.root_margin_px))
            })
            .collect()
    }

    /// Elements currently registered.
    pub fn observed(&self) -> Vec<ElementId> {
        self.state.borrow().observed.keys().copied().collect()
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.state.borrow().observed.contains_key(&element)
    }
}

impl IntersectionObserver for Viewport {
    fn observe(&self, element: ElementId, options: ObserveOptions) -> Observation {
        self.state.borrow_mut().observed.insert(element, options);
        let state = Rc::clone(&self.state);
        Observation::new(element, move |id| {
            state.borrow_mut().observed.remove(&id);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 800.0)
    }

    #[test]
    fn fully_visible_element() {
        let e = intersect(1, &Rect::new(0.0, 100.0, 200.0, 200.0), &viewport(), 0.0);
        assert!(e.is_intersecting);
        assert_eq!(e.ratio, 1.0);
    }

    #[test]
    fn partially_visible_element() {
        // Bottom half of the element is below the fold.
        let e = intersect(1, &Rect::new(0.0, 700.0, 100.0, 200.0), &viewport(), 0.0);
        assert!(e.is_intersecting);
        assert_eq!(e.ratio, 0.5);
    }

    #[test]
    fn root_margin_extends_viewport() {
        let element = Rect::new(0.0, 850.0, 100.0, 100.0);
        assert!(!intersect(1, &element, &viewport(), 0.0).is_intersecting);
        let e = intersect(1, &element, &viewport(), 100.0);
        assert!(e.is_intersecting);
        assert_eq!(e.ratio, 0.5);
    }

    #[test]
    fn edge_adjacent_counts_as_intersecting() {
        let e = intersect(1, &Rect::new(0.0, 800.0, 100.0, 100.0), &viewport(), 0.0);
        assert!(e.is_intersecting);
        assert_eq!(e.ratio, 0.0);
        assert!(!e.crosses(0.1));
        assert!(e.crosses(0.0));
    }

    #[test]
    fn zero_area_element_inside_root() {
        let e = intersect(1, &Rect::new(10.0, 10.0, 0.0, 0.0), &viewport(), 0.0);
        assert_eq!(e.ratio, 1.0);
    }

    #[test]
    fn observation_disconnects_once() {
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let obs = Observation::new(7, move |id| {
            assert_eq!(id, 7);
            *c.borrow_mut() += 1;
        });
        obs.release();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn observation_disconnects_on_drop() {
        let count = Rc::new(RefCell::new(0));
        {
            let c = Rc::clone(&count);
            let _obs = Observation::new(7, move |_| *c.borrow_mut() += 1);
        }
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn viewport_tracks_registrations() {
        let vp = Viewport::new(viewport());
        vp.place(1, Rect::new(0.0, 1000.0, 100.0, 100.0));
        let obs = vp.observe(1, ObserveOptions::default());
        assert!(vp.is_observing(1));

        let entries = vp.entries();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_intersecting);

        let entries = vp.scroll_to(0.0, 400.0);
        assert!(entries[0].crosses(0.1));

        drop(obs);
        assert!(vp.observed().is_empty());
        assert!(vp.entries().is_empty());
    }

    #[test]
    fn unplaced_elements_produce_no_entries() {
        let vp = Viewport::new(viewport());
        let _obs = vp.observe(3, ObserveOptions::default());
        assert!(vp.entries().is_empty());
    }
}
