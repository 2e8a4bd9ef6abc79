#![forbid(unsafe_code)]

//! Simulated viewport and visibility watcher.
//!
//! [`SimWatcher`] mimics `IntersectionObserver`: a freshly observed target
//! always produces one initial entry, and after that an entry is produced
//! only when the target's intersecting state flips. Entries are collected
//! in observation order, so replays are deterministic.

use vitrine_core::watch::{Crossing, Rect, ViewportWatcher, WatchOptions, measure};

use crate::sim_dom::SimElement;

/// Visible window onto the simulated document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimViewport {
    pub width: f64,
    pub height: f64,
    /// Vertical scroll offset in document pixels.
    pub scroll_y: f64,
}

impl Default for SimViewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

impl SimViewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }

    /// Viewport rectangle in its own coordinates.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// `el`'s document rectangle translated into viewport coordinates.
    #[must_use]
    pub fn client_rect(&self, el: &SimElement) -> Rect {
        let rect = el.rect();
        Rect::new(rect.x, rect.y - self.scroll_y, rect.width, rect.height)
    }
}

/// One call made on a [`SimWatcher`].
#[derive(Debug, Clone, PartialEq)]
pub enum WatchCall {
    Observe(SimElement),
    Unobserve(SimElement),
}

#[derive(Debug, Clone)]
struct Observed {
    element: SimElement,
    last: Option<bool>,
}

/// Recording stand-in for an `IntersectionObserver`.
#[derive(Debug, Clone)]
pub struct SimWatcher {
    options: WatchOptions,
    observed: Vec<Observed>,
    calls: Vec<WatchCall>,
}

impl SimWatcher {
    #[must_use]
    pub fn new(options: WatchOptions) -> Self {
        Self {
            options,
            observed: Vec::new(),
            calls: Vec::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> WatchOptions {
        self.options
    }

    /// Every observe/unobserve call so far, in order.
    #[must_use]
    pub fn calls(&self) -> &[WatchCall] {
        &self.calls
    }

    #[must_use]
    pub fn is_observing(&self, el: &SimElement) -> bool {
        self.observed.iter().any(|o| o.element == *el)
    }

    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Number of `unobserve` calls made for `el`.
    #[must_use]
    pub fn unobserve_count(&self, el: &SimElement) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, WatchCall::Unobserve(e) if e == el))
            .count()
    }

    /// Measure every observed target and return the entries that are due.
    pub fn collect(&mut self, viewport: &SimViewport) -> Vec<Crossing<SimElement>> {
        let root = viewport.rect();
        let mut entries = Vec::new();
        for observed in &mut self.observed {
            let vis = measure(viewport.client_rect(&observed.element), root, self.options);
            if observed.last != Some(vis.is_intersecting) {
                observed.last = Some(vis.is_intersecting);
                entries.push(Crossing::new(
                    observed.element.clone(),
                    vis.is_intersecting,
                    vis.ratio,
                ));
            }
        }
        entries
    }
}

impl ViewportWatcher<SimElement> for SimWatcher {
    fn observe(&mut self, target: &SimElement) {
        self.calls.push(WatchCall::Observe(target.clone()));
        if !self.is_observing(target) {
            self.observed.push(Observed {
                element: target.clone(),
                last: None,
            });
        }
    }

    fn unobserve(&mut self, target: &SimElement) {
        self.calls.push(WatchCall::Unobserve(target.clone()));
        self.observed.retain(|o| o.element != *target);
    }
}
