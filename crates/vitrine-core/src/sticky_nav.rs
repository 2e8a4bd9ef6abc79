#![forbid(unsafe_code)]

//! Sticky navigation bar.
//!
//! The page header is watched with a negative root margin equal to the nav
//! height, so the header stops intersecting exactly when its remaining
//! visible strip would sit under the nav. The nav is sticky whenever the
//! header is not intersecting. Unlike reveal and lazy loading this toggles
//! on every crossing and the header is never released.
//!
//! The nav height is measured once at construction. Resizing the viewport
//! does not re-measure it.

use tracing::debug;

use crate::element::Element;
use crate::watch::{Crossing, CrossingHandler, Disposition, RootMargin, WatchOptions, WatchSet};

/// Crossing handler toggling the sticky class on the nav.
#[derive(Debug, Clone)]
pub struct StickyNav<E> {
    nav: E,
    sticky_class: String,
    nav_height: f64,
}

impl<E: Element> StickyNav<E> {
    /// Measure `nav` and build the handler.
    #[must_use]
    pub fn new(nav: E, sticky_class: impl Into<String>) -> Self {
        let nav_height = nav.height();
        Self {
            nav,
            sticky_class: sticky_class.into(),
            nav_height,
        }
    }

    /// Options for watching the header: the given threshold and a margin of
    /// minus the measured nav height.
    #[must_use]
    pub fn options(&self, threshold: f64) -> WatchOptions {
        WatchOptions::new(threshold, RootMargin::px(-self.nav_height))
    }

    /// Build a watch set over `header`.
    #[must_use]
    pub fn watch(
        nav: E,
        sticky_class: impl Into<String>,
        threshold: f64,
        header: E,
    ) -> WatchSet<E, Self> {
        let handler = Self::new(nav, sticky_class);
        let options = handler.options(threshold);
        WatchSet::new(options, handler).with_targets([header])
    }

    #[must_use]
    pub fn nav_height(&self) -> f64 {
        self.nav_height
    }

    #[must_use]
    pub fn is_sticky(&self) -> bool {
        self.nav.has_class(&self.sticky_class)
    }
}

impl<E: Element> CrossingHandler<E> for StickyNav<E> {
    fn on_crossing(&mut self, crossing: &Crossing<E>) -> Disposition {
        if crossing.is_intersecting {
            self.nav.remove_class(&self.sticky_class);
        } else {
            self.nav.add_class(&self.sticky_class);
        }
        debug!(sticky = !crossing.is_intersecting, "nav stickiness updated");
        Disposition::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::fake::FakeElement;
    use crate::watch::ViewportWatcher;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Calls {
        unobserve: usize,
    }

    impl ViewportWatcher<FakeElement> for Calls {
        fn observe(&mut self, _target: &FakeElement) {}

        fn unobserve(&mut self, _target: &FakeElement) {
            self.unobserve += 1;
        }
    }

    #[test]
    fn margin_is_negative_nav_height() {
        let nav = FakeElement::with_classes("nav", &["nav"]);
        nav.set_height(90.0);
        let header = FakeElement::with_classes("header", &["header"]);
        let set = StickyNav::watch(nav, "sticky", 0.0, header);
        assert_eq!(set.options().root_margin, RootMargin::px(-90.0));
        assert_eq!(set.options().root_margin.to_css(), "-90px");
    }

    #[test]
    fn toggles_on_every_crossing_and_stays_watched() {
        let nav = FakeElement::with_classes("nav", &["nav"]);
        nav.set_height(90.0);
        let header = FakeElement::with_classes("header", &["header"]);
        let mut set = StickyNav::watch(nav.clone(), "sticky", 0.0, header.clone());
        let mut calls = Calls::default();

        for round in 0..3 {
            set.deliver(&[Crossing::new(header.clone(), false, 0.0)], &mut calls);
            assert!(nav.has_class("sticky"), "round {round}");
            assert!(set.handler().is_sticky());
            set.deliver(&[Crossing::new(header.clone(), true, 0.4)], &mut calls);
            assert!(!nav.has_class("sticky"), "round {round}");
        }
        assert!(set.is_watched(&header));
        assert_eq!(calls.unobserve, 0);
    }

    #[test]
    fn height_measured_once() {
        let nav = FakeElement::with_classes("nav", &["nav"]);
        nav.set_height(90.0);
        let sticky = StickyNav::new(nav.clone(), "sticky");
        nav.set_height(140.0);
        assert_eq!(sticky.nav_height(), 90.0);
        assert_eq!(sticky.options(0.0).root_margin, RootMargin::px(-90.0));
    }
}
