#![forbid(unsafe_code)]

//! Scroll-triggered section reveal.
//!
//! Each section starts hidden. The first intersecting crossing clears the
//! hidden class and releases the section; non-intersecting crossings leave
//! it hidden and watched. A revealed section never hides again.

use tracing::debug;

use crate::element::Element;
use crate::watch::{Crossing, CrossingHandler, Disposition, WatchOptions, WatchSet};

/// Crossing handler for content sections.
#[derive(Debug, Clone)]
pub struct RevealSections {
    hidden_class: String,
    revealed: usize,
}

impl RevealSections {
    #[must_use]
    pub fn new(hidden_class: impl Into<String>) -> Self {
        Self {
            hidden_class: hidden_class.into(),
            revealed: 0,
        }
    }

    /// Build a watch set over `sections` with these options.
    #[must_use]
    pub fn watch<E: Element>(
        hidden_class: impl Into<String>,
        options: WatchOptions,
        sections: impl IntoIterator<Item = E>,
    ) -> WatchSet<E, Self> {
        WatchSet::new(options, Self::new(hidden_class)).with_targets(sections)
    }

    /// Number of sections revealed so far.
    #[must_use]
    pub fn revealed(&self) -> usize {
        self.revealed
    }
}

impl<E: Element> CrossingHandler<E> for RevealSections {
    fn on_crossing(&mut self, crossing: &Crossing<E>) -> Disposition {
        if !crossing.is_intersecting {
            return Disposition::Keep;
        }
        crossing.target.remove_class(&self.hidden_class);
        self.revealed += 1;
        debug!(
            ratio = crossing.intersection_ratio,
            revealed = self.revealed,
            "section revealed"
        );
        Disposition::Release
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::fake::FakeElement;
    use crate::watch::{RootMargin, ViewportWatcher};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Calls {
        observe: usize,
        unobserve: usize,
    }

    impl ViewportWatcher<FakeElement> for Calls {
        fn observe(&mut self, _target: &FakeElement) {
            self.observe += 1;
        }

        fn unobserve(&mut self, _target: &FakeElement) {
            self.unobserve += 1;
        }
    }

    #[test]
    fn hidden_until_truly_intersecting() {
        let section = FakeElement::with_classes("section", &["section", "section--hidden"]);
        let mut set = RevealSections::watch(
            "section--hidden",
            WatchOptions::new(0.15, RootMargin::ZERO),
            [section.clone()],
        );
        let mut calls = Calls::default();
        set.start(&mut calls);

        set.deliver(&[Crossing::new(section.clone(), false, 0.05)], &mut calls);
        assert!(section.has_class("section--hidden"));
        assert_eq!(calls.unobserve, 0);

        set.deliver(&[Crossing::new(section.clone(), true, 0.2)], &mut calls);
        assert!(!section.has_class("section--hidden"));
        assert_eq!(calls.unobserve, 1);
        assert_eq!(set.handler().revealed(), 1);

        // Leaving the viewport afterwards does not hide it again.
        set.deliver(&[Crossing::new(section.clone(), false, 0.0)], &mut calls);
        assert!(!section.has_class("section--hidden"));
        assert_eq!(calls.observe, 1);
        assert_eq!(calls.unobserve, 1);
    }
}
