#![forbid(unsafe_code)]

//! Viewport watching.
//!
//! The host owns the actual visibility primitive (an `IntersectionObserver`
//! in the browser, [`measure`]-driven simulation in tests). This module
//! defines the narrow seam the components talk to:
//!
//! - [`ViewportWatcher`]: `observe` / `unobserve` on the host primitive.
//! - [`Crossing`]: one delivered entry (target, `is_intersecting`, ratio).
//! - [`CrossingHandler`]: per-family reaction returning a [`Disposition`].
//! - [`WatchSet`]: the registered targets of one family plus their handler.
//!
//! # Invariants
//!
//! 1. A target released by its handler is unobserved exactly once, from
//!    inside the delivery that released it.
//! 2. Entries for targets that are not (or no longer) watched are dropped
//!    before reaching the handler, so a one-shot handler never fires twice
//!    even if the host delivers a stale entry.
//! 3. Targets are registered once; there is no re-registration.

use tracing::trace;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Grow (positive) or shrink (negative) every side by `by` pixels.
    /// Width and height never go below zero.
    #[must_use]
    pub fn expand(&self, by: f64) -> Self {
        let width = (self.width + 2.0 * by).max(0.0);
        let height = (self.height + 2.0 * by).max(0.0);
        Self {
            x: self.x - by,
            y: self.y - by,
            width,
            height,
        }
    }

    /// Whether the rectangles touch or overlap (edge adjacency counts).
    #[must_use]
    pub fn touches(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Overlapping region, `None` when the rectangles do not touch.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.touches(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// Margin applied to all four sides of the viewport before intersecting.
///
/// Negative values shrink the effective viewport (used to detect when the
/// header slides under the nav); positive values grow it (used to start
/// loading images before they scroll on screen).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RootMargin(f64);

impl RootMargin {
    pub const ZERO: Self = Self(0.0);

    #[must_use]
    pub const fn px(px: f64) -> Self {
        Self(px)
    }

    #[must_use]
    pub const fn as_px(self) -> f64 {
        self.0
    }

    /// CSS form accepted by `IntersectionObserverInit.rootMargin`.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("{}px", self.0)
    }
}

/// Observation options for one watcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    /// Visible fraction in `[0, 1]` at which a target counts as intersecting.
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl WatchOptions {
    #[must_use]
    pub const fn new(threshold: f64, root_margin: RootMargin) -> Self {
        Self {
            threshold,
            root_margin,
        }
    }
}

/// Result of measuring one target against the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visibility {
    /// Visible area over target area, in `[0, 1]`.
    pub ratio: f64,
    pub is_intersecting: bool,
}

/// Measure `target` against `viewport` with `options` applied.
///
/// The margin expands the viewport first. A target is intersecting when it
/// touches the effective viewport and its visible ratio reaches the
/// threshold. A zero-area target that touches the viewport has ratio 1.
#[must_use]
pub fn measure(target: Rect, viewport: Rect, options: WatchOptions) -> Visibility {
    let root = viewport.expand(options.root_margin.as_px());
    let Some(overlap) = target.intersection(&root) else {
        return Visibility {
            ratio: 0.0,
            is_intersecting: false,
        };
    };
    let area = target.area();
    let ratio = if area > 0.0 {
        (overlap.area() / area).clamp(0.0, 1.0)
    } else {
        1.0
    };
    Visibility {
        ratio,
        is_intersecting: ratio >= options.threshold,
    }
}

// ---------------------------------------------------------------------------
// Watcher seam
// ---------------------------------------------------------------------------

/// One visibility entry delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing<E> {
    pub target: E,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

impl<E> Crossing<E> {
    #[must_use]
    pub fn new(target: E, is_intersecting: bool, intersection_ratio: f64) -> Self {
        Self {
            target,
            is_intersecting,
            intersection_ratio,
        }
    }
}

/// Host visibility-observation primitive.
///
/// `unobserve` must be idempotent and callable from inside a delivery for
/// the same target.
pub trait ViewportWatcher<E> {
    fn observe(&mut self, target: &E);
    fn unobserve(&mut self, target: &E);
}

/// What a handler wants done with a target after a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Keep delivering crossings for this target.
    Keep,
    /// Stop watching this target permanently.
    Release,
}

/// Reaction to crossings for one family of targets.
pub trait CrossingHandler<E> {
    fn on_crossing(&mut self, crossing: &Crossing<E>) -> Disposition;
}

/// Registration record for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchTarget<E> {
    pub element: E,
    /// True until the handler releases the target, then permanently false.
    pub watched: bool,
}

/// All targets sharing one set of options and one handler.
#[derive(Debug)]
pub struct WatchSet<E, H> {
    options: WatchOptions,
    targets: Vec<WatchTarget<E>>,
    handler: H,
}

impl<E, H> WatchSet<E, H>
where
    E: PartialEq + std::fmt::Debug,
    H: CrossingHandler<E>,
{
    #[must_use]
    pub fn new(options: WatchOptions, handler: H) -> Self {
        Self {
            options,
            targets: Vec::new(),
            handler,
        }
    }

    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = E>) -> Self {
        for target in targets {
            self.register(target);
        }
        self
    }

    /// Register a target. Duplicates are ignored.
    pub fn register(&mut self, element: E) {
        if self.position(&element).is_none() {
            self.targets.push(WatchTarget {
                element,
                watched: true,
            });
        }
    }

    /// Observe every still-watched target on `watcher`.
    pub fn start(&self, watcher: &mut dyn ViewportWatcher<E>) {
        for target in self.targets.iter().filter(|t| t.watched) {
            watcher.observe(&target.element);
        }
    }

    /// Stop observing every still-watched target, without releasing them.
    pub fn stop(&self, watcher: &mut dyn ViewportWatcher<E>) {
        for target in self.targets.iter().filter(|t| t.watched) {
            watcher.unobserve(&target.element);
        }
    }

    /// Route a batch of entries, in order, to the handler.
    ///
    /// Returns the number of entries the handler saw.
    pub fn deliver(
        &mut self,
        entries: &[Crossing<E>],
        watcher: &mut dyn ViewportWatcher<E>,
    ) -> usize {
        let mut handled = 0;
        for entry in entries {
            let Some(idx) = self.position(&entry.target) else {
                trace!(element = ?entry.target, "crossing for unregistered target ignored");
                continue;
            };
            if !self.targets[idx].watched {
                trace!(element = ?entry.target, "crossing for released target ignored");
                continue;
            }
            handled += 1;
            if self.handler.on_crossing(entry) == Disposition::Release {
                let target = &mut self.targets[idx];
                target.watched = false;
                watcher.unobserve(&target.element);
            }
        }
        handled
    }

    #[must_use]
    pub fn options(&self) -> WatchOptions {
        self.options
    }

    #[must_use]
    pub fn targets(&self) -> &[WatchTarget<E>] {
        &self.targets
    }

    #[must_use]
    pub fn is_watched(&self, element: &E) -> bool {
        self.position(element)
            .is_some_and(|idx| self.targets[idx].watched)
    }

    #[must_use]
    pub fn watched_count(&self) -> usize {
        self.targets.iter().filter(|t| t.watched).count()
    }

    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    fn position(&self, element: &E) -> Option<usize> {
        self.targets.iter().position(|t| t.element == *element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[derive(Default)]
    struct Recorder {
        observed: Vec<u32>,
        unobserved: Vec<u32>,
    }

    impl ViewportWatcher<u32> for Recorder {
        fn observe(&mut self, target: &u32) {
            self.observed.push(*target);
        }

        fn unobserve(&mut self, target: &u32) {
            self.unobserved.push(*target);
        }
    }

    /// Releases on the first intersecting crossing.
    #[derive(Default)]
    struct Once {
        fired: Vec<u32>,
    }

    impl CrossingHandler<u32> for Once {
        fn on_crossing(&mut self, crossing: &Crossing<u32>) -> Disposition {
            if !crossing.is_intersecting {
                return Disposition::Keep;
            }
            self.fired.push(crossing.target);
            Disposition::Release
        }
    }

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 800.0)
    }

    #[test]
    fn measure_fully_visible() {
        let v = measure(
            Rect::new(0.0, 100.0, 1000.0, 200.0),
            viewport(),
            WatchOptions::new(0.15, RootMargin::ZERO),
        );
        assert_eq!(v.ratio, 1.0);
        assert!(v.is_intersecting);
    }

    #[test]
    fn measure_below_threshold() {
        // 100 of 1000 px visible: ratio 0.1 < 0.15.
        let v = measure(
            Rect::new(0.0, 700.0, 1000.0, 1000.0),
            viewport(),
            WatchOptions::new(0.15, RootMargin::ZERO),
        );
        assert!((v.ratio - 0.1).abs() < 1e-9);
        assert!(!v.is_intersecting);
    }

    #[test]
    fn measure_positive_margin_preloads() {
        let target = Rect::new(0.0, 900.0, 1000.0, 300.0);
        let plain = measure(target, viewport(), WatchOptions::new(0.0, RootMargin::ZERO));
        let grown = measure(target, viewport(), WatchOptions::new(0.0, RootMargin::px(200.0)));
        assert!(!plain.is_intersecting);
        assert!(grown.is_intersecting);
    }

    #[test]
    fn measure_negative_margin_shrinks_viewport() {
        // Header occupying the top 90px; nav height 90 shrinks it out of view.
        let header = Rect::new(0.0, -500.0, 1000.0, 580.0);
        let v = measure(header, viewport(), WatchOptions::new(0.0, RootMargin::px(-90.0)));
        assert!(!v.is_intersecting);
        let v = measure(header, viewport(), WatchOptions::new(0.0, RootMargin::ZERO));
        assert!(v.is_intersecting);
    }

    #[test]
    fn measure_edge_adjacent_counts_at_zero_threshold() {
        let v = measure(
            Rect::new(0.0, 800.0, 1000.0, 100.0),
            viewport(),
            WatchOptions::new(0.0, RootMargin::ZERO),
        );
        assert!(v.is_intersecting);
        assert_eq!(v.ratio, 0.0);
    }

    #[test]
    fn root_margin_css() {
        assert_eq!(RootMargin::px(200.0).to_css(), "200px");
        assert_eq!(RootMargin::px(-72.5).to_css(), "-72.5px");
    }

    #[test]
    fn start_observes_every_target() {
        let set = WatchSet::new(WatchOptions::new(0.0, RootMargin::ZERO), Once::default())
            .with_targets([1, 2, 3, 2]);
        let mut rec = Recorder::default();
        set.start(&mut rec);
        assert_eq!(rec.observed, vec![1, 2, 3]);
        assert_eq!(set.watched_count(), 3);
    }

    #[test]
    fn release_unobserves_once_and_ignores_later_entries() {
        let mut set = WatchSet::new(WatchOptions::new(0.0, RootMargin::ZERO), Once::default())
            .with_targets([7]);
        let mut rec = Recorder::default();
        set.start(&mut rec);

        assert_eq!(set.deliver(&[Crossing::new(7, false, 0.0)], &mut rec), 1);
        assert!(set.is_watched(&7));
        assert!(rec.unobserved.is_empty());

        assert_eq!(set.deliver(&[Crossing::new(7, true, 0.5)], &mut rec), 1);
        assert!(!set.is_watched(&7));
        assert_eq!(rec.unobserved, vec![7]);

        // A stale entry after release never reaches the handler.
        assert_eq!(set.deliver(&[Crossing::new(7, true, 1.0)], &mut rec), 0);
        assert_eq!(set.handler().fired, vec![7]);
        assert_eq!(rec.unobserved, vec![7]);
    }

    #[test]
    fn unregistered_targets_ignored() {
        let mut set = WatchSet::new(WatchOptions::new(0.0, RootMargin::ZERO), Once::default())
            .with_targets([1]);
        let mut rec = Recorder::default();
        assert_eq!(set.deliver(&[Crossing::new(9, true, 1.0)], &mut rec), 0);
        assert!(set.handler().fired.is_empty());
    }

    #[test]
    fn batch_processed_in_order() {
        let mut set = WatchSet::new(WatchOptions::new(0.0, RootMargin::ZERO), Once::default())
            .with_targets([1, 2, 3]);
        let mut rec = Recorder::default();
        let batch = [
            Crossing::new(3, true, 1.0),
            Crossing::new(1, true, 1.0),
            Crossing::new(3, true, 1.0),
        ];
        assert_eq!(set.deliver(&batch, &mut rec), 2);
        assert_eq!(set.handler().fired, vec![3, 1]);
        assert_eq!(rec.unobserved, vec![3, 1]);
        assert_eq!(set.watched_count(), 1);
    }

    proptest! {
        #[test]
        fn measure_ratio_in_unit_range(
            y in -3000.0f64..3000.0,
            h in 0.0f64..2000.0,
            margin in -300.0f64..300.0,
            threshold in 0.0f64..=1.0,
        ) {
            let v = measure(
                Rect::new(0.0, y, 1000.0, h),
                viewport(),
                WatchOptions::new(threshold, RootMargin::px(margin)),
            );
            prop_assert!((0.0..=1.0).contains(&v.ratio));
            if v.is_intersecting {
                prop_assert!(v.ratio >= threshold);
            }
        }
    }
}
