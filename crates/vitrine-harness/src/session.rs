#![forbid(unsafe_code)]

//! Simulated host driving a mounted [`Page`].
//!
//! [`SimulatedPage`] plays the role the browser glue plays in production:
//! it owns one [`SimWatcher`] per [`WatchKind`], forwards their entries to
//! the page after every scroll, feeds DOM-like input through
//! [`Page::dispatch`], and carries out the returned [`Effect`]s. Smooth
//! scrolling is instantaneous here; image loads stay pending until the test
//! calls [`SimulatedPage::finish_load`].

use tracing::debug;
use vitrine_core::input::{Key, PageEvent};
use vitrine_core::nav::Hover;
use vitrine_core::page::{Effect, MountError, Outcome, Page, WatchKind};
use vitrine_core::PageConfig;

use crate::sim_dom::{SimDocument, SimElement};
use crate::trace::{SessionTrace, TraceEvent};
use crate::viewport::{SimViewport, SimWatcher};

/// A mounted page plus its simulated host state.
pub struct SimulatedPage {
    page: Page<SimDocument>,
    viewport: SimViewport,
    watchers: Vec<(WatchKind, SimWatcher)>,
    pending_loads: Vec<SimElement>,
    scrolled_into_view: Vec<SimElement>,
    trace: SessionTrace,
}

impl std::fmt::Debug for SimulatedPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedPage")
            .field("viewport", &self.viewport)
            .field("pending_loads", &self.pending_loads)
            .field("events", &self.trace.events().len())
            .finish()
    }
}

fn watch_name(kind: WatchKind) -> &'static str {
    match kind {
        WatchKind::Header => "header",
        WatchKind::Sections => "sections",
        WatchKind::Images => "images",
    }
}

impl SimulatedPage {
    /// Mount the page, start every enabled watcher and deliver the initial
    /// entries.
    pub fn mount(
        doc: SimDocument,
        config: PageConfig,
        viewport: SimViewport,
    ) -> Result<Self, MountError> {
        let page = Page::mount(doc, config)?;
        let mut trace = SessionTrace::new("vitrine_sim");
        trace.push(TraceEvent::Mount {
            sections: page.sections().targets().len(),
            images: page.images().targets().len(),
            slides: page.carousel().map_or(0, |c| c.len()),
        });

        let mut watchers = Vec::new();
        for kind in WatchKind::ALL {
            if let Some(options) = page.watch_options(kind) {
                let mut watcher = SimWatcher::new(options);
                page.start_watching(kind, &mut watcher);
                watchers.push((kind, watcher));
            }
        }

        let mut sim = Self {
            page,
            viewport,
            watchers,
            pending_loads: Vec::new(),
            scrolled_into_view: Vec::new(),
            trace,
        };
        sim.settle();
        Ok(sim)
    }

    /// Deliver every due crossing to the page. Returns the number of
    /// entries delivered.
    pub fn settle(&mut self) -> usize {
        let mut delivered = 0;
        let mut effects = Vec::new();
        for (kind, watcher) in &mut self.watchers {
            let entries = watcher.collect(&self.viewport);
            if entries.is_empty() {
                continue;
            }
            for entry in &entries {
                self.trace.push(TraceEvent::Crossing {
                    watcher: watch_name(*kind).to_owned(),
                    element: entry.target.label(),
                    intersecting: entry.is_intersecting,
                    ratio: entry.intersection_ratio,
                });
            }
            delivered += entries.len();
            let outcome = self.page.deliver(*kind, &entries, watcher);
            effects.extend(outcome.effects);
        }
        self.apply_effects(effects);
        delivered
    }

    /// Jump the viewport to `y` and deliver any resulting crossings.
    pub fn scroll_to(&mut self, y: f64) -> usize {
        self.viewport.scroll_y = y.max(0.0);
        self.trace.push(TraceEvent::Scroll {
            y: self.viewport.scroll_y,
        });
        self.settle()
    }

    pub fn click(&mut self, target: &SimElement) -> Outcome<SimElement> {
        let outcome = self.page.dispatch(PageEvent::Click {
            target: target.clone(),
        });
        self.trace.push(TraceEvent::Click {
            element: target.label(),
            prevent_default: outcome.prevent_default,
        });
        self.apply_effects(outcome.effects.clone());
        outcome
    }

    /// Press a key by its DOM `KeyboardEvent.key` name.
    pub fn key(&mut self, key: &str) {
        self.trace.push(TraceEvent::Key { key: key.to_owned() });
        self.page.dispatch(PageEvent::KeyDown {
            key: Key::from_dom(key),
        });
    }

    pub fn hover(&mut self, target: &SimElement, hover: Hover) {
        self.trace.push(TraceEvent::Hover {
            element: target.label(),
            enter: hover == Hover::Enter,
        });
        self.page.dispatch(PageEvent::Pointer {
            target: target.clone(),
            hover,
        });
    }

    /// Fire the load event for a pending image. Returns `false` if no load
    /// was pending for it.
    pub fn finish_load(&mut self, image: &SimElement) -> bool {
        let Some(pos) = self.pending_loads.iter().position(|p| p == image) else {
            return false;
        };
        self.pending_loads.remove(pos);
        self.trace.push(TraceEvent::Loaded {
            element: image.label(),
        });
        self.page.dispatch(PageEvent::ImageLoaded {
            image: image.clone(),
        });
        true
    }

    /// Fire every pending load, in the order they were requested.
    pub fn finish_all_loads(&mut self) -> usize {
        let pending = self.pending_loads.clone();
        pending.iter().filter(|img| self.finish_load(img)).count()
    }

    /// Stop every watcher, as on page teardown.
    pub fn stop_watching(&mut self) {
        for (kind, watcher) in &mut self.watchers {
            self.page.stop_watching(*kind, watcher);
        }
    }

    fn apply_effects(&mut self, effects: Vec<Effect<SimElement>>) {
        let mut moved = false;
        for effect in effects {
            match effect {
                Effect::ScrollIntoView(el) => {
                    self.trace.push(TraceEvent::ScrollIntoView {
                        element: el.label(),
                    });
                    self.viewport.scroll_y = el.rect().y;
                    self.scrolled_into_view.push(el);
                    moved = true;
                }
                Effect::AwaitImageLoad(el) => {
                    self.trace.push(TraceEvent::AwaitLoad {
                        element: el.label(),
                    });
                    if !self.pending_loads.contains(&el) {
                        self.pending_loads.push(el);
                    }
                }
            }
        }
        if moved {
            debug!(y = self.viewport.scroll_y, "simulated smooth scroll");
            self.settle();
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn page(&self) -> &Page<SimDocument> {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page<SimDocument> {
        &mut self.page
    }

    #[must_use]
    pub fn document(&self) -> &SimDocument {
        self.page.document()
    }

    #[must_use]
    pub fn viewport(&self) -> SimViewport {
        self.viewport
    }

    #[must_use]
    pub fn watcher(&self, kind: WatchKind) -> Option<&SimWatcher> {
        self.watchers
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, w)| w)
    }

    #[must_use]
    pub fn pending_loads(&self) -> &[SimElement] {
        &self.pending_loads
    }

    /// Elements smooth-scrolled to so far, in order.
    #[must_use]
    pub fn scrolled_into_view(&self) -> &[SimElement] {
        &self.scrolled_into_view
    }

    #[must_use]
    pub fn trace(&self) -> &SessionTrace {
        &self.trace
    }
}
