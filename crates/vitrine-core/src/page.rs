#![forbid(unsafe_code)]

//! Page aggregate: mounts every component from a [`Document`] and routes
//! host input to them.
//!
//! The host keeps one visibility watcher per [`WatchKind`], created with
//! [`Page::watch_options`], and forwards its deliveries to [`Page::deliver`].
//! DOM input goes through [`Page::dispatch`]. Both return an [`Outcome`]
//! telling the host whether to suppress the browser default and which
//! [`Effect`]s it must carry out (smooth scrolling, load listeners).
//!
//! ```text
//! host click/key/hover ──► dispatch ──► modal | nav | tabs | carousel | cookie
//! host crossings ────────► deliver  ──► sticky nav | reveal | lazy images
//!                                   ◄── Outcome { prevent_default, effects }
//! ```
//!
//! Components whose markup is missing are skipped at mount with a warning
//! and their input is ignored afterwards.

use tracing::{debug, info, warn};

use crate::carousel::{Carousel, CarouselError};
use crate::config::{ConfigError, PageConfig};
use crate::cookie::CookieBanner;
use crate::element::{Document, Element};
use crate::input::{Key, PageEvent};
use crate::lazy_image::{ImageState, LazyImages};
use crate::modal::Modal;
use crate::nav::{self, NavFade};
use crate::reveal::RevealSections;
use crate::sticky_nav::StickyNav;
use crate::tabs::Tabs;
use crate::watch::{Crossing, ViewportWatcher, WatchOptions, WatchSet};

/// Errors from [`Page::mount`].
#[derive(Debug, Clone, PartialEq)]
pub enum MountError {
    Config(ConfigError),
    Carousel(CarouselError),
}

impl core::fmt::Display for MountError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid page config: {err}"),
            Self::Carousel(err) => write!(f, "carousel mount failed: {err}"),
        }
    }
}

impl std::error::Error for MountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Carousel(err) => Some(err),
        }
    }
}

impl From<ConfigError> for MountError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<CarouselError> for MountError {
    fn from(err: CarouselError) -> Self {
        Self::Carousel(err)
    }
}

/// The three families of watched elements, one host watcher each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchKind {
    /// Page header, drives the sticky nav.
    Header,
    /// Content sections, revealed once.
    Sections,
    /// Deferred images, loaded once.
    Images,
}

impl WatchKind {
    pub const ALL: [WatchKind; 3] = [Self::Header, Self::Sections, Self::Images];
}

/// Work the host must perform on the page's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect<E> {
    /// Smoothly scroll the element into view.
    ScrollIntoView(E),
    /// Attach a one-shot load listener and dispatch
    /// [`PageEvent::ImageLoaded`] when it fires.
    AwaitImageLoad(E),
}

/// Result of routing one host event or crossing batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<E> {
    pub prevent_default: bool,
    pub effects: Vec<Effect<E>>,
}

impl<E> Default for Outcome<E> {
    fn default() -> Self {
        Self {
            prevent_default: false,
            effects: Vec::new(),
        }
    }
}

impl<E> Outcome<E> {
    fn prevented() -> Self {
        Self {
            prevent_default: true,
            effects: Vec::new(),
        }
    }
}

/// All interactive components of one mounted page.
pub struct Page<D: Document> {
    doc: D,
    config: PageConfig,
    modal: Option<Modal<D::Element>>,
    scroll_target: Option<D::Element>,
    nav_links: Option<D::Element>,
    slider_left: Option<D::Element>,
    slider_right: Option<D::Element>,
    tabs: Tabs<D::Element>,
    fade: NavFade,
    carousel: Option<Carousel<D::Element>>,
    cookie: Option<CookieBanner<D::Element>>,
    sticky: Option<WatchSet<D::Element, StickyNav<D::Element>>>,
    reveal: WatchSet<D::Element, RevealSections>,
    images: WatchSet<D::Element, LazyImages<D::Element>>,
}

impl<D: Document> Page<D> {
    /// Locate and initialize every component.
    ///
    /// Carousel dots are created here and the first slide is rendered.
    /// Watchers are not started; see [`start_watching`](Self::start_watching).
    pub fn mount(doc: D, config: PageConfig) -> Result<Self, MountError> {
        config.validate()?;
        let sel = &config.selectors;
        let classes = &config.classes;

        let modal = match (doc.query(&sel.modal), doc.query(&sel.overlay)) {
            (Some(modal), Some(overlay)) => Some(Modal::new(modal, overlay, &classes.hidden)),
            _ => {
                warn!("modal or overlay missing; modal disabled");
                None
            }
        };

        let scroll_target = doc.query(&sel.scroll_target);
        let nav_links = doc.query(&sel.nav_links);
        if nav_links.is_none() {
            warn!(selector = %sel.nav_links, "nav links container missing");
        }
        let slider_left = doc.query(&sel.slider_left);
        let slider_right = doc.query(&sel.slider_right);
        let tabs = Tabs::new(
            doc.query_all(&sel.tabs),
            doc.query_all(&sel.tab_contents),
            classes,
        );
        let fade = NavFade::new(classes, config.fade_opacity);

        let carousel = Self::mount_carousel(&doc, &config)?;

        let header = doc.query(&sel.header);
        let cookie = match (&header, config.cookie.enabled) {
            (Some(header), true) => CookieBanner::mount(&doc, header, &config.cookie, classes),
            _ => None,
        };

        let sticky = match (doc.query(&sel.nav), header) {
            (Some(nav), Some(header)) => Some(StickyNav::watch(
                nav,
                &classes.sticky,
                config.sticky_nav.threshold,
                header,
            )),
            _ => {
                warn!("nav or header missing; sticky nav disabled");
                None
            }
        };

        let reveal = RevealSections::watch(
            &classes.section_hidden,
            config.reveal.options(),
            doc.query_all(&sel.sections),
        );
        let images = LazyImages::watch(
            &classes.lazy_image,
            config.lazy_images.options(),
            doc.query_all(&sel.lazy_images),
        );

        info!(
            sections = reveal.targets().len(),
            images = images.targets().len(),
            slides = carousel.as_ref().map_or(0, Carousel::len),
            "page mounted"
        );

        Ok(Self {
            doc,
            config,
            modal,
            scroll_target,
            nav_links,
            slider_left,
            slider_right,
            tabs,
            fade,
            carousel,
            cookie,
            sticky,
            reveal,
            images,
        })
    }

    fn mount_carousel(
        doc: &D,
        config: &PageConfig,
    ) -> Result<Option<Carousel<D::Element>>, MountError> {
        let slides = doc.query_all(&config.selectors.slides);
        if slides.is_empty() {
            warn!("no slides found; carousel disabled");
            return Ok(None);
        }
        let Some(container) = doc.query(&config.selectors.dot_container) else {
            warn!("dot container missing; carousel disabled");
            return Ok(None);
        };
        let carousel = Carousel::mount(
            slides,
            &container,
            &config.classes.dot,
            &config.classes.dot_active,
            || doc.create_element("button"),
        )?;
        Ok(Some(carousel))
    }

    // -----------------------------------------------------------------------
    // Watching
    // -----------------------------------------------------------------------

    /// Options for the host watcher of `kind`; `None` if that family is
    /// disabled.
    #[must_use]
    pub fn watch_options(&self, kind: WatchKind) -> Option<WatchOptions> {
        match kind {
            WatchKind::Header => self.sticky.as_ref().map(WatchSet::options),
            WatchKind::Sections => Some(self.reveal.options()),
            WatchKind::Images => Some(self.images.options()),
        }
    }

    /// Observe every registered target of `kind` on `watcher`.
    pub fn start_watching(&self, kind: WatchKind, watcher: &mut dyn ViewportWatcher<D::Element>) {
        match kind {
            WatchKind::Header => {
                if let Some(sticky) = &self.sticky {
                    sticky.start(watcher);
                }
            }
            WatchKind::Sections => self.reveal.start(watcher),
            WatchKind::Images => self.images.start(watcher),
        }
    }

    /// Unobserve every still-watched target of `kind`.
    pub fn stop_watching(&self, kind: WatchKind, watcher: &mut dyn ViewportWatcher<D::Element>) {
        match kind {
            WatchKind::Header => {
                if let Some(sticky) = &self.sticky {
                    sticky.stop(watcher);
                }
            }
            WatchKind::Sections => self.reveal.stop(watcher),
            WatchKind::Images => self.images.stop(watcher),
        }
    }

    /// Route a batch of crossings from the `kind` watcher.
    pub fn deliver(
        &mut self,
        kind: WatchKind,
        entries: &[Crossing<D::Element>],
        watcher: &mut dyn ViewportWatcher<D::Element>,
    ) -> Outcome<D::Element> {
        let mut outcome = Outcome::default();
        match kind {
            WatchKind::Header => {
                if let Some(sticky) = &mut self.sticky {
                    sticky.deliver(entries, watcher);
                }
            }
            WatchKind::Sections => {
                self.reveal.deliver(entries, watcher);
            }
            WatchKind::Images => {
                self.images.deliver(entries, watcher);
                outcome.effects.extend(
                    self.images
                        .handler_mut()
                        .take_pending_loads()
                        .into_iter()
                        .map(Effect::AwaitImageLoad),
                );
            }
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Route one host input event.
    pub fn dispatch(&mut self, event: PageEvent<D::Element>) -> Outcome<D::Element> {
        match event {
            PageEvent::Click { target } => self.click(&target),
            PageEvent::KeyDown { key } => {
                self.key_down(key);
                Outcome::default()
            }
            PageEvent::Pointer { target, hover } => {
                self.fade.apply(&target, hover);
                Outcome::default()
            }
            PageEvent::ImageLoaded { image } => {
                self.images.handler_mut().complete(&image);
                Outcome::default()
            }
        }
    }

    fn click(&mut self, target: &D::Element) -> Outcome<D::Element> {
        let classes = &self.config.classes;

        if let Some(modal) = &self.modal {
            if target.closest_with_class(&classes.open_modal).is_some() {
                modal.open();
                return Outcome::prevented();
            }
            if target.closest_with_class(&classes.close_modal).is_some()
                || target.has_class(&classes.overlay)
            {
                modal.close();
                return Outcome::default();
            }
        }

        if target.closest_with_class(&classes.scroll_button).is_some() {
            let mut outcome = Outcome::default();
            if let Some(section) = &self.scroll_target {
                outcome.effects.push(Effect::ScrollIntoView(section.clone()));
            }
            return outcome;
        }

        if self
            .nav_links
            .as_ref()
            .is_some_and(|links| target.is_within(links))
        {
            let mut outcome = Outcome::prevented();
            if let Some(href) = nav::link_href(target, classes) {
                match self.doc.query(&href) {
                    Some(section) => {
                        debug!(href = %href, "nav link scroll");
                        outcome.effects.push(Effect::ScrollIntoView(section));
                    }
                    None => warn!(href = %href, "nav link target not found"),
                }
            }
            return outcome;
        }

        if let Some(tab) = self.tabs.tab_for(target) {
            self.tabs.activate(&tab);
            return Outcome::default();
        }

        if let Some(carousel) = &mut self.carousel {
            if target.has_class(&classes.dot) {
                // Rejected indices are logged by the carousel.
                let _ = carousel.go_to_dot(target);
                return Outcome::default();
            }
            if self
                .slider_left
                .as_ref()
                .is_some_and(|button| target.is_within(button))
            {
                carousel.previous();
                return Outcome::default();
            }
            if self
                .slider_right
                .as_ref()
                .is_some_and(|button| target.is_within(button))
            {
                carousel.next();
                return Outcome::default();
            }
        }

        if let Some(cookie) = &mut self.cookie
            && cookie.is_close_button(target)
        {
            cookie.dismiss();
        }
        Outcome::default()
    }

    fn key_down(&mut self, key: Key) {
        if key == Key::Escape
            && let Some(modal) = &self.modal
        {
            modal.escape();
        }
        if let (Some(input), Some(carousel)) = (key.carousel_input(), &mut self.carousel) {
            // Arrow keys never produce out-of-range input.
            let _ = carousel.apply(input);
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.doc
    }

    #[must_use]
    pub fn carousel(&self) -> Option<&Carousel<D::Element>> {
        self.carousel.as_ref()
    }

    pub fn carousel_mut(&mut self) -> Option<&mut Carousel<D::Element>> {
        self.carousel.as_mut()
    }

    #[must_use]
    pub fn modal(&self) -> Option<&Modal<D::Element>> {
        self.modal.as_ref()
    }

    #[must_use]
    pub fn tabs(&self) -> &Tabs<D::Element> {
        &self.tabs
    }

    #[must_use]
    pub fn cookie(&self) -> Option<&CookieBanner<D::Element>> {
        self.cookie.as_ref()
    }

    #[must_use]
    pub fn is_sticky(&self) -> bool {
        self.sticky
            .as_ref()
            .is_some_and(|sticky| sticky.handler().is_sticky())
    }

    #[must_use]
    pub fn sections(&self) -> &WatchSet<D::Element, RevealSections> {
        &self.reveal
    }

    #[must_use]
    pub fn images(&self) -> &WatchSet<D::Element, LazyImages<D::Element>> {
        &self.images
    }

    #[must_use]
    pub fn image_state(&self, image: &D::Element) -> Option<ImageState> {
        self.images.handler().state(image)
    }
}
