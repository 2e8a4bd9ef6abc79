#![forbid(unsafe_code)]

//! Deferred image loading.
//!
//! Images ship with a tiny blurred placeholder in `src` and the real URL in
//! `data-src`. On the first intersecting crossing the real URL is copied into
//! `src` and the image is released immediately, whether or not the download
//! has finished. The blur class is only cleared once the host reports the
//! image's load completion, which it must do for cached images too.
//!
//! Per image the lifecycle is strictly
//! [`ImageState::Deferred`] → [`ImageState::SourceApplied`] → [`ImageState::Loaded`].

use tracing::{debug, warn};

use crate::element::Element;
use crate::watch::{Crossing, CrossingHandler, Disposition, WatchOptions, WatchSet};

/// Attribute holding the real image URL.
pub const DEFERRED_SOURCE_ATTR: &str = "data-src";

/// Load progress of one deferred image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    /// Placeholder still showing; real source not assigned.
    Deferred,
    /// Real source assigned, waiting for the load completion signal.
    SourceApplied,
    /// Load completed; placeholder styling removed.
    Loaded,
}

impl ImageState {
    #[must_use]
    pub fn source_applied(self) -> bool {
        !matches!(self, Self::Deferred)
    }

    #[must_use]
    pub fn loaded(self) -> bool {
        matches!(self, Self::Loaded)
    }
}

/// Crossing handler and load tracker for deferred images.
#[derive(Debug, Clone)]
pub struct LazyImages<E> {
    placeholder_class: String,
    images: Vec<(E, ImageState)>,
    pending_loads: Vec<E>,
}

impl<E: Element> LazyImages<E> {
    #[must_use]
    pub fn new(placeholder_class: impl Into<String>, images: &[E]) -> Self {
        Self {
            placeholder_class: placeholder_class.into(),
            images: images
                .iter()
                .map(|img| (img.clone(), ImageState::Deferred))
                .collect(),
            pending_loads: Vec::new(),
        }
    }

    /// Build a watch set over `images` with these options.
    #[must_use]
    pub fn watch(
        placeholder_class: impl Into<String>,
        options: WatchOptions,
        images: Vec<E>,
    ) -> WatchSet<E, Self> {
        let handler = Self::new(placeholder_class, &images);
        WatchSet::new(options, handler).with_targets(images)
    }

    /// State of `image`, `None` if it was never registered.
    #[must_use]
    pub fn state(&self, image: &E) -> Option<ImageState> {
        self.images
            .iter()
            .find(|(img, _)| img == image)
            .map(|(_, state)| *state)
    }

    /// Drain images whose source was just applied.
    ///
    /// The host must attach a one-shot load listener to each and call
    /// [`complete`](Self::complete) when it fires.
    pub fn take_pending_loads(&mut self) -> Vec<E> {
        std::mem::take(&mut self.pending_loads)
    }

    /// Handle the load completion signal for `image`.
    ///
    /// Returns `true` when this call moved the image to [`ImageState::Loaded`].
    /// Signals for unknown images, or for images whose source was never
    /// applied, are ignored.
    pub fn complete(&mut self, image: &E) -> bool {
        let Some((img, state)) = self.images.iter_mut().find(|(img, _)| img == image) else {
            warn!(image = ?image, "load signal for unregistered image ignored");
            return false;
        };
        match *state {
            ImageState::SourceApplied => {
                img.remove_class(&self.placeholder_class);
                *state = ImageState::Loaded;
                debug!(image = ?img, "lazy image loaded");
                true
            }
            ImageState::Deferred => {
                warn!(image = ?img, "load signal before source was applied ignored");
                false
            }
            ImageState::Loaded => false,
        }
    }

    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.images.iter().filter(|(_, s)| s.loaded()).count()
    }
}

impl<E: Element> CrossingHandler<E> for LazyImages<E> {
    fn on_crossing(&mut self, crossing: &Crossing<E>) -> Disposition {
        if !crossing.is_intersecting {
            return Disposition::Keep;
        }
        let image = &crossing.target;
        let Some(src) = image.attribute(DEFERRED_SOURCE_ATTR) else {
            warn!(image = ?image, "deferred image has no data-src");
            return Disposition::Release;
        };
        image.set_attribute("src", &src);
        debug!(src = %src, "lazy image source applied");
        if let Some((_, state)) = self.images.iter_mut().find(|(img, _)| img == image) {
            *state = ImageState::SourceApplied;
        } else {
            self.images.push((image.clone(), ImageState::SourceApplied));
        }
        self.pending_loads.push(image.clone());
        Disposition::Release
    }
}
