#![forbid(unsafe_code)]

//! Slide carousel.
//!
//! A fixed, non-empty list of slides plus one indicator dot per slide.
//! `current` is the only mutable state; both views are pure functions of it
//! and are recomputed in full after every transition:
//!
//! - slide `i` is translated by `100 * (i - current)` percent of track width;
//! - exactly one dot, `dots[current]`, carries the active class.
//!
//! All input channels (slider buttons, arrow keys, dot clicks) reduce to
//! [`Carousel::next`], [`Carousel::previous`] and [`Carousel::go_to`].
//!
//! ```text
//! current = 1, N = 4
//! slide:    0      1     2      3
//! offset: -100%   0%   100%   200%
//! dot:      ·      ●     ·      ·
//! ```

use tracing::{debug, warn};

use crate::element::Element;

/// Attribute carrying a dot's slide index as a decimal string.
pub const DOT_INDEX_ATTR: &str = "data-slide";

/// Errors from constructing or driving a [`Carousel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselError {
    /// No slides were found.
    NoSlides,
    /// Dot list length differs from slide list length.
    DotCountMismatch { slides: usize, dots: usize },
    /// `go_to` target outside `0..len`.
    IndexOutOfRange { index: usize, len: usize },
    /// Clicked dot has no index attribute.
    MissingDotIndex,
    /// Dot index attribute is not a non-negative integer.
    InvalidDotIndex(String),
}

impl core::fmt::Display for CarouselError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoSlides => write!(f, "carousel has no slides"),
            Self::DotCountMismatch { slides, dots } => {
                write!(f, "carousel has {slides} slides but {dots} dots")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "slide index {index} out of range for {len} slides")
            }
            Self::MissingDotIndex => write!(f, "dot is missing its {DOT_INDEX_ATTR} attribute"),
            Self::InvalidDotIndex(raw) => write!(f, "invalid dot index: {raw:?}"),
        }
    }
}

impl std::error::Error for CarouselError {}

/// Input reduced to a carousel transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselInput {
    Previous,
    Next,
    GoTo(usize),
}

/// Parse a dot's index attribute value.
pub fn parse_dot_index(raw: &str) -> Result<usize, CarouselError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| CarouselError::InvalidDotIndex(raw.to_owned()))
}

/// Horizontal offset of slide `slide` when `current` is shown, in percent.
#[must_use]
pub fn slide_offset(slide: usize, current: usize) -> i64 {
    100 * (slide as i64 - current as i64)
}

/// Carousel over host elements.
#[derive(Debug, Clone)]
pub struct Carousel<E> {
    slides: Vec<E>,
    dots: Vec<E>,
    active_class: String,
    current: usize,
}

impl<E: Element> Carousel<E> {
    /// Build a carousel from slides and their already-created dots, and
    /// render the initial state (slide 0, dot 0 active).
    pub fn new(
        slides: Vec<E>,
        dots: Vec<E>,
        active_class: impl Into<String>,
    ) -> Result<Self, CarouselError> {
        if slides.is_empty() {
            return Err(CarouselError::NoSlides);
        }
        if dots.len() != slides.len() {
            return Err(CarouselError::DotCountMismatch {
                slides: slides.len(),
                dots: dots.len(),
            });
        }
        let carousel = Self {
            slides,
            dots,
            active_class: active_class.into(),
            current: 0,
        };
        carousel.render();
        Ok(carousel)
    }

    /// Create one dot per slide inside `container`, then build the carousel.
    ///
    /// `create_dot` returns a fresh element; it is given `dot_class` and a
    /// `data-slide` attribute here, and appended in slide order.
    pub fn mount(
        slides: Vec<E>,
        container: &E,
        dot_class: &str,
        active_class: impl Into<String>,
        mut create_dot: impl FnMut() -> Option<E>,
    ) -> Result<Self, CarouselError> {
        let mut dots = Vec::with_capacity(slides.len());
        for i in 0..slides.len() {
            let Some(dot) = create_dot() else {
                break;
            };
            dot.add_class(dot_class);
            dot.set_attribute(DOT_INDEX_ATTR, &i.to_string());
            container.append_child(&dot);
            dots.push(dot);
        }
        Self::new(slides, dots, active_class)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false: construction rejects an empty slide list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn slides(&self) -> &[E] {
        &self.slides
    }

    #[must_use]
    pub fn dots(&self) -> &[E] {
        &self.dots
    }

    /// Advance one slide, wrapping from the last to the first.
    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.len();
        self.transitioned("next");
    }

    /// Go back one slide, wrapping from the first to the last.
    pub fn previous(&mut self) {
        let len = self.len();
        self.current = (self.current + len - 1) % len;
        self.transitioned("previous");
    }

    /// Jump to `index`. Out-of-range indices are rejected and leave the
    /// carousel untouched.
    pub fn go_to(&mut self, index: usize) -> Result<(), CarouselError> {
        let len = self.len();
        if index >= len {
            warn!(index, len, "go_to index out of range ignored");
            return Err(CarouselError::IndexOutOfRange { index, len });
        }
        self.current = index;
        self.transitioned("go_to");
        Ok(())
    }

    /// Jump to the slide named by a clicked dot's index attribute.
    pub fn go_to_dot(&mut self, dot: &E) -> Result<(), CarouselError> {
        let raw = dot.attribute(DOT_INDEX_ATTR).ok_or_else(|| {
            warn!(dot = ?dot, "dot without index clicked");
            CarouselError::MissingDotIndex
        })?;
        let index = parse_dot_index(&raw).inspect_err(|_| {
            warn!(raw = %raw, "unparsable dot index");
        })?;
        self.go_to(index)
    }

    pub fn apply(&mut self, input: CarouselInput) -> Result<(), CarouselError> {
        match input {
            CarouselInput::Previous => {
                self.previous();
                Ok(())
            }
            CarouselInput::Next => {
                self.next();
                Ok(())
            }
            CarouselInput::GoTo(index) => self.go_to(index),
        }
    }

    /// Offset of slide `slide` under the current state, in percent.
    #[must_use]
    pub fn offset_of(&self, slide: usize) -> i64 {
        slide_offset(slide, self.current)
    }

    fn transitioned(&self, via: &'static str) {
        self.render();
        debug!(via, current = self.current, len = self.len(), "slide changed");
    }

    fn render(&self) {
        for (i, slide) in self.slides.iter().enumerate() {
            let offset = slide_offset(i, self.current);
            slide.set_style("transform", &format!("translateX({offset}%)"));
        }
        for dot in &self.dots {
            dot.remove_class(&self.active_class);
        }
        self.dots[self.current].add_class(&self.active_class);
    }
}
