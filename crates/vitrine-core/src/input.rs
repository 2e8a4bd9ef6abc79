#![forbid(unsafe_code)]

//! Host input events and keyboard mapping.

use crate::carousel::CarouselInput;
use crate::nav::Hover;

/// Keys the page reacts to, from DOM `KeyboardEvent.key` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }

    /// Carousel transition bound to this key, if any.
    #[must_use]
    pub fn carousel_input(self) -> Option<CarouselInput> {
        match self {
            Self::ArrowLeft => Some(CarouselInput::Previous),
            Self::ArrowRight => Some(CarouselInput::Next),
            Self::Escape | Self::Other => None,
        }
    }
}

/// Input delivered by the host to [`crate::page::Page::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent<E> {
    /// Click whose event target is `target`.
    Click { target: E },
    KeyDown { key: Key },
    /// `mouseover` (`Hover::Enter`) or `mouseout` (`Hover::Leave`).
    Pointer { target: E, hover: Hover },
    /// Load completion for a deferred image.
    ImageLoaded { image: E },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_keys_map() {
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_dom("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("a"), Key::Other);
    }

    #[test]
    fn arrows_drive_carousel() {
        assert_eq!(
            Key::ArrowLeft.carousel_input(),
            Some(CarouselInput::Previous)
        );
        assert_eq!(Key::ArrowRight.carousel_input(), Some(CarouselInput::Next));
        assert_eq!(Key::Escape.carousel_input(), None);
    }
}
