#![forbid(unsafe_code)]

//! Account-opening modal and its overlay.
//!
//! Open/closed is read back from the modal's hidden class, so markup that
//! starts visible is handled without extra state.

use tracing::debug;

use crate::element::Element;

#[derive(Debug, Clone)]
pub struct Modal<E> {
    modal: E,
    overlay: E,
    hidden_class: String,
}

impl<E: Element> Modal<E> {
    #[must_use]
    pub fn new(modal: E, overlay: E, hidden_class: impl Into<String>) -> Self {
        Self {
            modal,
            overlay,
            hidden_class: hidden_class.into(),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.modal.has_class(&self.hidden_class)
    }

    pub fn open(&self) {
        self.modal.remove_class(&self.hidden_class);
        self.overlay.remove_class(&self.hidden_class);
        debug!("modal opened");
    }

    pub fn close(&self) {
        self.modal.add_class(&self.hidden_class);
        self.overlay.add_class(&self.hidden_class);
        debug!("modal closed");
    }

    /// Close on Escape, but only when open. Returns whether it closed.
    pub fn escape(&self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.close();
        true
    }
}
