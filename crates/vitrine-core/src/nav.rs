#![forbid(unsafe_code)]

//! Navigation bar behaviors: hover fade and in-page link resolution.

use crate::config::ClassNames;
use crate::element::Element;

/// Pointer hover direction over the nav.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hover {
    Enter,
    Leave,
}

/// Fades sibling nav links and the logo while one link is hovered.
#[derive(Debug, Clone, PartialEq)]
pub struct NavFade {
    pub nav_class: String,
    pub link_class: String,
    /// Opacity applied on [`Hover::Enter`].
    pub faded: f64,
    /// Opacity restored on [`Hover::Leave`].
    pub restored: f64,
}

impl NavFade {
    #[must_use]
    pub fn new(classes: &ClassNames, faded: f64) -> Self {
        Self {
            nav_class: classes.nav.clone(),
            link_class: classes.nav_link.clone(),
            faded,
            restored: 1.0,
        }
    }

    #[must_use]
    pub fn opacity(&self, hover: Hover) -> f64 {
        match hover {
            Hover::Enter => self.faded,
            Hover::Leave => self.restored,
        }
    }

    /// Apply the fade for a pointer event on `target`.
    ///
    /// Does nothing unless `target` is itself a nav link. Returns the number
    /// of elements whose opacity was set.
    pub fn apply<E: Element>(&self, target: &E, hover: Hover) -> usize {
        if !target.has_class(&self.link_class) {
            return 0;
        }
        let Some(nav) = target.closest_with_class(&self.nav_class) else {
            return 0;
        };
        let opacity = self.opacity(hover).to_string();
        let mut touched = 0;
        for sibling in nav.query_all(&format!(".{}", self.link_class)) {
            if sibling != *target {
                sibling.set_style("opacity", &opacity);
                touched += 1;
            }
        }
        if let Some(logo) = nav.query("img") {
            logo.set_style("opacity", &opacity);
            touched += 1;
        }
        touched
    }
}

/// In-page anchor target for a click inside the nav links container.
///
/// Returns the link's `href` when `target` is a plain nav link (not the
/// call-to-action button link).
#[must_use]
pub fn link_href<E: Element>(target: &E, classes: &ClassNames) -> Option<String> {
    if target.has_class(&classes.nav_link) && !target.has_class(&classes.nav_link_button) {
        target.attribute("href")
    } else {
        None
    }
}
