#![forbid(unsafe_code)]

//! Tabbed operations component.
//!
//! Each tab button carries `data-tab="<n>"`; its content panel carries the
//! class `<content_prefix><n>`. Activating a tab makes it and its panel the
//! only active ones.

use tracing::{debug, warn};

use crate::config::ClassNames;
use crate::element::Element;

/// Attribute naming the content panel a tab controls.
pub const TAB_ATTR: &str = "data-tab";

#[derive(Debug, Clone)]
pub struct Tabs<E> {
    tabs: Vec<E>,
    contents: Vec<E>,
    tab_class: String,
    tab_active: String,
    content_active: String,
    content_prefix: String,
}

impl<E: Element> Tabs<E> {
    #[must_use]
    pub fn new(tabs: Vec<E>, contents: Vec<E>, classes: &ClassNames) -> Self {
        Self {
            tabs,
            contents,
            tab_class: classes.tab.clone(),
            tab_active: classes.tab_active.clone(),
            content_active: classes.content_active.clone(),
            content_prefix: classes.content_prefix.clone(),
        }
    }

    /// Resolve a click target to its tab, if the click landed inside one.
    #[must_use]
    pub fn tab_for(&self, target: &E) -> Option<E> {
        target
            .closest_with_class(&self.tab_class)
            .filter(|tab| self.tabs.contains(tab))
    }

    /// Activate `tab` and its content panel.
    ///
    /// Returns the panel id on success, `None` when the tab has no
    /// `data-tab` attribute (nothing changes in that case).
    pub fn activate(&self, tab: &E) -> Option<String> {
        let Some(id) = tab.attribute(TAB_ATTR) else {
            warn!(tab = ?tab, "tab without data-tab ignored");
            return None;
        };
        for t in &self.tabs {
            t.remove_class(&self.tab_active);
        }
        tab.add_class(&self.tab_active);

        for content in &self.contents {
            content.remove_class(&self.content_active);
        }
        let panel_class = format!("{}{}", self.content_prefix, id);
        match self.contents.iter().find(|c| c.has_class(&panel_class)) {
            Some(panel) => panel.add_class(&self.content_active),
            None => warn!(panel = %panel_class, "tab content panel missing"),
        }
        debug!(tab = %id, "tab activated");
        Some(id)
    }

    /// Index of the active tab, if exactly one is active.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        let mut active = self
            .tabs
            .iter()
            .enumerate()
            .filter(|(_, t)| t.has_class(&self.tab_active));
        match (active.next(), active.next()) {
            (Some((i, _)), None) => Some(i),
            _ => None,
        }
    }
}
