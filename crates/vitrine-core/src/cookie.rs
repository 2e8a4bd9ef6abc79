#![forbid(unsafe_code)]

//! Cookie notice appended to the header at mount time.

use tracing::debug;

use crate::config::{ClassNames, CookieConfig};
use crate::element::{Document, Element};

/// Extra height added to the banner's natural height, in pixels.
const BANNER_EXTRA_HEIGHT_PX: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct CookieBanner<E> {
    message: E,
    close: E,
    dismissed: bool,
}

impl<E: Element> CookieBanner<E> {
    /// Create the banner, append it to `header`, and style it.
    ///
    /// Returns `None` if the host cannot create elements.
    pub fn mount<D>(
        doc: &D,
        header: &E,
        config: &CookieConfig,
        classes: &ClassNames,
    ) -> Option<Self>
    where
        D: Document<Element = E>,
    {
        let message = doc.create_element("div")?;
        let text = doc.create_element("span")?;
        let close = doc.create_element("button")?;

        message.add_class(&classes.cookie_message);
        text.set_text(&config.message);
        close.add_class("btn");
        close.add_class(&classes.cookie_close);
        close.set_text(&config.button_label);
        message.append_child(&text);
        message.append_child(&close);
        header.append_child(&message);

        message.set_style("background-color", &config.background);
        message.set_style("width", "120%");
        // Height depends on the rendered text, so it is read after appending.
        let height = message.height() + BANNER_EXTRA_HEIGHT_PX;
        message.set_style("height", &format!("{height}px"));
        message.set_style("position", "fixed");
        message.set_style("bottom", "0");
        message.set_style("z-index", "100");

        Some(Self {
            message,
            close,
            dismissed: false,
        })
    }

    /// Whether `target` is this banner's close button.
    #[must_use]
    pub fn is_close_button(&self, target: &E) -> bool {
        !self.dismissed && *target == self.close
    }

    /// Remove the banner. Idempotent.
    pub fn dismiss(&mut self) {
        if self.dismissed {
            return;
        }
        self.message.remove();
        self.dismissed = true;
        debug!("cookie banner dismissed");
    }

    #[must_use]
    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    #[must_use]
    pub fn element(&self) -> &E {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::fake::FakeElement;
    use pretty_assertions::assert_eq;

    struct FakeDoc;

    impl Document for FakeDoc {
        type Element = FakeElement;

        fn query(&self, _selector: &str) -> Option<FakeElement> {
            None
        }

        fn query_all(&self, _selector: &str) -> Vec<FakeElement> {
            Vec::new()
        }

        fn create_element(&self, tag: &str) -> Option<FakeElement> {
            let el = FakeElement::new(tag);
            if tag == "div" {
                el.set_height(50.0);
            }
            Some(el)
        }
    }

    #[test]
    fn mount_builds_and_styles_banner() {
        let header = FakeElement::with_classes("header", &["header"]);
        let banner = CookieBanner::mount(
            &FakeDoc,
            &header,
            &CookieConfig::default(),
            &ClassNames::default(),
        )
        .unwrap();

        let children = header.children();
        assert_eq!(children.len(), 1);
        let message = &children[0];
        assert!(message.has_class("cookie-message"));
        assert_eq!(message.style("height").as_deref(), Some("80px"));
        assert_eq!(message.style("position").as_deref(), Some("fixed"));
        assert_eq!(message.style("background-color").as_deref(), Some("#37383d"));

        let parts = message.children();
        assert_eq!(parts[1].text(), "Got it!");
        assert!(banner.is_close_button(&parts[1]));
        assert!(!banner.is_close_button(&parts[0]));
    }

    #[test]
    fn dismiss_removes_once() {
        let header = FakeElement::with_classes("header", &["header"]);
        let mut banner = CookieBanner::mount(
            &FakeDoc,
            &header,
            &CookieConfig::default(),
            &ClassNames::default(),
        )
        .unwrap();
        let close = banner.element().children()[1].clone();

        banner.dismiss();
        assert!(banner.is_dismissed());
        assert!(banner.element().is_removed());
        assert!(header.children().is_empty());
        assert!(!banner.is_close_button(&close));
        banner.dismiss();
        assert!(banner.is_dismissed());
    }
}
