#![forbid(unsafe_code)]

//! Page configuration.
//!
//! [`PageConfig::default`] reproduces the stock landing page markup: every
//! selector, class name, threshold, and margin below matches the shipped
//! HTML and CSS. Hosts may override any subset by passing a camelCase JSON
//! document to [`PageConfig::from_json`]; omitted fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::watch::{RootMargin, WatchOptions};

/// Errors from parsing or validating a [`PageConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Malformed JSON or a field of the wrong type.
    Json(String),
    /// A watch threshold outside `[0, 1]`.
    ThresholdOutOfRange { field: &'static str, value: f64 },
    /// Fade opacity outside `[0, 1]`.
    OpacityOutOfRange(f64),
    /// A required selector was configured as an empty string.
    EmptySelector(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "config JSON error: {msg}"),
            Self::ThresholdOutOfRange { field, value } => {
                write!(f, "{field} threshold {value} is outside [0, 1]")
            }
            Self::OpacityOutOfRange(value) => {
                write!(f, "fade opacity {value} is outside [0, 1]")
            }
            Self::EmptySelector(field) => write!(f, "selector `{field}` is empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// CSS selectors used to locate page components at mount time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Selectors {
    pub modal: String,
    pub overlay: String,
    pub header: String,
    pub nav: String,
    pub nav_links: String,
    pub sections: String,
    pub scroll_target: String,
    pub tabs: String,
    pub tab_contents: String,
    pub lazy_images: String,
    pub slides: String,
    pub dot_container: String,
    pub slider_left: String,
    pub slider_right: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            modal: ".modal".into(),
            overlay: ".overlay".into(),
            header: ".header".into(),
            nav: ".nav".into(),
            nav_links: ".nav__links".into(),
            sections: ".section".into(),
            scroll_target: "#section--1".into(),
            tabs: ".operations__tab".into(),
            tab_contents: ".operations__content".into(),
            lazy_images: "img[data-src]".into(),
            slides: ".slide".into(),
            dot_container: ".dots".into(),
            slider_left: ".slider__btn--left".into(),
            slider_right: ".slider__btn--right".into(),
        }
    }
}

impl Selectors {
    fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&'static str, &str); 14] = [
            ("modal", &self.modal),
            ("overlay", &self.overlay),
            ("header", &self.header),
            ("nav", &self.nav),
            ("navLinks", &self.nav_links),
            ("sections", &self.sections),
            ("scrollTarget", &self.scroll_target),
            ("tabs", &self.tabs),
            ("tabContents", &self.tab_contents),
            ("lazyImages", &self.lazy_images),
            ("slides", &self.slides),
            ("dotContainer", &self.dot_container),
            ("sliderLeft", &self.slider_left),
            ("sliderRight", &self.slider_right),
        ];
        match required.iter().find(|(_, sel)| sel.trim().is_empty()) {
            Some((field, _)) => Err(ConfigError::EmptySelector(field)),
            None => Ok(()),
        }
    }
}

/// Class names toggled or matched by the components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassNames {
    pub hidden: String,
    pub section_hidden: String,
    pub lazy_image: String,
    pub sticky: String,
    pub nav: String,
    pub dot: String,
    pub dot_active: String,
    pub tab: String,
    pub tab_active: String,
    pub content_active: String,
    pub content_prefix: String,
    pub nav_link: String,
    pub nav_link_button: String,
    pub open_modal: String,
    pub close_modal: String,
    pub overlay: String,
    pub scroll_button: String,
    pub cookie_message: String,
    pub cookie_close: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            hidden: "hidden".into(),
            section_hidden: "section--hidden".into(),
            lazy_image: "lazy-img".into(),
            sticky: "sticky".into(),
            nav: "nav".into(),
            dot: "dots__dot".into(),
            dot_active: "dots__dot--active".into(),
            tab: "operations__tab".into(),
            tab_active: "operations__tab--active".into(),
            content_active: "operations__content--active".into(),
            content_prefix: "operations__content--".into(),
            nav_link: "nav__link".into(),
            nav_link_button: "nav__link--btn".into(),
            open_modal: "btn--show-modal".into(),
            close_modal: "btn--close-modal".into(),
            overlay: "overlay".into(),
            scroll_button: "btn--scroll-to".into(),
            cookie_message: "cookie-message".into(),
            cookie_close: "btn--close-cookie".into(),
        }
    }
}

/// Threshold and root margin for one family of watch targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchSettings {
    pub threshold: f64,
    pub root_margin_px: f64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin_px: 0.0,
        }
    }
}

impl WatchSettings {
    #[must_use]
    pub fn options(&self) -> WatchOptions {
        WatchOptions::new(self.threshold, RootMargin::px(self.root_margin_px))
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.threshold) {
            Ok(())
        } else {
            Err(ConfigError::ThresholdOutOfRange {
                field,
                value: self.threshold,
            })
        }
    }
}

/// Cookie banner text and switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CookieConfig {
    pub enabled: bool,
    pub message: String,
    pub button_label: String,
    pub background: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            message: "We use cookies for improved functionality and analytics.".into(),
            button_label: "Got it!".into(),
            background: "#37383d".into(),
        }
    }
}

/// Complete configuration for mounting a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    pub selectors: Selectors,
    pub classes: ClassNames,
    pub reveal: WatchSettings,
    pub lazy_images: WatchSettings,
    /// Only the threshold is used; the margin is derived from the nav height.
    pub sticky_nav: WatchSettings,
    pub fade_opacity: f64,
    pub cookie: CookieConfig,
    pub log_filter: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            classes: ClassNames::default(),
            reveal: WatchSettings {
                threshold: 0.15,
                root_margin_px: 0.0,
            },
            lazy_images: WatchSettings {
                threshold: 0.0,
                root_margin_px: 200.0,
            },
            sticky_nav: WatchSettings::default(),
            fade_opacity: 0.5,
            cookie: CookieConfig::default(),
            log_filter: "info".into(),
        }
    }
}

impl PageConfig {
    /// Parse a (possibly partial) camelCase JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.selectors.validate()?;
        self.reveal.validate("reveal")?;
        self.lazy_images.validate("lazyImages")?;
        self.sticky_nav.validate("stickyNav")?;
        if !(0.0..=1.0).contains(&self.fade_opacity) {
            return Err(ConfigError::OpacityOutOfRange(self.fade_opacity));
        }
        Ok(())
    }
}
