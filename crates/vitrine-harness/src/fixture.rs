#![forbid(unsafe_code)]

//! Reference landing-page markup with fixed geometry.
//!
//! Layout in a 1200x800 viewport (document y coordinates):
//!
//! ```text
//!    0.. 800  header            (nav 0..90, scroll button at 600)
//!  800..1800  #section--1       (deferred images at 1100, 1400, 1650)
//! 1800..2700  #section--2       (tabs 1-3 and their panels)
//! 2700..3600  #section--3       (slider with N slides, arrows, dots)
//! 3600..4200  section--sign-up
//! ```
//!
//! The modal and overlay sit outside the flow with zero-height rects.

use vitrine_core::element::Element;
use vitrine_core::tabs::TAB_ATTR;
use vitrine_core::watch::Rect;

use crate::sim_dom::{SimDocument, SimElement};

pub const PAGE_WIDTH: f64 = 1200.0;
pub const NAV_HEIGHT: f64 = 90.0;
pub const HEADER_HEIGHT: f64 = 800.0;
pub const TAB_COUNT: usize = 3;

/// Section rows as `(id, top, height)`.
pub const SECTIONS: [(&str, f64, f64); 4] = [
    ("section--1", 800.0, 1000.0),
    ("section--2", 1800.0, 900.0),
    ("section--3", 2700.0, 900.0),
    ("section--sign-up", 3600.0, 600.0),
];

/// Top of each deferred image inside section 1.
pub const IMAGE_TOPS: [f64; 3] = [1100.0, 1400.0, 1650.0];
pub const IMAGE_HEIGHT: f64 = 150.0;

/// Handles to the interesting parts of the reference page.
#[derive(Debug, Clone)]
pub struct LandingFixture {
    pub doc: SimDocument,
    pub header: SimElement,
    pub nav: SimElement,
    pub logo: SimElement,
    /// Plain in-page links, one per content section.
    pub nav_links: Vec<SimElement>,
    /// The "Open account" link that opens the modal.
    pub nav_cta: SimElement,
    pub scroll_button: SimElement,
    pub sections: Vec<SimElement>,
    pub images: Vec<SimElement>,
    pub tabs: Vec<SimElement>,
    /// The `<span>` label inside each tab button.
    pub tab_labels: Vec<SimElement>,
    pub tab_contents: Vec<SimElement>,
    pub slides: Vec<SimElement>,
    pub slider_left: SimElement,
    pub slider_right: SimElement,
    pub dots: SimElement,
    pub modal: SimElement,
    pub close_modal: SimElement,
    pub overlay: SimElement,
    pub open_account_buttons: Vec<SimElement>,
}

fn row(top: f64, height: f64) -> Rect {
    Rect::new(0.0, top, PAGE_WIDTH, height)
}

impl LandingFixture {
    /// Build the reference page with `slide_count` carousel slides.
    #[must_use]
    pub fn new(slide_count: usize) -> Self {
        let doc = SimDocument::new();
        let body = doc.body();

        let header = doc
            .element("header", &["header"])
            .with_rect(row(0.0, HEADER_HEIGHT))
            .appended_to(&body);
        let nav = doc
            .element("nav", &["nav"])
            .with_rect(row(0.0, NAV_HEIGHT))
            .appended_to(&header);
        let logo = doc
            .element("img", &["nav__logo"])
            .with_attr("alt", "Bankist logo")
            .appended_to(&nav);
        let list = doc.element("ul", &["nav__links"]).appended_to(&nav);

        let mut nav_links = Vec::new();
        for (id, label) in [
            ("section--1", "Features"),
            ("section--2", "Operations"),
            ("section--3", "Testimonials"),
        ] {
            let item = doc.element("li", &["nav__item"]).appended_to(&list);
            let link = doc
                .element("a", &["nav__link"])
                .with_attr("href", &format!("#{id}"))
                .appended_to(&item);
            link.set_text(label);
            nav_links.push(link);
        }
        let item = doc.element("li", &["nav__item"]).appended_to(&list);
        let nav_cta = doc
            .element("a", &["nav__link", "nav__link--btn", "btn--show-modal"])
            .with_attr("href", "#")
            .appended_to(&item);
        nav_cta.set_text("Open account");

        let scroll_button = doc
            .element("button", &["btn--text", "btn--scroll-to"])
            .with_rect(Rect::new(100.0, 600.0, 200.0, 40.0))
            .appended_to(&header);
        scroll_button.set_text("Learn more");

        let sections: Vec<SimElement> = SECTIONS
            .iter()
            .map(|&(id, top, height)| {
                doc.element("section", &["section"])
                    .with_attr("id", id)
                    .with_rect(row(top, height))
                    .appended_to(&body)
            })
            .collect();
        for section in &sections {
            section.add_class("section--hidden");
        }

        let images = IMAGE_TOPS
            .iter()
            .enumerate()
            .map(|(i, &top)| {
                doc.element("img", &["features__img", "lazy-img"])
                    .with_attr("src", &format!("img/feature-{i}-lazy.jpg"))
                    .with_attr("data-src", &format!("img/feature-{i}.jpg"))
                    .with_rect(Rect::new(0.0, top, 600.0, IMAGE_HEIGHT))
                    .appended_to(&sections[0])
            })
            .collect();

        let (tabs, tab_labels, tab_contents) = build_tabs(&doc, &sections[1]);

        let slider = doc
            .element("div", &["slider"])
            .with_rect(row(2800.0, 600.0))
            .appended_to(&sections[2]);
        let slides = (0..slide_count)
            .map(|i| {
                let slide = doc.element("div", &["slide"]).appended_to(&slider);
                slide.set_text(&format!("slide {}", i + 1));
                slide
            })
            .collect();
        let slider_left = doc
            .element("button", &["slider__btn", "slider__btn--left"])
            .appended_to(&slider);
        let slider_right = doc
            .element("button", &["slider__btn", "slider__btn--right"])
            .appended_to(&slider);
        let dots = doc.element("div", &["dots"]).appended_to(&slider);

        let open_account_buttons = vec![
            nav_cta.clone(),
            doc.element("button", &["btn", "btn--show-modal"])
                .appended_to(&sections[3]),
        ];

        let modal = doc
            .element("div", &["modal", "hidden"])
            .appended_to(&body);
        let close_modal = doc
            .element("button", &["btn--close-modal"])
            .appended_to(&modal);
        let overlay = doc
            .element("div", &["overlay", "hidden"])
            .appended_to(&body);

        Self {
            doc,
            header,
            nav,
            logo,
            nav_links,
            nav_cta,
            scroll_button,
            sections,
            images,
            tabs,
            tab_labels,
            tab_contents,
            slides,
            slider_left,
            slider_right,
            dots,
            modal,
            close_modal,
            overlay,
            open_account_buttons,
        }
    }

    /// Dot buttons created by the carousel at mount, in slide order.
    #[must_use]
    pub fn dot_buttons(&self) -> Vec<SimElement> {
        self.dots.children()
    }
}

fn build_tabs(
    doc: &SimDocument,
    section: &SimElement,
) -> (Vec<SimElement>, Vec<SimElement>, Vec<SimElement>) {
    let operations = doc.element("div", &["operations"]).appended_to(section);
    let container = doc
        .element("div", &["operations__tab-container"])
        .appended_to(&operations);

    let mut tabs = Vec::with_capacity(TAB_COUNT);
    let mut labels = Vec::with_capacity(TAB_COUNT);
    let mut contents = Vec::with_capacity(TAB_COUNT);
    for n in 1..=TAB_COUNT {
        let tab = doc
            .element("button", &["btn", "operations__tab"])
            .with_class(&format!("operations__tab--{n}"))
            .with_attr(TAB_ATTR, &n.to_string())
            .appended_to(&container);
        let label = doc.element("span", &[]).appended_to(&tab);
        label.set_text(&format!("0{n}"));

        let content = doc
            .element("div", &["operations__content"])
            .with_class(&format!("operations__content--{n}"))
            .appended_to(&operations);
        if n == 1 {
            tab.add_class("operations__tab--active");
            content.add_class("operations__content--active");
        }
        tabs.push(tab);
        labels.push(label);
        contents.push(content);
    }
    (tabs, labels, contents)
}
