#![forbid(unsafe_code)]

//! Core: interaction state for the vitrine landing page.
//!
//! # Role in vitrine
//! `vitrine-core` owns every behavior of the page as plain Rust state
//! machines over two small host traits, [`element::Element`] and
//! [`element::Document`]. It never touches JS types, so the same code runs
//! in the browser (`vitrine-web`) and in the deterministic simulated host
//! (`vitrine-harness`).
//!
//! # Primary responsibilities
//! - **Carousel**: wrap-around slide index with synchronized slide offsets
//!   and indicator dots.
//! - **Viewport watching**: the [`watch::ViewportWatcher`] seam plus
//!   one-shot (reveal, lazy images) and toggling (sticky nav) handlers.
//! - **Page glue**: modal, tabs, nav hover fade, in-page scrolling, cookie
//!   banner, keyboard mapping.
//! - **Page aggregate**: [`page::Page`] mounts all of the above from a
//!   [`config::PageConfig`] and routes host input to them.
//!
//! # How it fits in the system
//! The host translates DOM events into [`input::PageEvent`]s and visibility
//! entries into [`watch::Crossing`]s, then carries out the
//! [`page::Effect`]s returned. Everything runs synchronously on the host's
//! event loop; each call finishes its full re-render before returning.

pub mod carousel;
pub mod config;
pub mod cookie;
pub mod element;
pub mod input;
pub mod lazy_image;
pub mod modal;
pub mod nav;
pub mod page;
pub mod reveal;
pub mod sticky_nav;
pub mod tabs;
pub mod watch;

pub use carousel::{Carousel, CarouselError, CarouselInput};
pub use config::{ConfigError, PageConfig};
pub use element::{Document, Element};
pub use input::{Key, PageEvent};
pub use lazy_image::ImageState;
pub use nav::Hover;
pub use page::{Effect, MountError, Outcome, Page, WatchKind};
pub use watch::{Crossing, Rect, RootMargin, ViewportWatcher, WatchOptions};
