#![forbid(unsafe_code)]

//! Browser glue for vitrine landing pages.
//!
//! This crate exports `mountLandingPage` and the `LandingPage` handle via
//! `wasm-bindgen`. It adapts the live DOM and `IntersectionObserver` to the
//! host traits of `vitrine-core`, translates DOM events into page input,
//! and carries out the effects the page returns (smooth scrolling, image
//! load listeners).
//!
//! The console logging plumbing and option parsing are host-independent and
//! tested natively; everything touching JS is compiled on `wasm32` only.

pub mod console;

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{LandingPage, mount_landing_page};

use vitrine_core::{ConfigError, PageConfig};

/// Parse the optional options JSON passed to `mountLandingPage`.
///
/// A missing or blank string yields the default configuration.
pub fn page_config(options_json: Option<&str>) -> Result<PageConfig, ConfigError> {
    match options_json.map(str::trim) {
        None | Some("") => Ok(PageConfig::default()),
        Some(json) => PageConfig::from_json(json),
    }
}

/// Whether a `document.readyState` value means mounting must wait for
/// `DOMContentLoaded`.
#[must_use]
pub fn still_parsing(ready_state: &str) -> bool {
    ready_state == "loading"
}
