#![forbid(unsafe_code)]

//! Harness: a deterministic simulated host for vitrine pages.
//!
//! # Role in vitrine
//! `vitrine-harness` stands in for the browser. It provides an in-memory
//! document ([`sim_dom`]), a scrollable viewport with recording visibility
//! watchers ([`viewport`]), the reference landing-page markup
//! ([`fixture`]), and [`session::SimulatedPage`], which mounts a
//! [`vitrine_core::Page`] and drives it exactly the way the web glue does.
//!
//! # How it fits in the system
//! End-to-end scenarios live in this crate's `tests/` directory and run on
//! the native target. Every session records a JSONL [`trace`] with
//! deterministic step stamps, and [`sim_dom::SimDocument::checksum`] hashes
//! the final tree so replays can be compared exactly.

pub mod fixture;
pub mod session;
pub mod sim_dom;
pub mod trace;
pub mod viewport;

pub use fixture::LandingFixture;
pub use session::SimulatedPage;
pub use sim_dom::{SimDocument, SimElement};
pub use trace::{SessionTrace, TraceEvent};
pub use viewport::{SimViewport, SimWatcher, WatchCall};
