#![forbid(unsafe_code)]

//! Scroll-driven behaviors end to end: sticky nav, section reveal and
//! deferred images, all fed by the simulated viewport watchers.
//!
//! # Running
//!
//! ```sh
//! cargo test -p vitrine-harness --test viewport_e2e
//! ```
//!
//! # JSONL Logging
//!
//! ```sh
//! VITRINE_SIM_LOG=1 cargo test -p vitrine-harness --test viewport_e2e
//! ```

use pretty_assertions::assert_eq;
use tracing::Level;
use vitrine_core::element::Element;
use vitrine_core::lazy_image::ImageState;
use vitrine_core::page::WatchKind;
use vitrine_core::watch::{Crossing, ViewportWatcher};
use vitrine_core::PageConfig;
use vitrine_harness::fixture::NAV_HEIGHT;
use vitrine_harness::{LandingFixture, SimViewport, SimWatcher, SimulatedPage, WatchCall};

const HIDDEN: &str = "section--hidden";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::INFO)
        .try_init();
}

fn mount() -> (LandingFixture, SimulatedPage) {
    init_tracing();
    let fx = LandingFixture::new(3);
    let sim = SimulatedPage::mount(fx.doc.clone(), PageConfig::default(), SimViewport::default())
        .expect("reference page mounts");
    (fx, sim)
}

fn dump_trace(case: &str, sim: &SimulatedPage) {
    if std::env::var("VITRINE_SIM_LOG").is_err() {
        return;
    }
    let dir = std::env::temp_dir().join("vitrine_sim_e2e");
    let _ = std::fs::create_dir_all(&dir);
    if let Ok(jsonl) = sim.trace().to_jsonl() {
        let _ = std::fs::write(dir.join(format!("{case}.jsonl")), jsonl);
    }
}

fn watcher(sim: &SimulatedPage, kind: WatchKind) -> &SimWatcher {
    sim.watcher(kind).expect("watcher started")
}

// ============================================================================
// Sticky navigation
// ============================================================================

#[test]
fn nav_sticks_once_header_passes_under_it() {
    let (fx, mut sim) = mount();
    assert_eq!(
        watcher(&sim, WatchKind::Header).options().root_margin.as_px(),
        -NAV_HEIGHT
    );
    assert!(!fx.nav.has_class("sticky"));

    // Header bottom still inside the nav band.
    sim.scroll_to(700.0);
    assert!(!sim.page().is_sticky());

    sim.scroll_to(720.0);
    assert!(sim.page().is_sticky());
    assert!(fx.nav.has_class("sticky"));

    sim.scroll_to(2000.0);
    assert!(fx.nav.has_class("sticky"));

    sim.scroll_to(0.0);
    assert!(!fx.nav.has_class("sticky"));
    assert!(watcher(&sim, WatchKind::Header).is_observing(&fx.header));
    dump_trace("sticky_nav", &sim);
}

#[test]
fn sticky_nav_toggles_many_times() {
    let (fx, mut sim) = mount();
    for _ in 0..5 {
        sim.scroll_to(1500.0);
        assert!(fx.nav.has_class("sticky"));
        sim.scroll_to(100.0);
        assert!(!fx.nav.has_class("sticky"));
    }
    assert_eq!(watcher(&sim, WatchKind::Header).unobserve_count(&fx.header), 0);
}

// ============================================================================
// Section reveal
// ============================================================================

#[test]
fn sections_start_hidden_and_reveal_once() {
    let (fx, mut sim) = mount();
    // Section 1 only touches the viewport's bottom edge at mount.
    assert!(fx.sections.iter().all(|s| s.has_class(HIDDEN)));

    sim.scroll_to(200.0);
    assert!(!fx.sections[0].has_class(HIDDEN));
    assert!(fx.sections[1..].iter().all(|s| s.has_class(HIDDEN)));

    let sections = watcher(&sim, WatchKind::Sections);
    assert!(!sections.is_observing(&fx.sections[0]));
    assert_eq!(sections.unobserve_count(&fx.sections[0]), 1);

    // Scrolling away and back neither hides it nor touches the watcher.
    let calls_before = sections.calls().len();
    sim.scroll_to(0.0);
    sim.scroll_to(300.0);
    assert!(!fx.sections[0].has_class(HIDDEN));
    assert_eq!(watcher(&sim, WatchKind::Sections).calls().len(), calls_before);
    assert_eq!(sim.page().sections().handler().revealed(), 1);
}

#[test]
fn non_intersecting_then_intersecting_entry() {
    let (fx, mut sim) = mount();
    let section = fx.sections[1].clone();
    let mut probe = SimWatcher::new(sim.page().watch_options(WatchKind::Sections).unwrap());

    sim.page_mut().deliver(
        WatchKind::Sections,
        &[Crossing::new(section.clone(), false, 0.0)],
        &mut probe,
    );
    assert!(section.has_class(HIDDEN));
    assert!(probe.calls().is_empty());

    sim.page_mut().deliver(
        WatchKind::Sections,
        &[Crossing::new(section.clone(), true, 0.3)],
        &mut probe,
    );
    assert!(!section.has_class(HIDDEN));
    assert_eq!(probe.calls(), &[WatchCall::Unobserve(section.clone())]);

    // A stale duplicate after release is dropped.
    sim.page_mut().deliver(
        WatchKind::Sections,
        &[Crossing::new(section.clone(), true, 0.5)],
        &mut probe,
    );
    assert_eq!(probe.calls().len(), 1);
}

#[test]
fn scrolling_to_bottom_reveals_everything_in_one_batch() {
    let (fx, mut sim) = mount();
    let mut viewport = sim.viewport();
    viewport.height = 5000.0;
    let mut tall = SimWatcher::new(sim.page().watch_options(WatchKind::Sections).unwrap());
    for section in &fx.sections {
        tall.observe(section);
    }
    let batch = tall.collect(&viewport);
    assert_eq!(batch.len(), fx.sections.len());
    sim.page_mut().deliver(WatchKind::Sections, &batch, &mut tall);
    assert!(fx.sections.iter().all(|s| !s.has_class(HIDDEN)));
    assert_eq!(tall.observed_count(), 0);
}

// ============================================================================
// Deferred images
// ============================================================================

#[test]
fn image_source_applied_before_load() {
    let (fx, mut sim) = mount();
    let img = fx.images[0].clone();
    assert_eq!(sim.page().image_state(&img), Some(ImageState::Deferred));
    assert_eq!(img.attribute("src").as_deref(), Some("img/feature-0-lazy.jpg"));

    // 200px margin: the image at 1100 is picked up with the viewport at 200.
    sim.scroll_to(200.0);
    assert_eq!(sim.page().image_state(&img), Some(ImageState::SourceApplied));
    assert_eq!(img.attribute("src").as_deref(), Some("img/feature-0.jpg"));
    assert!(img.has_class("lazy-img"));
    assert_eq!(sim.pending_loads(), &[img.clone()]);
    assert!(!watcher(&sim, WatchKind::Images).is_observing(&img));

    assert!(sim.finish_load(&img));
    assert_eq!(sim.page().image_state(&img), Some(ImageState::Loaded));
    assert!(!img.has_class("lazy-img"));
    assert!(!sim.finish_load(&img));
    dump_trace("lazy_image", &sim);
}

#[test]
fn images_load_progressively_while_scrolling() {
    let (fx, mut sim) = mount();
    let states = |sim: &SimulatedPage| -> Vec<ImageState> {
        fx.images
            .iter()
            .filter_map(|img| sim.page().image_state(img))
            .collect()
    };

    assert_eq!(states(&sim), vec![ImageState::Deferred; 3]);
    sim.scroll_to(500.0);
    assert_eq!(
        states(&sim),
        vec![
            ImageState::SourceApplied,
            ImageState::SourceApplied,
            ImageState::Deferred
        ]
    );
    sim.scroll_to(700.0);
    assert_eq!(sim.finish_all_loads(), 3);
    assert_eq!(states(&sim), vec![ImageState::Loaded; 3]);
    assert_eq!(watcher(&sim, WatchKind::Images).observed_count(), 0);

    // Released images are never re-processed.
    sim.scroll_to(0.0);
    sim.scroll_to(700.0);
    assert!(sim.pending_loads().is_empty());
}

#[test]
fn non_intersecting_image_entry_changes_nothing() {
    let (fx, mut sim) = mount();
    let img = fx.images[2].clone();
    let mut probe = SimWatcher::new(sim.page().watch_options(WatchKind::Images).unwrap());
    let outcome = sim.page_mut().deliver(
        WatchKind::Images,
        &[Crossing::new(img.clone(), false, 0.0)],
        &mut probe,
    );
    assert!(outcome.effects.is_empty());
    assert_eq!(sim.page().image_state(&img), Some(ImageState::Deferred));
    assert!(probe.calls().is_empty());
}

#[test]
fn stop_watching_unobserves_remaining_targets() {
    let (fx, mut sim) = mount();
    sim.scroll_to(200.0);
    sim.stop_watching();
    assert_eq!(watcher(&sim, WatchKind::Sections).observed_count(), 0);
    assert_eq!(watcher(&sim, WatchKind::Images).observed_count(), 0);
    assert!(!watcher(&sim, WatchKind::Header).is_observing(&fx.header));
    // Already-released targets are not unobserved a second time.
    assert_eq!(
        watcher(&sim, WatchKind::Sections).unobserve_count(&fx.sections[0]),
        1
    );
}
