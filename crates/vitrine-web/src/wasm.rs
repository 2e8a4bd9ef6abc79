#![forbid(unsafe_code)]

//! `wasm-bindgen` exports: `mountLandingPage` and the [`LandingPage`] handle.
//!
//! One document-level listener per event type feeds [`Page::dispatch`]; one
//! `IntersectionObserver` per [`WatchKind`] feeds [`Page::deliver`]. Every
//! JS callback holds only a weak reference to the mounted state, which is
//! kept alive by a thread-local registry until [`LandingPage::destroy`].
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Reflect};
use tracing::{error, info, warn};
use vitrine_core::input::{Key, PageEvent};
use vitrine_core::nav::Hover;
use vitrine_core::page::{Effect, Page, WatchKind};
use vitrine_core::PageConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, IntersectionObserver, KeyboardEvent,
    ScrollBehavior, ScrollIntoViewOptions,
};

use crate::console::{self, ConsoleMethod};
use crate::dom::{self, DomDocument, DomElement, DomWatcher, ObserverCallback};

fn console_call(method: ConsoleMethod, msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(func) = Reflect::get(&console, &method.name().into()) else {
        return;
    };
    let Ok(func) = func.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = func.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_call(ConsoleMethod::Error, &msg);
        }));
    });
}

/// First call wins; later filters are ignored.
fn install_logging(directives: &str) {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let _ = tracing::subscriber::set_global_default(console::subscriber(
            directives,
            console_call,
        ));
    });
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ---------------------------------------------------------------------------
// Host state
// ---------------------------------------------------------------------------

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    fn detach(&self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.event,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

struct Observer {
    watcher: DomWatcher,
    _callback: ObserverCallback,
}

#[derive(Default)]
struct Host {
    page: Option<Page<DomDocument>>,
    listeners: Vec<Listener>,
    observers: Vec<Observer>,
}

impl Host {
    fn teardown(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        for observer in self.observers.drain(..) {
            observer.watcher.disconnect();
        }
        self.page = None;
    }
}

type SharedHost = Rc<RefCell<Host>>;

thread_local! {
    static MOUNTED: RefCell<Vec<SharedHost>> = const { RefCell::new(Vec::new()) };
}

/// Run `f` on the mounted page unless the host is gone, busy, or not yet
/// mounted.
fn with_page<R>(
    host: &Weak<RefCell<Host>>,
    f: impl FnOnce(&mut Page<DomDocument>) -> R,
) -> Option<R> {
    let host = host.upgrade()?;
    let Ok(mut host) = host.try_borrow_mut() else {
        warn!("re-entrant page access ignored");
        return None;
    };
    host.page.as_mut().map(f)
}

fn apply_effects(host: &Weak<RefCell<Host>>, effects: Vec<Effect<DomElement>>) {
    for effect in effects {
        match effect {
            Effect::ScrollIntoView(el) => {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                el.as_element()
                    .scroll_into_view_with_scroll_into_view_options(&options);
            }
            Effect::AwaitImageLoad(image) => await_load(host, image),
        }
    }
}

fn await_load(host: &Weak<RefCell<Host>>, image: DomElement) {
    let weak = host.clone();
    let loaded = image.clone();
    let callback = Closure::once_into_js(move || {
        with_page(&weak, |page| page.dispatch(PageEvent::ImageLoaded { image: loaded }));
    });
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    if let Err(err) = image
        .as_element()
        .add_event_listener_with_callback_and_add_event_listener_options(
            "load",
            callback.unchecked_ref(),
            &options,
        )
    {
        warn!(err = ?err, "image load listener not attached");
    }
}

fn event_element(event: &Event) -> Option<DomElement> {
    event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .map(DomElement::new)
}

/// Listener that translates a DOM event and routes it to the page.
fn page_listener(
    host: &Weak<RefCell<Host>>,
    translate: impl Fn(&Event) -> Option<PageEvent<DomElement>> + 'static,
) -> Closure<dyn FnMut(Event)> {
    let host = host.clone();
    Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(page_event) = translate(&event) else {
            return;
        };
        let Some(outcome) = with_page(&host, |page| page.dispatch(page_event)) else {
            return;
        };
        if outcome.prevent_default {
            event.prevent_default();
        }
        apply_effects(&host, outcome.effects);
    })
}

fn observer_callback(host: &Weak<RefCell<Host>>, kind: WatchKind) -> ObserverCallback {
    let host = host.clone();
    Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            let crossings = dom::crossings(&entries);
            let mut watcher = DomWatcher::from(observer);
            let Some(outcome) =
                with_page(&host, |page| page.deliver(kind, &crossings, &mut watcher))
            else {
                return;
            };
            apply_effects(&host, outcome.effects);
        },
    )
}

/// Mount the page into `host` and wire every listener and observer.
fn mount_now(
    host: &SharedHost,
    document: &web_sys::Document,
    config: PageConfig,
) -> Result<(), JsValue> {
    let weak = Rc::downgrade(host);
    let page = Page::mount(DomDocument::new(document.clone()), config).map_err(to_js)?;

    let mut observers = Vec::new();
    for kind in WatchKind::ALL {
        let Some(options) = page.watch_options(kind) else {
            continue;
        };
        let callback = observer_callback(&weak, kind);
        let mut watcher = DomWatcher::new(options, &callback)?;
        page.start_watching(kind, &mut watcher);
        observers.push(Observer {
            watcher,
            _callback: callback,
        });
    }

    let target: &EventTarget = document.as_ref();
    let pointer = |hover: Hover| {
        move |event: &Event| {
            event_element(event).map(|target| PageEvent::Pointer { target, hover })
        }
    };
    let listeners = vec![
        Listener::attach(
            target,
            "click",
            page_listener(&weak, |event| {
                event_element(event).map(|target| PageEvent::Click { target })
            }),
        )?,
        Listener::attach(
            target,
            "keydown",
            page_listener(&weak, |event| {
                event.dyn_ref::<KeyboardEvent>().map(|event| PageEvent::KeyDown {
                    key: Key::from_dom(&event.key()),
                })
            }),
        )?,
        Listener::attach(target, "mouseover", page_listener(&weak, pointer(Hover::Enter)))?,
        Listener::attach(target, "mouseout", page_listener(&weak, pointer(Hover::Leave)))?,
    ];

    let mut host = host.borrow_mut();
    host.page = Some(page);
    host.observers = observers;
    host.listeners.extend(listeners);
    Ok(())
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

/// Mount the landing page behaviors.
///
/// `options_json` is an optional `PageConfig` JSON object. When the document
/// is still loading, mounting is deferred to `DOMContentLoaded`; the returned
/// handle reports `isMounted() === false` until then.
#[wasm_bindgen(js_name = mountLandingPage)]
pub fn mount_landing_page(options_json: Option<String>) -> Result<LandingPage, JsValue> {
    install_panic_hook();
    let config = crate::page_config(options_json.as_deref()).map_err(to_js)?;
    install_logging(&config.log_filter);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let host: SharedHost = Rc::default();
    if crate::still_parsing(&document.ready_state()) {
        let weak = Rc::downgrade(&host);
        let ready_document = document.clone();
        let mut pending = Some(config);
        let on_ready = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let (Some(host), Some(config)) = (weak.upgrade(), pending.take()) else {
                return;
            };
            if let Err(err) = mount_now(&host, &ready_document, config) {
                error!(err = ?err, "deferred mount failed");
            }
        });
        let listener = Listener::attach(document.as_ref(), "DOMContentLoaded", on_ready)?;
        host.borrow_mut().listeners.push(listener);
        info!("mount deferred until DOMContentLoaded");
    } else {
        mount_now(&host, &document, config)?;
    }

    MOUNTED.with(|mounted| mounted.borrow_mut().push(Rc::clone(&host)));
    Ok(LandingPage { host })
}

/// Handle to a mounted landing page.
#[wasm_bindgen]
pub struct LandingPage {
    host: SharedHost,
}

#[wasm_bindgen]
impl LandingPage {
    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.host.borrow().page.is_some()
    }

    /// Advance the carousel one slide (wraps).
    pub fn next(&self) {
        self.with_carousel(|carousel| carousel.next());
    }

    /// Go back one slide (wraps).
    pub fn previous(&self) {
        self.with_carousel(|carousel| carousel.previous());
    }

    /// Jump to slide `index`; throws on an out-of-range index.
    #[wasm_bindgen(js_name = goTo)]
    pub fn go_to(&self, index: u32) -> Result<(), JsValue> {
        self.with_carousel(|carousel| carousel.go_to(index as usize).map_err(to_js))
            .unwrap_or_else(|| Err(JsValue::from_str("carousel not mounted")))
    }

    /// Current slide index, or `undefined` without a carousel.
    #[wasm_bindgen(js_name = currentSlide)]
    pub fn current_slide(&self) -> Option<u32> {
        let host = self.host.borrow();
        let carousel = host.page.as_ref()?.carousel()?;
        u32::try_from(carousel.current()).ok()
    }

    #[wasm_bindgen(js_name = slideCount)]
    pub fn slide_count(&self) -> u32 {
        let host = self.host.borrow();
        host.page
            .as_ref()
            .and_then(Page::carousel)
            .and_then(|carousel| u32::try_from(carousel.len()).ok())
            .unwrap_or(0)
    }

    #[wasm_bindgen(js_name = isModalOpen)]
    pub fn is_modal_open(&self) -> bool {
        let host = self.host.borrow();
        host.page
            .as_ref()
            .and_then(Page::modal)
            .is_some_and(|modal| modal.is_open())
    }

    /// Disconnect observers, remove listeners and release the page.
    pub fn destroy(&self) {
        self.host.borrow_mut().teardown();
        MOUNTED.with(|mounted| {
            mounted
                .borrow_mut()
                .retain(|host| !Rc::ptr_eq(host, &self.host));
        });
        info!("landing page destroyed");
    }
}

impl LandingPage {
    fn with_carousel<R>(
        &self,
        f: impl FnOnce(&mut vitrine_core::Carousel<DomElement>) -> R,
    ) -> Option<R> {
        let mut host = self.host.borrow_mut();
        host.page.as_mut()?.carousel_mut().map(f)
    }
}
