/// Content-script driver
///
/// Owns the timers, the mutation observer and the listeners that feed one
/// shared [`Reconciler`]. Everything runs on the page's single thread; the
/// `RefCell` borrow is never held across an `await`.
use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

use js_sys::{Array, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{MutationObserver, MutationObserverInit, Node};

use crate::config::{CONFIG_STORAGE_KEY, FilterConfig};
use crate::control::Presence;
use crate::error::{FilterError, Result};
use crate::messages::ExtensionMessage;
use crate::reconcile::{NavChange, Reconciler};
use crate::schedule::Debouncer;
use crate::storage::KeyValueStore;
use crate::web::bridge;
use crate::web::dom::WebPage;
use crate::web::local_storage::LocalStorage;

type Engine = Reconciler<WebPage, LocalStorage>;
type SharedEngine = Rc<RefCell<Engine>>;
type SharedDebouncer = Rc<RefCell<Debouncer>>;

/// Preferred mutation target; the body is observed when it is not rendered
const CHANNEL_CONTAINER: &str = "ytd-browse[page-subtype=\"channels\"]";

/// Resolve after `ms` milliseconds
pub async fn sleep(ms: u32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().map(|window| {
            window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32)
        });
        if !matches!(scheduled, Some(Ok(_))) {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Fire `job` once `debouncer`'s window passes without a newer trigger
pub fn trigger<F, Fut>(debouncer: Rc<RefCell<Debouncer>>, job: Rc<F>)
where
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let (ticket, window) = {
        let mut d = debouncer.borrow_mut();
        (d.trigger(), d.window_ms())
    };
    spawn_local(async move {
        sleep(window).await;
        if !debouncer.borrow_mut().begin(ticket) {
            return;
        }
        job().await;
        let rerun = debouncer.borrow_mut().finish();
        if rerun {
            trigger(debouncer, job);
        }
    });
}

/// Insert the button, waiting out transient failures up to the ceiling
async fn inject_with_retry(engine: &SharedEngine) -> Option<Presence> {
    loop {
        let presence = engine.borrow_mut().ensure_control();
        if presence != Some(Presence::RetryLater) {
            return presence;
        }
        let delay = engine.borrow().config().retry_delay_ms;
        sleep(delay).await;
    }
}

async fn inject_then_filter(engine: &SharedEngine) {
    if inject_with_retry(engine).await.is_none() {
        return;
    }
    let delay = engine.borrow().config().post_inject_filter_delay_ms;
    sleep(delay).await;
    engine.borrow_mut().filter_current();
}

async fn on_navigation(engine: SharedEngine) {
    let change = engine.borrow_mut().check_navigation();
    if let NavChange::Entered(kind) = change {
        log::info!("Unwatched filter: on {} tab", kind);
        let delay = engine.borrow().config().inject_delay_ms;
        sleep(delay).await;
        inject_then_filter(&engine).await;
    }
}

async fn on_mutation(engine: SharedEngine) {
    let outcome = engine.borrow_mut().reconcile();
    if outcome.presence == Some(Presence::RetryLater) {
        inject_with_retry(&engine).await;
    }
}

async fn on_scroll(engine: SharedEngine) {
    engine.borrow_mut().filter_current();
}

/// Button click: flip now, filter once the page settled
fn toggle_from_click(engine: &SharedEngine) {
    let Some(kind) = engine.borrow_mut().activate() else {
        return;
    };
    let delay = engine.borrow().config().settle_delay_ms;
    let engine = engine.clone();
    spawn_local(async move {
        sleep(delay).await;
        engine.borrow_mut().finish_toggle(kind);
    });
}

fn poll_navigation(engine: &SharedEngine, interval_ms: u32, debouncer: SharedDebouncer) -> Result<()> {
    let job = {
        let engine = engine.clone();
        Rc::new(move || on_navigation(engine.clone()))
    };
    let tick = Closure::<dyn FnMut()>::new(move || {
        trigger(debouncer.clone(), job.clone());
    });
    let window = engine.borrow().page().window().clone();
    window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            interval_ms as i32,
        )
        .map_err(|e| FilterError::dom("start navigation poll", e))?;
    tick.forget();
    Ok(())
}

fn observe_mutations(engine: &SharedEngine, debouncer: SharedDebouncer) -> Result<()> {
    let job = {
        let engine = engine.clone();
        Rc::new(move || on_mutation(engine.clone()))
    };
    let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
        move |_records: Array, _observer: MutationObserver| {
            trigger(debouncer.clone(), job.clone());
        },
    );
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
        .map_err(|e| FilterError::dom("create observer", e))?;

    let document = engine.borrow().page().document().clone();
    let target: Node = match document.query_selector(CHANNEL_CONTAINER) {
        Ok(Some(container)) => container.into(),
        _ => document
            .body()
            .ok_or_else(|| FilterError::Dom("document body not ready".to_string()))?
            .into(),
    };
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer
        .observe_with_options(&target, &init)
        .map_err(|e| FilterError::dom("observe content", e))?;

    callback.forget();
    Ok(())
}

fn watch_scroll(engine: &SharedEngine, debouncer: SharedDebouncer) -> Result<()> {
    let job = {
        let engine = engine.clone();
        Rc::new(move || on_scroll(engine.clone()))
    };
    let listener = Closure::<dyn FnMut()>::new(move || {
        trigger(debouncer.clone(), job.clone());
    });
    let window = engine.borrow().page().window().clone();
    window
        .add_event_listener_with_callback("scroll", listener.as_ref().unchecked_ref())
        .map_err(|e| FilterError::dom("listen for scroll", e))?;
    listener.forget();
    Ok(())
}

fn listen_for_global_state(engine: &SharedEngine) {
    let engine = engine.clone();
    let handler = Closure::<dyn FnMut(JsValue) -> JsValue>::new(move |message: JsValue| {
        match ExtensionMessage::from_js(message) {
            Ok(ExtensionMessage::UpdateGlobalState { enabled }) => {
                engine.borrow_mut().set_enabled(enabled);
                if enabled {
                    let engine = engine.clone();
                    spawn_local(async move {
                        inject_with_retry(&engine).await;
                    });
                }
            }
            Ok(other) => log::debug!("Unwatched filter: ignoring {:?}", other),
            Err(e) => log::debug!("Unwatched filter: ignoring message: {}", e),
        }
        JsValue::UNDEFINED
    });
    bridge::on_runtime_message(handler.as_ref().unchecked_ref());
    handler.forget();
}

/// Start the content script on the current page
pub async fn start() -> Result<()> {
    let page = WebPage::new()?;
    let storage = LocalStorage::open();
    let config = FilterConfig::from_override(
        storage.get(CONFIG_STORAGE_KEY).ok().flatten().as_deref(),
    );
    let enabled = match bridge::global_enabled().await {
        Ok(enabled) => enabled,
        Err(e) => {
            log::warn!("Unwatched filter: global state unreadable, assuming enabled: {}", e);
            true
        }
    };

    let engine: SharedEngine = Rc::new_cyclic(|weak: &Weak<RefCell<Engine>>| {
        let weak = weak.clone();
        let on_activate: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(engine) = weak.upgrade() {
                toggle_from_click(&engine);
            }
        });
        RefCell::new(Reconciler::new(page, storage, config, enabled, on_activate))
    });

    let config = engine.borrow().config().clone();
    listen_for_global_state(&engine);
    poll_navigation(
        &engine,
        config.nav_poll_interval_ms,
        Rc::new(RefCell::new(Debouncer::new(config.nav_debounce_ms))),
    )?;
    observe_mutations(
        &engine,
        Rc::new(RefCell::new(Debouncer::new(config.mutation_debounce_ms))),
    )?;
    watch_scroll(
        &engine,
        Rc::new(RefCell::new(Debouncer::new(config.scroll_debounce_ms))),
    )?;

    let current = engine.borrow().eligible_kind();
    if let (Some(kind), true) = (current, enabled) {
        log::info!("Unwatched filter: on {} tab", kind);
        sleep(config.inject_delay_ms).await;
        inject_then_filter(&engine).await;
    }
    Ok(())
}
