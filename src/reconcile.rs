/// One page load's filter session
///
/// `Reconciler` owns every piece of mutable filter state: the tab flags,
/// the button's insertion state and the last location seen. Timers and
/// observers live in `web::runtime` and only ever call into it.
use std::rc::Rc;

use uuid::Uuid;

use crate::classifier::{classify, is_channel_tab_page};
use crate::config::FilterConfig;
use crate::control::{ControlSurface, Presence};
use crate::filter::{self, FilterReport};
use crate::page::{ControlHost, Page};
use crate::storage::{KeyValueStore, TabStateStore};
use crate::tab_kind::TabKind;

/// What a location poll found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavChange {
    Unchanged,
    /// Location changed to somewhere the filter does not act on
    Left,
    /// Location changed to a filterable channel tab
    Entered(TabKind),
}

/// Result of one reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub presence: Option<Presence>,
    pub report: Option<FilterReport>,
}

pub struct Reconciler<P, S>
where
    P: Page + ControlHost,
    S: KeyValueStore,
{
    session: Uuid,
    page: P,
    store: TabStateStore<S>,
    control: ControlSurface,
    config: FilterConfig,
    enabled: bool,
    last_href: String,
    on_activate: Rc<dyn Fn()>,
}

impl<P, S> Reconciler<P, S>
where
    P: Page + ControlHost,
    S: KeyValueStore,
{
    /// Start a session. `on_activate` becomes the button's click handler.
    pub fn new(
        page: P,
        backend: S,
        config: FilterConfig,
        enabled: bool,
        on_activate: Rc<dyn Fn()>,
    ) -> Self {
        let mut store = TabStateStore::new(backend);
        store.initialize_if_first_run();
        if config.reset_on_load {
            store.reset_all();
        }
        store.load();

        let session = Uuid::new_v4();
        let last_href = page.href();
        log::info!(
            "Unwatched filter: session {} started on {} (enabled: {})",
            session,
            last_href,
            enabled
        );

        Reconciler {
            session,
            control: ControlSurface::new(config.max_insert_attempts),
            page,
            store,
            config,
            enabled,
            last_href,
            on_activate,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn store(&self) -> &TabStateStore<S> {
        &self.store
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_active(&self, kind: TabKind) -> bool {
        self.store.is_active(kind)
    }

    pub fn classify(&self) -> TabKind {
        classify(&self.page.href(), &self.page)
    }

    /// Current tab, or `None` off channel tab pages
    pub fn eligible_kind(&self) -> Option<TabKind> {
        let href = self.page.href();
        is_channel_tab_page(&href).then(|| classify(&href, &self.page))
    }

    /// Tab kind the button currently claims
    pub fn bound_kind(&self) -> Option<TabKind> {
        self.page.control_kind()
    }

    /// Follow the settings panel's global switch
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        log::info!(
            "Unwatched filter: session {} {}",
            self.session,
            if enabled { "resumed" } else { "suspended" }
        );

        if enabled {
            self.reconcile();
        } else {
            self.control.remove(&self.page);
            let kind = self.classify();
            self.run_pass(kind, false);
        }
    }

    /// Compare the location with the last one seen
    pub fn check_navigation(&mut self) -> NavChange {
        let href = self.page.href();
        if href == self.last_href {
            return NavChange::Unchanged;
        }
        log::info!(
            "Unwatched filter: navigation from {} to {}",
            self.last_href,
            href
        );
        self.last_href = href;
        self.control.remove(&self.page);

        if !self.enabled {
            return NavChange::Left;
        }
        match self.eligible_kind() {
            Some(kind) => NavChange::Entered(kind),
            None => NavChange::Left,
        }
    }

    /// Insert or rebind the button for the current tab
    pub fn ensure_control(&mut self) -> Option<Presence> {
        if !self.enabled {
            return None;
        }
        let Some(kind) = self.eligible_kind() else {
            self.control.remove(&self.page);
            return None;
        };
        let active = self.store.is_active(kind);
        Some(
            self.control
                .ensure_present(&self.page, kind, active, &self.on_activate),
        )
    }

    /// Update the button from the classifier's tab, not `requested`
    pub fn refresh_control(&self, requested: TabKind) {
        let kind = self.resolve(requested);
        self.control
            .refresh(&self.page, kind, self.store.is_active(kind));
    }

    /// Filter the current tab if its flag is on
    pub fn filter_current(&mut self) -> Option<FilterReport> {
        if !self.enabled {
            return None;
        }
        let kind = self.eligible_kind()?;
        if !self.store.is_active(kind) {
            return None;
        }
        self.run_pass(kind, true)
    }

    /// Bring tab, button and item visibility back into agreement
    pub fn reconcile(&mut self) -> Outcome {
        if !self.enabled {
            return Outcome::default();
        }
        if self.eligible_kind().is_none() {
            self.control.remove(&self.page);
            return Outcome::default();
        }
        Outcome {
            presence: self.ensure_control(),
            report: self.filter_current(),
        }
    }

    /// Flip the flag of the current tab and persist it. The filter pass
    /// follows in [`Reconciler::finish_toggle`] once the page settled.
    pub fn begin_toggle(&mut self, requested: TabKind) -> Option<TabKind> {
        if !self.enabled {
            return None;
        }
        let kind = self.resolve(requested);
        let active = !self.store.is_active(kind);
        self.store.set_active(kind, active);
        log::info!("Unwatched filter: toggled {} state to {}", kind, active);
        Some(kind)
    }

    /// Button click: toggle the tab the button claims, corrected by the
    /// classifier. Returns the kind to hand to [`Reconciler::finish_toggle`].
    pub fn activate(&mut self) -> Option<TabKind> {
        let requested = self.bound_kind().unwrap_or_else(|| self.classify());
        self.begin_toggle(requested)
    }

    /// Nothing runs if the session was suspended or the page moved off
    /// `kind` since the toggle began; the persisted flag stands either way.
    pub fn finish_toggle(&mut self, kind: TabKind) -> Option<FilterReport> {
        if !self.enabled {
            return None;
        }
        if self.eligible_kind() != Some(kind) {
            log::debug!("Unwatched filter: {} toggle settled off its tab, skipping pass", kind);
            return None;
        }
        let active = self.store.is_active(kind);
        let report = self.run_pass(kind, active);
        self.refresh_control(kind);
        self.store.repair_if_inconsistent(kind, active);
        report
    }

    /// Both toggle halves without the settling delay
    pub fn toggle(&mut self, requested: TabKind) -> Option<FilterReport> {
        let kind = self.begin_toggle(requested)?;
        self.finish_toggle(kind)
    }

    fn resolve(&self, requested: TabKind) -> TabKind {
        let current = self.classify();
        if current != requested {
            log::info!(
                "Unwatched filter: correcting tab type from {} to {}",
                requested,
                current
            );
        }
        current
    }

    // Errors stop at this boundary; the next tick tries again.
    fn run_pass(&self, kind: TabKind, active: bool) -> Option<FilterReport> {
        match filter::apply(&self.page, kind, active) {
            Ok(report) => {
                if active {
                    log::debug!(
                        "Unwatched filter: hidden {} of {} {} items",
                        report.hidden,
                        report.total,
                        kind
                    );
                } else {
                    log::debug!(
                        "Unwatched filter: reset display for {} {} items ({} swept)",
                        report.total,
                        kind,
                        report.swept
                    );
                }
                Some(report)
            }
            Err(e) => {
                log::warn!(
                    "Unwatched filter: session {} abandoned {} pass: {}",
                    self.session,
                    kind,
                    e
                );
                None
            }
        }
    }
}
