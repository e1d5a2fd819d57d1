/// The injected "Hide Watched" toggle button
use std::rc::Rc;

use crate::page::ControlHost;
use crate::tab_kind::TabKind;

/// DOM id of the single injected button
pub const CONTROL_ID: &str = "unwatched-filter-button";
/// Attribute carrying the button's bound tab kind
pub const TAB_KIND_ATTRIBUTE: &str = "data-tab-type";

pub const ON_COLOR: &str = "#00cc00";
pub const OFF_COLOR: &str = "#ff0000";

/// Label and color of the button, a pure function of `(kind, active)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlLook {
    pub label: String,
    pub color: &'static str,
}

impl ControlLook {
    pub fn for_state(kind: TabKind, active: bool) -> ControlLook {
        ControlLook {
            label: format!(
                "Hide Watched {} {}",
                kind.display_name(),
                if active { "ON" } else { "OFF" }
            ),
            color: if active { ON_COLOR } else { OFF_COLOR },
        }
    }
}

/// Insertion progress of the button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Idle,
    /// Failed attempts so far
    Attempting(u32),
    Inserted,
    Abandoned,
}

/// Outcome of [`ControlSurface::ensure_present`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    RetryLater,
    GaveUp,
}

#[derive(Debug)]
pub struct ControlSurface {
    state: Insertion,
    max_attempts: u32,
}

impl ControlSurface {
    pub fn new(max_attempts: u32) -> Self {
        ControlSurface {
            state: Insertion::Idle,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn state(&self) -> Insertion {
        self.state
    }

    /// Make sure exactly one button exists, bound to `kind`
    pub fn ensure_present(
        &mut self,
        host: &impl ControlHost,
        kind: TabKind,
        active: bool,
        on_activate: &Rc<dyn Fn()>,
    ) -> Presence {
        if host.control_present() {
            self.state = Insertion::Inserted;
            if host.control_kind() != Some(kind) {
                log::info!(
                    "Unwatched filter: rebinding button from {:?} to {}",
                    host.control_kind(),
                    kind
                );
                self.refresh(host, kind, active);
            }
            return Presence::Present;
        }

        let failed = match self.state {
            Insertion::Abandoned => return Presence::GaveUp,
            Insertion::Attempting(failed) => failed,
            // Inserted but gone means the page threw our button away
            Insertion::Idle | Insertion::Inserted => 0,
        };

        let look = ControlLook::for_state(kind, active);
        match host.insert_control(kind, &look, on_activate.clone()) {
            Ok(()) => {
                log::info!("Unwatched filter: button added for {} tab", kind);
                self.state = Insertion::Inserted;
                Presence::Present
            }
            Err(e) => {
                let failed = failed + 1;
                if failed >= self.max_attempts {
                    log::debug!(
                        "Unwatched filter: giving up on button after {} attempts: {}",
                        failed,
                        e
                    );
                    self.state = Insertion::Abandoned;
                    Presence::GaveUp
                } else {
                    log::debug!("Unwatched filter: button attempt {} failed: {}", failed, e);
                    self.state = Insertion::Attempting(failed);
                    Presence::RetryLater
                }
            }
        }
    }

    /// Rewrite label, color and binding of the existing button
    pub fn refresh(&self, host: &impl ControlHost, kind: TabKind, active: bool) {
        if !host.control_present() {
            return;
        }
        let look = ControlLook::for_state(kind, active);
        if let Err(e) = host.update_control(kind, &look) {
            log::warn!("Unwatched filter: could not update button: {}", e);
        }
    }

    pub fn remove(&mut self, host: &impl ControlHost) {
        if host.remove_control() {
            log::debug!("Unwatched filter: button removed");
        }
        self.state = Insertion::Idle;
    }
}
