/// Settings panel (extension popup): the global on/off switch

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;
use crate::error::FilterError;
use crate::messages::ExtensionMessage;
use crate::web::bridge;

/// Status line shown under the switch
pub fn status_message(enabled: bool) -> &'static str {
    if enabled {
        "Extension is currently active. The filter button will appear on YouTube channel pages."
    } else {
        "Extension is currently disabled. No filtering will occur."
    }
}

#[derive(Clone, PartialEq, Debug)]
enum PanelState {
    Loading,
    Ready(bool),
    /// Message plus the switch value last shown to the user
    Error(String, bool),
}

impl PanelState {
    /// Checkbox value; enabled until storage says otherwise
    fn checked(&self) -> bool {
        match self {
            PanelState::Loading => true,
            PanelState::Ready(enabled) | PanelState::Error(_, enabled) => *enabled,
        }
    }
}

#[function_component(SettingsPanel)]
pub fn settings_panel() -> Html {
    let state = use_state(|| PanelState::Loading);

    // Load the stored switch on mount
    {
        let state = state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match bridge::global_enabled().await {
                    Ok(enabled) => state.set(PanelState::Ready(enabled)),
                    Err(e) => state.set(PanelState::Error(format!("Failed to load settings: {}", e), true)),
                }
            });
            || ()
        });
    }

    let on_change = {
        let state = state.clone();

        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let enabled = input.checked();
            state.set(PanelState::Ready(enabled));

            let state = state.clone();
            spawn_local(async move {
                if let Err(e) = publish_global_state(enabled).await {
                    state.set(PanelState::Error(format!("Failed to save: {}", e), enabled));
                }
            });
        })
    };

    let enabled = state.checked();

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Unwatched Filter"}</h1>

            <label class="toggle-row">
                <input
                    id="globalToggle"
                    type="checkbox"
                    checked={enabled}
                    disabled={matches!(*state, PanelState::Loading)}
                    onchange={on_change}
                />
                <span class="toggle-label">{"Enable filtering"}</span>
            </label>

            {match &*state {
                PanelState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PanelState::Ready(enabled) => html! {
                    <Alert
                        r#type={if *enabled { AlertType::Success } else { AlertType::Warning }}
                        title={status_message(*enabled)}
                        inline={true}
                    >
                    </Alert>
                },
                PanelState::Error(err, _) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
            }}

            <p class="footer-popup">
                {"Unwatched Filter v0.1.0"}
            </p>
        </div>
    }
}

/// Persist the switch and tell every open host tab
async fn publish_global_state(enabled: bool) -> Result<(), FilterError> {
    bridge::set_global_enabled(enabled).await?;
    bridge::broadcast(&ExtensionMessage::UpdateGlobalState { enabled }).await
}
