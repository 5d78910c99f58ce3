//! Event binding.
//!
//! Listeners are bound per page capability. Async handlers run on the local
//! executor via `wasm_bindgen_futures::spawn_local`.

use crate::dom;
use crate::render::{
    ACTION_DONATE, ACTION_GRANT_CAMERA, ACTION_RELOAD, ACTION_RETRY_SCANNER, ACTION_SCAN_AGAIN,
};
use gc_client_core::{CLAIM_PREFIX, GreenChainApp};
use gloo_console::warn;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, KeyboardEvent};

/// Attach an async handler for `$event` on element `$id`, if present.
macro_rules! on_event_async {
    ($id:expr, $event:literal, $app:expr, $handler:expr) => {{
        if let Some(el) = dom::by_id($id) {
            let app = Rc::clone($app);
            let cb = Closure::wrap(Box::new(move |event: Event| {
                let app = Rc::clone(&app);
                wasm_bindgen_futures::spawn_local($handler(app, event));
            }) as Box<dyn FnMut(_)>);
            if el
                .add_event_listener_with_callback($event, cb.as_ref().unchecked_ref())
                .is_err()
            {
                warn!(format!("could not bind {} on #{}", $event, $id));
            }
            cb.forget();
        }
    }};
}

/// Bind every listener the current page supports. Call once after init.
pub fn bind_events(app: &Rc<GreenChainApp>) {
    let caps = app.capabilities();

    if caps.connect_button {
        on_event_async!(dom::BTN_CONNECT, "click", app, |app: Rc<GreenChainApp>, _| async move {
            app.connect().await;
        });
    }

    if caps.wallet_panel {
        on_event_async!(dom::BTN_DISCONNECT, "click", app, |app: Rc<GreenChainApp>, _| async move {
            app.disconnect();
        });
    }

    if caps.balance_button {
        on_event_async!(dom::BTN_BALANCE, "click", app, |app: Rc<GreenChainApp>, _| async move {
            app.refresh_balance().await;
        });
    }

    if caps.manual_entry {
        on_event_async!(dom::BTN_SUBMIT_QR, "click", app, |app: Rc<GreenChainApp>, _| async move {
            submit_manual(&app).await;
        });
        on_event_async!(
            dom::MANUAL_QR_INPUT,
            "keydown",
            app,
            |app: Rc<GreenChainApp>, event: Event| async move {
                let enter = event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|key| key.key() == "Enter");
                if enter {
                    submit_manual(&app).await;
                }
            }
        );
    }

    if caps.scanner || caps.manual_entry {
        on_event_async!(
            dom::RESULT,
            "click",
            app,
            |app: Rc<GreenChainApp>, event: Event| async move {
                match clicked_action(&event).as_deref() {
                    Some(ACTION_SCAN_AGAIN) => app.restart_scanner().await,
                    Some(ACTION_GRANT_CAMERA) => app.request_camera_permission().await,
                    Some(ACTION_RETRY_SCANNER) => app.start_scanner().await,
                    Some(ACTION_RELOAD) => dom::reload(),
                    _ => {}
                }
            }
        );
    }

    if caps.donation {
        on_event_async!(dom::BTN_CONVERT, "click", app, |app: Rc<GreenChainApp>, _| async move {
            let amount = dom::amount_value(dom::TOKEN_AMOUNT).unwrap_or(0);
            app.convert_tokens(amount).await;
        });
        on_event_async!(
            dom::BTN_SHOW_DONATIONS,
            "click",
            app,
            |app: Rc<GreenChainApp>, _| async move {
                let _ = app.show_donation_options().await;
            }
        );
        on_event_async!(
            dom::DONATION_OPTIONS,
            "click",
            app,
            |app: Rc<GreenChainApp>, event: Event| async move {
                if clicked_action(&event).as_deref() == Some(ACTION_DONATE) {
                    let ngo = dom::select_value(dom::NGO_SELECT).unwrap_or_default();
                    let amount = dom::amount_value(dom::DONATION_AMOUNT).unwrap_or(0);
                    app.donate(&ngo, amount).await;
                }
            }
        );
    }
}

async fn submit_manual(app: &GreenChainApp) {
    let Some(raw) = dom::input_value(dom::MANUAL_QR_INPUT) else {
        return;
    };
    if raw.starts_with(CLAIM_PREFIX) {
        dom::clear_input(dom::MANUAL_QR_INPUT);
    }
    app.submit_manual(&raw).await;
}

/// `data-action` of the nearest button around the click target.
fn clicked_action(event: &Event) -> Option<String> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target
        .closest("[data-action]")
        .ok()
        .flatten()?
        .get_attribute("data-action")
}
