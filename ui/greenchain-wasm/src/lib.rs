//! GreenChain recycling-rewards browser client.
//!
//! One WASM module serves every page; the page context picked from the URL
//! decides which parts of the client come alive.

pub mod api;
pub mod dom;
pub mod events;
pub mod provider;
pub mod render;
pub mod scanner;
pub mod storage;

use async_trait::async_trait;
use gc_client_core::{AppParts, GreenChainApp, PageContext, QrScanner, Timer};
use gc_session::SessionStore;
use gloo_console::log;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;

pub struct GlooTimer;

#[async_trait(?Send)]
impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

/// WASM entry point, called when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let path = dom::window().location().pathname()?;
    let page = PageContext::from_path(&path);
    log!(format!("GreenChain client on {} page ({path})", page.name()));

    let scanner = page
        .capabilities()
        .scanner
        .then(|| Rc::new(scanner::HtmlQrScanner::new()));

    let app = Rc::new(GreenChainApp::new(AppParts {
        page,
        provider: Rc::new(provider::InjectedEthereum),
        sessions: SessionStore::new(Rc::new(storage::BrowserStore), Rc::new(storage::JsClock)),
        backend: Rc::new(api::FetchRewardsBackend),
        scanner: scanner.clone().map(|s| s as Rc<dyn QrScanner>),
        renderer: Rc::new(render::DomRenderer),
        timer: Rc::new(GlooTimer),
    }));

    if let Some(scanner) = &scanner {
        scanner.attach(&app);
    }
    events::bind_events(&app);

    app.boot().await;
    Ok(())
}
