//! Camera QR scanner.
//!
//! The html5-qrcode widget is driven through `js/qr_scanner.js`; decodes and
//! decode errors are handed back to the app on the local executor.

use crate::dom;
use async_trait::async_trait;
use gc_client_core::{GreenChainApp, QrScanner, ScannerError};
use gloo_console::log;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    MediaDeviceInfo, MediaDeviceKind, MediaDevices, MediaStream, MediaStreamConstraints,
    MediaStreamTrack,
};

const SCAN_FPS: u32 = 5;
const SCAN_BOX_PX: u32 = 250;

#[wasm_bindgen(module = "/js/qr_scanner.js")]
extern "C" {
    #[wasm_bindgen(js_name = startQrScanner, catch)]
    fn start_qr_scanner(
        element_id: &str,
        fps: u32,
        box_size: u32,
        on_success: &js_sys::Function,
        on_error: &js_sys::Function,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(js_name = stopQrScanner)]
    fn stop_qr_scanner();
}

struct Callbacks {
    on_success: Closure<dyn FnMut(String)>,
    on_error: Closure<dyn FnMut(String)>,
}

pub struct HtmlQrScanner {
    element_id: &'static str,
    callbacks: RefCell<Option<Callbacks>>,
}

fn js_message(err: &JsValue) -> String {
    js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

fn media_devices() -> Result<MediaDevices, ScannerError> {
    dom::window()
        .navigator()
        .media_devices()
        .map_err(|err| ScannerError(js_message(&err)))
}

impl HtmlQrScanner {
    pub fn new() -> Self {
        Self {
            element_id: dom::READER,
            callbacks: RefCell::new(None),
        }
    }

    /// Routes scanner callbacks into `app`. Holds a weak handle since the
    /// app owns this scanner.
    pub fn attach(&self, app: &Rc<GreenChainApp>) {
        let weak: Weak<GreenChainApp> = Rc::downgrade(app);
        let on_success = {
            let weak = weak.clone();
            Closure::wrap(Box::new(move |text: String| {
                if let Some(app) = weak.upgrade() {
                    spawn_local(async move { app.on_decoded(&text).await });
                }
            }) as Box<dyn FnMut(String)>)
        };
        let on_error = Closure::wrap(Box::new(move |message: String| {
            if let Some(app) = weak.upgrade() {
                spawn_local(async move { app.on_decode_error(&message).await });
            }
        }) as Box<dyn FnMut(String)>);

        *self.callbacks.borrow_mut() = Some(Callbacks {
            on_success,
            on_error,
        });
    }
}

impl Default for HtmlQrScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl QrScanner for HtmlQrScanner {
    async fn has_camera(&self) -> Result<bool, ScannerError> {
        let promise = media_devices()?
            .enumerate_devices()
            .map_err(|err| ScannerError(js_message(&err)))?;
        let devices = JsFuture::from(promise)
            .await
            .map_err(|err| ScannerError(js_message(&err)))?;

        Ok(js_sys::Array::from(&devices).iter().any(|device| {
            device.unchecked_into::<MediaDeviceInfo>().kind() == MediaDeviceKind::Videoinput
        }))
    }

    async fn start(&self) -> Result<(), ScannerError> {
        let callbacks = self.callbacks.borrow();
        let Some(callbacks) = callbacks.as_ref() else {
            return Err(ScannerError("scanner is not attached".to_string()));
        };
        start_qr_scanner(
            self.element_id,
            SCAN_FPS,
            SCAN_BOX_PX,
            callbacks.on_success.as_ref().unchecked_ref(),
            callbacks.on_error.as_ref().unchecked_ref(),
        )
        .map_err(|err| ScannerError(js_message(&err)))
    }

    fn stop(&self) {
        stop_qr_scanner();
        dom::set_html(self.element_id, "");
    }

    async fn request_camera_permission(&self) -> Result<(), ScannerError> {
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&JsValue::TRUE);
        let promise = media_devices()?
            .get_user_media_with_constraints(&constraints)
            .map_err(|err| ScannerError(js_message(&err)))?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(|err| ScannerError(js_message(&err)))?
            .unchecked_into();

        // Only the grant matters; the scanner opens its own stream.
        for track in stream.get_tracks().iter() {
            track.unchecked_into::<MediaStreamTrack>().stop();
        }
        log!("camera permission granted");
        Ok(())
    }
}
