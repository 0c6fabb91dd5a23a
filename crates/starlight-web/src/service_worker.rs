//! Offline support: register the site's service worker script.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{ServiceWorkerRegistration, Window};

use crate::dom::js_error;

/// Register `script` in the background. Browsers without service worker
/// support (or insecure origins) are skipped quietly.
pub fn register(window: &Window, script: &str) {
    let navigator = window.navigator();
    let supported = js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker"))
        .unwrap_or(false);
    if !supported {
        tracing::debug!("Service workers unsupported, skipping registration");
        return;
    }

    let promise = navigator.service_worker().register(script);
    let script = script.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(registration) => {
                let scope = registration
                    .dyn_into::<ServiceWorkerRegistration>()
                    .map(|r| r.scope())
                    .unwrap_or_default();
                tracing::info!(%script, %scope, "Service worker registered");
            }
            Err(e) => {
                tracing::error!(%script, error = %js_error(e), "Service worker registration failed");
            }
        }
    });
}
