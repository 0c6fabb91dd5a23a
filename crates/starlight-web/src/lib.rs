//! Browser entry point: reads page config, installs logging and wires the
//! page's event handlers.

pub mod context;
pub mod dom;
pub mod handlers;
pub mod logging;
pub mod service_worker;
pub mod storage;
pub mod views;

use starlight_core::config::SiteConfig;
use wasm_bindgen::prelude::*;

use crate::context::PageContext;

/// Id of the optional `<script type="application/toml">` element holding
/// config overrides.
const CONFIG_ELEMENT_ID: &str = "starlight-config";

#[wasm_bindgen(start)]
pub fn start() {
    let overrides = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());

    let (config, config_error) = match overrides.as_deref().map(SiteConfig::with_overrides) {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (SiteConfig::default(), Some(e)),
        None => (SiteConfig::default(), None),
    };

    logging::init(&config.logging.filter);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Invalid page config, using defaults");
    }

    match PageContext::new(config) {
        Some(ctx) => {
            if let Some(script) = ctx.config.service_worker.script() {
                service_worker::register(&ctx.window, script);
            }
            handlers::install(&ctx);
            tracing::info!("Starlight page behavior ready");
        }
        None => tracing::warn!("No window or document, nothing to wire"),
    }
}
