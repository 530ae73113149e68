#![cfg(target_arch = "wasm32")]
//! Browser front-end: mounts the hexfield background into a container element.

mod backend;
mod canvas2d;
mod dom;
mod frame;
mod input;
mod listeners;
mod mount;

use hexfield_core::HexFieldConfig;
use wasm_bindgen::prelude::*;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hexfield-web loaded");
    Ok(())
}

/// Handle returned to JavaScript. Dropping it on the JS side (`free()`)
/// tears everything down, as does `dispose()`.
#[wasm_bindgen]
pub struct HexBackground {
    inner: Option<mount::Mounted>,
}

#[wasm_bindgen]
impl HexBackground {
    /// Mount into `container`. `config_json` uses the camelCase keys of
    /// `HexFieldConfig`; malformed JSON falls back to the defaults.
    pub async fn mount(
        container: web::HtmlElement,
        config_json: Option<String>,
    ) -> Result<HexBackground, JsValue> {
        let config = HexFieldConfig::from_json_or_default(config_json.as_deref());
        match mount::mount(container, config).await {
            Ok(mounted) => Ok(HexBackground {
                inner: Some(mounted),
            }),
            Err(e) => {
                log::error!("mount failed: {:?}", e);
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    }

    #[wasm_bindgen(js_name = setPaused)]
    pub fn set_paused(&self, paused: bool) {
        if let Some(m) = self.inner.as_ref() {
            m.set_paused(paused);
        }
    }

    pub fn dispose(&mut self) {
        if let Some(mut m) = self.inner.take() {
            m.dispose();
        }
    }

    /// Name of the active backend, or `undefined` once disposed.
    pub fn backend(&self) -> Option<String> {
        self.inner
            .as_ref()
            .and_then(|m| m.backend())
            .map(|k| k.name().to_string())
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.as_ref().is_some_and(|m| m.is_running())
    }
}
