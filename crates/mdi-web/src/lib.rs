//! Browser binding for the mdi-desktop window manager
//!
//! Boots a [`WindowManager`](mdi_desktop::WindowManager) over the live
//! document:
//! - [`DomSurface`]: window elements
//! - [`DomShell`]: taskbar, start menu, modals and pointer capture
//! - [`LocalStore`]: layout persistence in `localStorage`
//! - [`HttpContentProvider`]: window markup fetched on demand
//!
//! ## Usage
//!
//! ```js
//! import init, { boot } from "./mdi_web.js";
//!
//! await init();
//! boot(JSON.stringify({ logLevel: "debug" }));
//! ```
//!
//! `boot` also installs `startDrag`, `startResize`, `maximizeWindow`,
//! `closeWindow`, `openModal` and `closeModal` on `window` for inline
//! handlers in server-rendered markup.

mod config;
mod console;
mod content;
mod desktop;
mod shell;
mod storage;
mod surface;

pub use config::{Selectors, WebConfig};
pub use console::{console_subscriber, init_logging};
pub use content::HttpContentProvider;
pub use desktop::{App, Desktop};
pub use shell::{DomShell, PointerSignal, PointerSink};
pub use storage::LocalStore;
pub use surface::DomSurface;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Global functions installed on `window` by [`boot`]
const GLOBALS: [&str; 6] = [
    "startDrag",
    "startResize",
    "maximizeWindow",
    "closeWindow",
    "openModal",
    "closeModal",
];

/// Readable text of a thrown JS value
pub(crate) fn js_error(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", value)
}

fn with_app<R>(f: impl FnOnce(&App) -> R) -> Option<R> {
    APP.with(|app| app.borrow().as_ref().map(f))
}

/// Start the desktop
///
/// `config_json` is an optional [`WebConfig`] as JSON. Booting twice shuts
/// the first desktop down.
#[wasm_bindgen]
pub fn boot(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) if !json.trim().is_empty() => {
            WebConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?
        }
        _ => WebConfig::default(),
    };
    init_logging(config.filter());

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    shutdown();
    let app = App::start(document, config);
    APP.with(|slot| *slot.borrow_mut() = Some(app));
    install_globals()?;
    Ok(())
}

/// Stop the desktop and remove the globals installed by [`boot`]
#[wasm_bindgen]
pub fn shutdown() {
    let app = APP.with(|slot| slot.borrow_mut().take());
    if let Some(app) = app {
        app.shutdown();
        remove_globals();
    }
}

/// Start dragging window `id` from a title-bar mousedown
#[wasm_bindgen(js_name = startDrag)]
pub fn start_drag(event: &MouseEvent, id: &str) {
    event.prevent_default();
    let pointer = shell::client_point(event);
    with_app(|app| app.with(|desktop| desktop.start_drag(id, pointer)));
}

/// Start resizing window `id` from a handle mousedown; `dir` is a compass
/// subset such as `"se"`
#[wasm_bindgen(js_name = startResize)]
pub fn start_resize(event: &MouseEvent, id: &str, dir: &str) {
    event.prevent_default();
    let pointer = shell::client_point(event);
    with_app(|app| app.with(|desktop| desktop.start_resize(id, dir, pointer)));
}

#[wasm_bindgen(js_name = maximizeWindow)]
pub fn maximize_window(id: &str) {
    with_app(|app| app.with(|desktop| desktop.maximize_window(id)));
}

#[wasm_bindgen(js_name = closeWindow)]
pub fn close_window(id: &str) {
    with_app(|app| app.with(|desktop| desktop.close_window(id)));
}

#[wasm_bindgen(js_name = openModal)]
pub fn open_modal(id: &str) {
    with_app(|app| app.with(|desktop| desktop.open_modal(id)));
}

#[wasm_bindgen(js_name = closeModal)]
pub fn close_modal(id: &str) {
    with_app(|app| app.with(|desktop| desktop.close_modal(id)));
}

fn install_globals() -> Result<(), JsValue> {
    let global = js_sys::global();
    let functions: [JsValue; 6] = [
        Closure::<dyn Fn(MouseEvent, String)>::new(|event: MouseEvent, id: String| {
            start_drag(&event, &id)
        })
        .into_js_value(),
        Closure::<dyn Fn(MouseEvent, String, String)>::new(
            |event: MouseEvent, id: String, dir: String| start_resize(&event, &id, &dir),
        )
        .into_js_value(),
        Closure::<dyn Fn(String)>::new(|id: String| maximize_window(&id)).into_js_value(),
        Closure::<dyn Fn(String)>::new(|id: String| close_window(&id)).into_js_value(),
        Closure::<dyn Fn(String)>::new(|id: String| open_modal(&id)).into_js_value(),
        Closure::<dyn Fn(String)>::new(|id: String| close_modal(&id)).into_js_value(),
    ];
    for (name, function) in GLOBALS.iter().zip(functions.iter()) {
        js_sys::Reflect::set(&global, &JsValue::from_str(name), function)?;
    }
    Ok(())
}

fn remove_globals() {
    let global = js_sys::global();
    for name in GLOBALS {
        let _ = js_sys::Reflect::delete_property(&global, &JsValue::from_str(name));
    }
}

