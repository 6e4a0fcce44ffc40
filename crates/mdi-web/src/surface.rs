//! Window DOM node

use crate::config::Selectors;
use js_sys::{Function, Reflect};
use mdi_desktop::{Rect, RenderedStyle, SurfaceLayout, WindowSurface};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, NodeList};

/// Elements under a window that may own an htmx update channel
const HTMX_CHANNELS: &str = "[hx-ext='sse'], [hx-trigger*='every']";

/// Property an element can expose to be told its window is closing
const CANCEL_HOOK: &str = "wmCancel";

/// [`WindowSurface`] over a window's root element
#[derive(Clone, Debug)]
pub struct DomSurface {
    element: HtmlElement,
    selectors: Rc<Selectors>,
}

impl DomSurface {
    pub fn new(element: HtmlElement, selectors: Rc<Selectors>) -> Self {
        Self { element, selectors }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    fn set_style(&self, property: &str, value: &str) {
        let _ = self.element.style().set_property(property, value);
    }

    fn set_data(&self, name: &str, value: &str) {
        let _ = self.element.dataset().set(name, value);
    }
}

impl WindowSurface for DomSurface {
    fn element_id(&self) -> Option<String> {
        let id = self.element.id();
        (!id.is_empty()).then_some(id)
    }

    fn title(&self) -> Option<String> {
        self.element.dataset().get("title")
    }

    fn maximized_flag(&self) -> bool {
        self.element.dataset().get("maximized").as_deref() == Some("true")
    }

    fn rendered_style(&self) -> RenderedStyle {
        let computed = web_sys::window()
            .and_then(|window| window.get_computed_style(&self.element).ok().flatten());
        let Some(computed) = computed else {
            return RenderedStyle::default();
        };
        let value = |name: &str| computed.get_property_value(name).unwrap_or_default();
        RenderedStyle::from_css(
            &value("left"),
            &value("top"),
            &value("width"),
            &value("height"),
            &value("z-index"),
        )
    }

    fn has_window_marker(&self) -> bool {
        let classes = self.element.class_list();
        classes.contains(&self.selectors.window_class) && !classes.contains(&self.selectors.modal_class)
    }

    fn apply_layout(&self, layout: &SurfaceLayout) {
        match *layout {
            SurfaceLayout::Windowed { rect, .. } => {
                self.set_style("left", &px(rect.x));
                self.set_style("top", &px(rect.y));
                self.set_style("width", &px(rect.width));
                self.set_style("height", &px(rect.height));
            }
            SurfaceLayout::Maximized { .. } => {
                self.set_style("left", "0px");
                self.set_style("top", "0px");
                self.set_style("width", "100vw");
                self.set_style("height", "100vh");
            }
        }
        self.set_style("z-index", &layout.z_index().to_string());
        self.set_data("maximized", if layout.is_maximized() { "true" } else { "false" });
    }

    fn capture_restore_geometry(&self, rect: Rect) {
        self.set_data("left", &px(rect.x));
        self.set_data("top", &px(rect.y));
        self.set_data("width", &px(rect.width));
        self.set_data("height", &px(rect.height));
    }

    fn set_active(&self, active: bool) {
        let _ = self
            .element
            .class_list()
            .toggle_with_force(&self.selectors.active_class, active);
    }

    fn is_active(&self) -> bool {
        self.element.class_list().contains(&self.selectors.active_class)
    }

    fn set_disabled(&self, disabled: bool) {
        let _ = self
            .element
            .class_list()
            .toggle_with_force(&self.selectors.disabled_class, disabled);
    }

    fn cancel_subscriptions(&self) -> usize {
        let mut cancelled = 0;
        if let Ok(channels) = self.element.query_selector_all(HTMX_CHANNELS) {
            cancelled += elements(&channels).filter(close_htmx_channel).count();
        }
        if call_cancel_hook(&self.element) {
            cancelled += 1;
        }
        if let Ok(all) = self.element.query_selector_all("*") {
            cancelled += elements(&all).filter(call_cancel_hook).count();
        }
        cancelled
    }

    fn detach(&self) {
        self.element.remove();
    }
}

fn px(value: i32) -> String {
    format!("{}px", value)
}

/// Elements of a node list
pub(crate) fn elements(list: &NodeList) -> impl Iterator<Item = Element> + '_ {
    (0..list.length()).filter_map(|i| list.item(i)?.dyn_into::<Element>().ok())
}

/// Close the SSE source and clear the polling timer htmx attached to `element`
fn close_htmx_channel(element: &Element) -> bool {
    let mut closed = false;
    if let Ok(source) = Reflect::get(element, &JsValue::from_str("_htmx_sse_source")) {
        if source.is_object() && call_method(&source, "close") {
            closed = true;
        }
    }
    if let Ok(interval) = Reflect::get(element, &JsValue::from_str("_htmxInterval")) {
        if let (Some(handle), Some(window)) = (interval.as_f64(), web_sys::window()) {
            window.clear_interval_with_handle(handle as i32);
            closed = true;
        }
    }
    closed
}

fn call_cancel_hook(element: &Element) -> bool {
    call_method(element, CANCEL_HOOK)
}

/// Call `target[name]()` if it is a function; `true` if it returned normally
fn call_method(target: &JsValue, name: &str) -> bool {
    let Ok(method) = Reflect::get(target, &JsValue::from_str(name)) else {
        return false;
    };
    match method.dyn_ref::<Function>() {
        Some(method) => method.call0(target).is_ok(),
        None => false,
    }
}
