//! Desktop chrome over the document

use crate::config::Selectors;
use crate::surface::{elements, DomSurface};
use gloo::events::EventListener;
use js_sys::{Function, Reflect};
use mdi_desktop::{Point, Shell, Size, TaskbarItem};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, MouseEvent};

/// Document-level pointer input routed to the manager during a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSignal {
    Move(Point),
    Up,
}

/// Receiver of [`PointerSignal`]s
pub type PointerSink = Rc<dyn Fn(PointerSignal)>;

struct ShellInner {
    document: Document,
    selectors: Rc<Selectors>,
    pointer_sink: RefCell<Option<PointerSink>>,
    pointer_listeners: RefCell<Vec<EventListener>>,
}

/// [`Shell`] over the live document
#[derive(Clone)]
pub struct DomShell {
    inner: Rc<ShellInner>,
}

impl DomShell {
    pub fn new(document: Document, selectors: Rc<Selectors>) -> Self {
        Self {
            inner: Rc::new(ShellInner {
                document,
                selectors,
                pointer_sink: RefCell::new(None),
                pointer_listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    pub fn selectors(&self) -> &Rc<Selectors> {
        &self.inner.selectors
    }

    /// Where captured pointer moves and ups are sent
    pub fn set_pointer_sink(&self, sink: PointerSink) {
        *self.inner.pointer_sink.borrow_mut() = Some(sink);
    }

    /// Drop the sink and any live capture
    pub fn clear_pointer_sink(&self) {
        self.inner.pointer_sink.borrow_mut().take();
        self.release_pointer();
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.inner.document.query_selector(selector).ok().flatten()
    }

    fn html_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.inner
            .document
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn set_body_style(&self, property: &str, value: Option<&str>) {
        let Some(body) = self.inner.document.body() else {
            return;
        };
        let style = body.style();
        let _ = match value {
            Some(value) => style.set_property(property, value),
            None => style.remove_property(property).map(|_| ()),
        };
    }
}

impl Shell for DomShell {
    type Surface = DomSurface;

    fn viewport(&self) -> Size {
        let Some(window) = self.inner.document.default_view() else {
            return Size::default();
        };
        Size::new(dimension(window.inner_width()), dimension(window.inner_height()))
    }

    fn discover_windows(&self) -> Vec<DomSurface> {
        let selectors = &self.inner.selectors;
        let Ok(found) = self.inner.document.query_selector_all(&selectors.windows()) else {
            return Vec::new();
        };
        elements(&found)
            .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
            .map(|element| DomSurface::new(element, selectors.clone()))
            .collect()
    }

    fn attach_window(&self, surface: &DomSurface) {
        let Some(body) = self.inner.document.body() else {
            warn!("document has no body, window not attached");
            return;
        };
        if let Err(e) = body.append_child(surface.element()) {
            warn!(error = %crate::js_error(&e), "could not attach window");
            return;
        }
        activate_content(surface.element());
    }

    fn render_taskbar(&self, items: &[TaskbarItem]) {
        let Some(bar) = self.query(&self.inner.selectors.taskbar) else {
            return;
        };
        let selectors = &self.inner.selectors;
        bar.set_inner_html("");
        for item in items {
            let Ok(node) = self.inner.document.create_element("div") else {
                continue;
            };
            node.set_class_name(&selectors.taskbar_item_class);
            if item.active {
                let _ = node.class_list().add_1(&selectors.active_class);
            }
            let _ = node.set_attribute("data-window", &item.id);
            node.set_text_content(Some(item.name.as_str()));
            let _ = bar.append_child(&node);
        }
    }

    fn set_start_menu_visible(&self, visible: bool) {
        let menu = self
            .query(&self.inner.selectors.start_menu)
            .and_then(|menu| menu.dyn_into::<HtmlElement>().ok());
        if let Some(menu) = menu {
            set_display(&menu, visible);
        }
    }

    fn has_modal(&self, id: &str) -> bool {
        self.inner.document.get_element_by_id(id).is_some()
    }

    fn set_modal_visible(&self, id: &str, visible: bool) {
        if let Some(modal) = self.html_by_id(id) {
            set_display(&modal, visible);
        }
    }

    fn set_overlay_active(&self, active: bool) {
        let selectors = &self.inner.selectors;
        match self.inner.document.get_element_by_id(&selectors.overlay_id) {
            Some(overlay) => {
                let _ = overlay
                    .class_list()
                    .toggle_with_force(&selectors.active_class, active);
            }
            None => warn!(overlay = %selectors.overlay_id, "modal overlay missing"),
        }
    }

    fn capture_pointer(&self) {
        self.set_body_style("user-select", Some("none"));
        let Some(sink) = self.inner.pointer_sink.borrow().clone() else {
            warn!("pointer captured without a sink");
            return;
        };
        let mut listeners = self.inner.pointer_listeners.borrow_mut();
        if !listeners.is_empty() {
            return;
        }
        let document = &self.inner.document;

        let move_sink = sink.clone();
        listeners.push(EventListener::new(document, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                move_sink(PointerSignal::Move(client_point(event)));
            }
        }));
        listeners.push(EventListener::new(document, "mouseup", move |_event| {
            sink(PointerSignal::Up);
        }));
    }

    fn release_pointer(&self) {
        self.set_body_style("user-select", None);
        let listeners = std::mem::take(&mut *self.inner.pointer_listeners.borrow_mut());
        if listeners.is_empty() {
            return;
        }
        // Usually called from inside the mouseup listener itself; its
        // closure must outlive the current dispatch.
        wasm_bindgen_futures::spawn_local(async move {
            drop(listeners);
        });
    }
}

/// Pointer position in viewport pixels
pub fn client_point(event: &MouseEvent) -> Point {
    Point::new(event.client_x(), event.client_y())
}

fn dimension(value: Result<JsValue, JsValue>) -> i32 {
    value.ok().and_then(|v| v.as_f64()).map_or(0, |v| v as i32)
}

fn set_display(element: &HtmlElement, visible: bool) {
    let _ = element
        .style()
        .set_property("display", if visible { "block" } else { "none" });
}

/// Let htmx wire up a freshly inserted window, when htmx is on the page
fn activate_content(element: &HtmlElement) {
    let Ok(htmx) = Reflect::get(&js_sys::global(), &JsValue::from_str("htmx")) else {
        return;
    };
    if !htmx.is_object() {
        return;
    }
    let process = Reflect::get(&htmx, &JsValue::from_str("process")).ok();
    if let Some(process) = process.as_ref().and_then(|p| p.dyn_ref::<Function>()) {
        if let Err(e) = process.call1(&htmx, element) {
            warn!(error = %crate::js_error(&e), "htmx.process failed");
        }
    }
}
