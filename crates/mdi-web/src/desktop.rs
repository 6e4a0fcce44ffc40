//! The running desktop: manager, seams and document listeners
//!
//! All window, taskbar and start-menu input is handled by a few listeners
//! on the document that find their target with `closest`, so windows and
//! taskbar items added later need no wiring of their own.

use crate::config::{Selectors, WebConfig};
use crate::content::HttpContentProvider;
use crate::shell::{client_point, DomShell, PointerSignal};
use crate::storage::LocalStore;
use gloo::events::{EventListener, EventListenerOptions};
use mdi_desktop::{ContentProvider, MenuSelection, WindowManager};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, MouseEvent};

/// Window manager bound to the document
pub type Desktop = WindowManager<DomShell, LocalStore>;

type SharedDesktop = Rc<RefCell<Desktop>>;

/// Run `f` on the manager unless it is already borrowed further up the stack
pub(crate) fn with_desktop<R>(desktop: &SharedDesktop, f: impl FnOnce(&mut Desktop) -> R) -> Option<R> {
    match desktop.try_borrow_mut() {
        Ok(mut desktop) => Some(f(&mut desktop)),
        Err(_) => {
            warn!("window manager busy, input dropped");
            None
        }
    }
}

/// A booted desktop
pub struct App {
    desktop: SharedDesktop,
    shell: DomShell,
    provider: Rc<HttpContentProvider>,
    listeners: Vec<EventListener>,
}

impl App {
    /// Register pre-rendered windows, wire the document and start restoring
    /// the windows open before the reload
    pub fn start(document: Document, config: WebConfig) -> Self {
        let selectors = Rc::new(config.selectors);
        let shell = DomShell::new(document, selectors.clone());
        let provider = Rc::new(HttpContentProvider::new(config.content_url_prefix, selectors));
        let desktop = Rc::new(RefCell::new(WindowManager::new(
            config.desktop,
            shell.clone(),
            LocalStore::new(),
        )));

        let weak = Rc::downgrade(&desktop);
        shell.set_pointer_sink(Rc::new(move |signal| {
            let Some(desktop) = weak.upgrade() else {
                return;
            };
            with_desktop(&desktop, |desktop| match signal {
                PointerSignal::Move(pointer) => desktop.pointer_move(pointer),
                PointerSignal::Up => desktop.pointer_up(),
            });
        }));

        desktop.borrow_mut().init();

        let mut app = Self {
            desktop,
            shell,
            provider,
            listeners: Vec::new(),
        };
        app.install_listeners();
        app.spawn_restore();
        info!(windows = app.desktop.borrow().window_count(), "desktop started");
        app
    }

    pub fn desktop(&self) -> &SharedDesktop {
        &self.desktop
    }

    /// Run `f` on the manager
    pub fn with<R>(&self, f: impl FnOnce(&mut Desktop) -> R) -> Option<R> {
        with_desktop(&self.desktop, f)
    }

    /// Stop handling input; the page's DOM is left as it is
    pub fn shutdown(self) {
        self.with(|desktop| desktop.teardown());
        self.shell.clear_pointer_sink();
        drop(self.listeners);
        debug!("desktop listeners removed");
    }

    fn spawn_restore(&self) {
        let desktop = self.desktop.clone();
        let provider = self.provider.clone();
        spawn_local(async move {
            let pending = with_desktop(&desktop, |desktop| desktop.take_pending_restores())
                .unwrap_or_default();
            let mut restored = 0;
            for id in pending {
                let fetched = provider.fetch_window(&id).await;
                if let Some(Some(_)) = with_desktop(&desktop, |desktop| desktop.adopt_restored(&id, fetched)) {
                    restored += 1;
                }
            }
            info!(count = restored, "restored open windows");
        });
    }

    fn install_listeners(&mut self) {
        let document = self.shell.document().clone();
        let selectors = self.shell.selectors().clone();

        let desktop = self.desktop.clone();
        let sel = selectors.clone();
        self.listeners.push(EventListener::new_with_options(
            &document,
            "mousedown",
            EventListenerOptions::enable_prevent_default(),
            move |event| on_mouse_down(&desktop, &sel, event),
        ));

        let desktop = self.desktop.clone();
        let provider = self.provider.clone();
        let sel = selectors.clone();
        self.listeners.push(EventListener::new(&document, "click", move |event| {
            on_click(&desktop, &provider, &sel, event)
        }));

        let doc = document.clone();
        let sel = selectors;
        self.listeners.push(EventListener::new(&document, "mouseup", move |_event| {
            clear_pressed(&doc, &sel);
        }));
    }
}

fn target_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn closest(element: &Element, selector: &str) -> Option<Element> {
    element.closest(selector).ok().flatten()
}

fn on_mouse_down(desktop: &SharedDesktop, selectors: &Selectors, event: &Event) {
    let Some(target) = target_element(event) else {
        return;
    };
    if target.matches(&selectors.button).unwrap_or(false) {
        let _ = target.class_list().add_1(&selectors.pressed_class);
    }

    let Some(window) = closest(&target, &selectors.windows()) else {
        return;
    };
    let id = window.id();
    if id.is_empty() {
        return;
    }
    let primary = event
        .dyn_ref::<MouseEvent>()
        .filter(|mouse| mouse.button() == 0);
    let handle = closest(&target, &selectors.resize_handle());

    with_desktop(desktop, |desktop| {
        // An inline startDrag/startResize handler already ran for this press
        if desktop.session().is_some_and(|session| session.window_id() == id) {
            return;
        }
        if let (Some(mouse), Some(handle)) = (primary, handle.as_ref()) {
            if let Some(direction) = handle.get_attribute("data-dir") {
                desktop.start_resize(&id, &direction, client_point(mouse));
                return;
            }
        }
        if let Some(mouse) = primary {
            if closest(&target, &selectors.drag_handle).is_some() {
                desktop.start_drag(&id, client_point(mouse));
                return;
            }
        }
        desktop.window_pointer_down(&id, handle.is_some());
    });
    event.prevent_default();
}

fn on_click(
    desktop: &SharedDesktop,
    provider: &Rc<HttpContentProvider>,
    selectors: &Selectors,
    event: &Event,
) {
    let Some(target) = target_element(event) else {
        return;
    };

    if closest(&target, &selectors.start_button).is_some() {
        with_desktop(desktop, |desktop| desktop.toggle_start_menu());
        return;
    }
    if let Some(item) = closest(&target, &selectors.start_menu_item) {
        match item.get_attribute("data-window") {
            Some(id) => open_from_start_menu(desktop.clone(), provider.clone(), id),
            None => warn!("start menu item without data-window"),
        }
        return;
    }

    with_desktop(desktop, |desktop| {
        if desktop.start_menu_open() {
            desktop.close_start_menu();
        }
        if let Some(item) = closest(&target, &format!(".{}", selectors.taskbar_item_class)) {
            if let Some(id) = item.get_attribute("data-window") {
                desktop.bring_to_front(&id);
            }
            return;
        }
        let Some(window) = closest(&target, &selectors.windows()) else {
            return;
        };
        if closest(&target, &selectors.close_button).is_some() {
            desktop.close_window(&window.id());
        } else if closest(&target, &selectors.maximize_button).is_some() {
            desktop.maximize_window(&window.id());
        }
    });
}

/// Raise an open window, or fetch it without holding the manager across
/// the request
fn open_from_start_menu(desktop: SharedDesktop, provider: Rc<HttpContentProvider>, id: String) {
    let Some(selection) = with_desktop(&desktop, |desktop| desktop.select_start_menu_item(&id)) else {
        return;
    };
    let MenuSelection::NeedsFetch(id) = selection else {
        return;
    };
    spawn_local(async move {
        let fetched = provider.fetch_window(&id).await;
        with_desktop(&desktop, |desktop| {
            let opened = if desktop.contains(&id) {
                Some(id.clone())
            } else {
                desktop.install_fetched(&id, fetched)
            };
            if let Some(opened) = opened {
                desktop.focus_window(&opened);
            }
        });
    });
}

fn clear_pressed(document: &Document, selectors: &Selectors) {
    let Ok(pressed) = document.query_selector_all(&format!(".{}", selectors.pressed_class)) else {
        return;
    };
    for element in crate::surface::elements(&pressed) {
        let _ = element.class_list().remove_1(&selectors.pressed_class);
    }
}
