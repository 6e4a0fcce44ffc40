//! Window content fetched from the server

use crate::config::Selectors;
use crate::js_error;
use crate::surface::DomSurface;
use mdi_desktop::{ContentProvider, DesktopError, DesktopResult, WindowSurface};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, HtmlElement, Request, RequestInit, Response};

/// Fetches `GET {prefix}{id}` as an htmx-style partial
#[derive(Clone, Debug)]
pub struct HttpContentProvider {
    prefix: String,
    selectors: Rc<Selectors>,
}

impl HttpContentProvider {
    pub fn new(prefix: impl Into<String>, selectors: Rc<Selectors>) -> Self {
        Self {
            prefix: prefix.into(),
            selectors,
        }
    }

    /// URL of window `id`'s content
    pub fn url(&self, id: &str) -> String {
        format!("{}{}", self.prefix, id)
    }

    async fn fetch_markup(&self, id: &str) -> Result<String, String> {
        let window = web_sys::window().ok_or("no window")?;

        let headers = Headers::new().map_err(|e| js_error(&e))?;
        headers
            .set("HX-Request", "true")
            .map_err(|e| js_error(&e))?;
        let init = RequestInit::new();
        init.set_method("GET");
        init.set_headers(&headers);
        let request =
            Request::new_with_str_and_init(&self.url(id), &init).map_err(|e| js_error(&e))?;

        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error(&e))?
            .dyn_into()
            .map_err(|e: JsValue| js_error(&e))?;
        if !response.ok() {
            return Err(format!("HTTP {}", response.status()));
        }

        let text = response.text().map_err(|e| js_error(&e))?;
        let body = JsFuture::from(text).await.map_err(|e| js_error(&e))?;
        Ok(body.as_string().unwrap_or_default())
    }

    /// Parse markup and return its first element, which must be a window
    fn parse(&self, id: &str, markup: &str) -> DesktopResult<DomSurface> {
        let invalid = || DesktopError::InvalidContent { id: id.to_string() };
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(invalid)?;
        let container = document.create_element("div").map_err(|_| invalid())?;
        container.set_inner_html(markup.trim());
        let root = container
            .first_element_child()
            .and_then(|root| root.dyn_into::<HtmlElement>().ok())
            .ok_or_else(invalid)?;
        root.remove();
        let surface = DomSurface::new(root, self.selectors.clone());
        if !surface.has_window_marker() {
            return Err(invalid());
        }
        Ok(surface)
    }
}

impl ContentProvider for HttpContentProvider {
    type Surface = DomSurface;

    async fn fetch_window(&self, id: &str) -> DesktopResult<DomSurface> {
        tracing::debug!(window = %id, url = %self.url(id), "fetching window");
        let markup = self
            .fetch_markup(id)
            .await
            .map_err(|reason| DesktopError::FetchFailed {
                id: id.to_string(),
                reason,
            })?;
        self.parse(id, &markup)
    }
}
