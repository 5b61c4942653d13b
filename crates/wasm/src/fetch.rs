//! Shader fetching through the browser `fetch` API.

use first_triangle_core::loader::NO_CACHE_HEADERS;
use first_triangle_core::{LoadError, SourceFetcher};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCache, RequestInit, Response, Window};

/// Fetches page-relative resources, bypassing the HTTP cache.
pub struct WebFetcher {
    window: Window,
}

impl WebFetcher {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl SourceFetcher for WebFetcher {
    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        let fail = |e: JsValue| LoadError::Fetch {
            path: path.to_string(),
            reason: describe(&e),
        };

        let init = RequestInit::new();
        init.set_method("GET");
        init.set_cache(RequestCache::NoCache);
        let request = Request::new_with_str_and_init(path, &init).map_err(fail)?;
        for (name, value) in NO_CACHE_HEADERS {
            request.headers().set(name, value).map_err(fail)?;
        }

        let response: Response = JsFuture::from(self.window.fetch_with_request(&request))
            .await
            .map_err(fail)?
            .dyn_into()
            .map_err(fail)?;
        if !response.ok() {
            return Err(LoadError::Status {
                path: path.to_string(),
                status: response.status(),
            });
        }

        let body = JsFuture::from(response.text().map_err(fail)?)
            .await
            .map_err(fail)?;
        body.as_string().ok_or_else(|| LoadError::Fetch {
            path: path.to_string(),
            reason: "response body is not text".into(),
        })
    }
}
