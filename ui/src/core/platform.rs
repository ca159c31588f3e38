//! Platform glue: where JSON resources come from and where the current
//! view is remembered (URL fragment on the web, memory on desktop).

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use super::cache::ResourceFetcher;
use super::dataset::DataError;

/// Relative location of the named JSON resources.
pub const ASSET_DIR: &str = "assets";

/// Address bar (or stand-in) holding the slug of the current view.
pub trait FragmentHost {
    /// Current fragment without the leading `#`, if any.
    fn fragment(&self) -> Option<String>;
    /// Replace the fragment in place; must not add a history entry.
    fn replace_fragment(&self, slug: &str);
}

/// Fragment kept in memory; used on desktop and in tests.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    current: RefCell<Option<String>>,
}

impl MemoryLocation {
    pub fn new(initial: Option<&str>) -> Self {
        Self {
            current: RefCell::new(initial.map(str::to_string)),
        }
    }
}

impl FragmentHost for MemoryLocation {
    fn fragment(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    fn replace_fragment(&self, slug: &str) {
        *self.current.borrow_mut() = Some(slug.to_string());
    }
}

/// `window.location.hash`, updated through `history.replaceState`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct BrowserLocation;

#[cfg(target_arch = "wasm32")]
impl FragmentHost for BrowserLocation {
    fn fragment(&self) -> Option<String> {
        let hash = web_sys::window()?.location().hash().ok()?;
        let trimmed = hash.trim_start_matches('#');
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn replace_fragment(&self, slug: &str) {
        let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
            return;
        };
        let url = format!("#{slug}");
        if history
            .replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url))
            .is_err()
        {
            tracing::warn!(slug, "unable to update location fragment");
        }
    }
}

pub fn default_location() -> Rc<dyn FragmentHost> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(BrowserLocation)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryLocation::default())
    }
}

/// Fetches `assets/<name>.json` over HTTP relative to the page.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct AssetFetcher;

#[cfg(target_arch = "wasm32")]
impl ResourceFetcher for AssetFetcher {
    fn fetch<'a>(&'a self, name: &'a str) -> LocalBoxFuture<'a, Result<String, DataError>> {
        Box::pin(async move {
            use wasm_bindgen::JsCast;
            use wasm_bindgen_futures::JsFuture;

            let fail = |message: &str| DataError::Fetch {
                name: name.to_string(),
                message: message.to_string(),
            };

            let url = format!("{ASSET_DIR}/{name}.json");
            let window = web_sys::window().ok_or_else(|| fail("window unavailable"))?;
            let response: web_sys::Response = JsFuture::from(window.fetch_with_str(&url))
                .await
                .map_err(|_| fail("network error"))?
                .dyn_into()
                .map_err(|_| fail("unexpected fetch response"))?;

            if !response.ok() {
                return Err(fail(&format!("HTTP {}", response.status())));
            }

            let text = JsFuture::from(response.text().map_err(|_| fail("unreadable body"))?)
                .await
                .map_err(|_| fail("unreadable body"))?;
            text.as_string().ok_or_else(|| fail("body is not text"))
        })
    }
}

/// Reads `<resource dir>/assets/<name>.json` from disk.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    root: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl AssetFetcher {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for AssetFetcher {
    fn default() -> Self {
        Self::new(ASSET_DIR)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ResourceFetcher for AssetFetcher {
    fn fetch<'a>(&'a self, name: &'a str) -> LocalBoxFuture<'a, Result<String, DataError>> {
        Box::pin(async move {
            let path = self.root.join(format!("{name}.json"));
            std::fs::read_to_string(&path).map_err(|err| DataError::Fetch {
                name: name.to_string(),
                message: format!("{}: {err}", path.display()),
            })
        })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn memory_location_replaces_in_place() {
        let location = MemoryLocation::new(Some("song_stats"));
        assert_eq!(location.fragment().as_deref(), Some("song_stats"));
        location.replace_fragment("countries");
        assert_eq!(location.fragment().as_deref(), Some("countries"));
    }

    #[test]
    fn missing_asset_file_is_a_fetch_error() {
        let fetcher = AssetFetcher::new(std::env::temp_dir().join("tunelog-missing-assets"));
        let err = block_on(fetcher.fetch("nope")).unwrap_err();
        assert!(matches!(err, DataError::Fetch { ref name, .. } if name == "nope"));
    }

    #[test]
    fn asset_file_is_read() {
        let fetcher = AssetFetcher::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
        let raw = block_on(fetcher.fetch("basics_dict")).unwrap();
        assert!(raw.contains("top_1_artist"));
    }
}
