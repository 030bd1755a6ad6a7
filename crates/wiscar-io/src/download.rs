//! File download via a transient anchor element.
//!
//! Dioxus has no built-in file download API. [`BrowserDownload`]
//! triggers downloads by creating an `<a href=... download=...>`,
//! appending it to the document body, clicking it, and removing it
//! again.
//!
//! All methods require a browser environment
//! (`wasm32-unknown-unknown` target).

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlAnchorElement, HtmlElement};
use wiscar_label::{DownloadError, DownloadTarget};

fn platform(value: JsValue) -> DownloadError {
    DownloadError::Platform(format!("{value:?}"))
}

fn document() -> Result<web_sys::Document, DownloadError> {
    web_sys::window()
        .ok_or_else(|| DownloadError::Platform("no global window".into()))?
        .document()
        .ok_or_else(|| DownloadError::Platform("no document".into()))
}

fn body() -> Result<HtmlElement, DownloadError> {
    document()?
        .body()
        .ok_or_else(|| DownloadError::Platform("no document body".into()))
}

/// The browser's download mechanism.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDownload;

impl DownloadTarget for BrowserDownload {
    type Anchor = HtmlAnchorElement;

    fn create_anchor(
        &self,
        href: &str,
        filename: &str,
    ) -> Result<HtmlAnchorElement, DownloadError> {
        let anchor = document()?
            .create_element("a")
            .map_err(platform)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|e| DownloadError::Platform(format!("failed to cast element: {e:?}")))?;
        anchor.set_href(href);
        anchor.set_download(filename);
        Ok(anchor)
    }

    fn attach(&self, anchor: &HtmlAnchorElement) -> Result<(), DownloadError> {
        body()?.append_child(anchor).map_err(platform)?;
        Ok(())
    }

    fn activate(&self, anchor: &HtmlAnchorElement) {
        anchor.click();
    }

    fn detach(&self, anchor: &HtmlAnchorElement) {
        // The download is already initiated; a failed removal is not a
        // failed download.
        anchor.remove();
    }
}
