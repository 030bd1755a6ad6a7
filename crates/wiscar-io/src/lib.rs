//! wiscar-io: Browser I/O and Dioxus component library.
//!
//! Implements the label exporter's collaborators on top of the Web
//! APIs (canvas rasterization, anchor downloads) and provides the UI
//! components the WiscAr site is composed of.

pub mod components;
pub mod download;
pub mod raster;

pub use components::{Markdown, SampleLabel, TabPanel};
pub use download::BrowserDownload;
pub use raster::CanvasRasterizer;
