//! wiscar-label: Sample label rendering and export (sans-IO).
//!
//! Builds the fixed two-block mount label for a [`SampleRecord`],
//! orchestrates exporting the rendered label region as a PNG download,
//! and describes the site's page composition as a typed
//! [`SiteConfig`].
//!
//! This crate has **no browser dependencies** -- rasterization and the
//! download mechanism are reached through the [`Rasterizer`] and
//! [`DownloadTarget`] traits. The browser implementations live in
//! `wiscar-io`.

pub mod config;
pub mod export;
pub mod layout;
pub mod record;
pub mod region;

pub use config::{ConfigError, Panel, SamplePage, SiteConfig, TabGroup, TabSpec};
pub use export::{
    DownloadError, DownloadTarget, ExportError, ExportedFile, LabelExporter, RasterError,
    Rasterizer, export_filename,
};
pub use layout::{LabelLayout, LabelLine, TRIGGER_CAPTION, render_label};
pub use record::SampleRecord;
pub use region::RegionHandle;

/// Re-export `RgbaImage` so rasterizer implementations can name the
/// raster type without depending on `image` directly.
pub use image::RgbaImage;
