//! Exporting a rendered label region as a PNG download.
//!
//! [`LabelExporter`] drives one export end to end:
//!
//! 1. ask the [`Rasterizer`] for the pixels of the label's region,
//! 2. encode them as PNG and wrap the bytes in a data URI,
//! 3. hand the data URI to the [`DownloadTarget`] through a transient
//!    anchor that is attached, activated and detached again.
//!
//! Failures are returned to the caller as [`ExportError`]; nothing is
//! swallowed here.
//!
//! Exports are neither queued nor debounced. [`LabelExporter::export`]
//! takes `&self`, so two triggers in quick succession run two
//! independent rasterizations and two independent downloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageEncoder, RgbaImage};

use crate::record::SampleRecord;
use crate::region::RegionHandle;

/// Errors reported by a [`Rasterizer`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    /// The region is not attached to the document.
    #[error("region {0} is not attached to the document")]
    Detached(String),

    /// The region has no visible area.
    #[error("region {0} has zero size")]
    EmptyRegion(String),

    /// The rendering surface refused pixel read-back (e.g. cross-origin
    /// image content).
    #[error("rasterized content is tainted: {0}")]
    Tainted(String),

    /// A platform API call failed.
    #[error("platform error during rasterization: {0}")]
    Platform(String),
}

/// Errors reported by a [`DownloadTarget`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadError {
    /// A platform API call failed.
    #[error("download API error: {0}")]
    Platform(String),
}

/// Errors that can occur while exporting a label.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The label region could not be rasterized.
    #[error("rasterization failed: {0}")]
    Rasterize(#[from] RasterError),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// The download could not be started.
    #[error("download failed: {0}")]
    Download(#[from] DownloadError),
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        Self::Encode(err.to_string())
    }
}

/// Captures the pixels of a rendered region.
///
/// Implementations suspend while the platform renders and must not block
/// the UI thread.
#[allow(async_fn_in_trait)]
pub trait Rasterizer {
    /// Rasterize the region addressed by `region`.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError`] if the region cannot be found or captured.
    async fn rasterize(&self, region: &RegionHandle) -> Result<RgbaImage, RasterError>;
}

/// The platform's "save this URI as a file" mechanism, modelled as a
/// transient anchor.
pub trait DownloadTarget {
    /// Platform handle for one transient anchor.
    type Anchor;

    /// Create an anchor pointing at `href` that saves as `filename`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] if the anchor cannot be created.
    fn create_anchor(&self, href: &str, filename: &str) -> Result<Self::Anchor, DownloadError>;

    /// Attach the anchor to the document.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] if the anchor cannot be attached.
    fn attach(&self, anchor: &Self::Anchor) -> Result<(), DownloadError>;

    /// Activate the anchor, starting the download.
    fn activate(&self, anchor: &Self::Anchor);

    /// Remove the anchor from the document. Best effort.
    fn detach(&self, anchor: &Self::Anchor);
}

impl<T: Rasterizer + ?Sized> Rasterizer for &T {
    async fn rasterize(&self, region: &RegionHandle) -> Result<RgbaImage, RasterError> {
        (**self).rasterize(region).await
    }
}

impl<T: DownloadTarget + ?Sized> DownloadTarget for &T {
    type Anchor = T::Anchor;

    fn create_anchor(&self, href: &str, filename: &str) -> Result<Self::Anchor, DownloadError> {
        (**self).create_anchor(href, filename)
    }

    fn attach(&self, anchor: &Self::Anchor) -> Result<(), DownloadError> {
        (**self).attach(anchor)
    }

    fn activate(&self, anchor: &Self::Anchor) {
        (**self).activate(anchor);
    }

    fn detach(&self, anchor: &Self::Anchor) {
        (**self).detach(anchor);
    }
}

/// An attached anchor; detached again when dropped.
struct AttachedAnchor<'a, D: DownloadTarget> {
    target: &'a D,
    anchor: D::Anchor,
}

impl<'a, D: DownloadTarget> AttachedAnchor<'a, D> {
    fn attach(target: &'a D, anchor: D::Anchor) -> Result<Self, DownloadError> {
        target.attach(&anchor)?;
        Ok(Self { target, anchor })
    }

    fn activate(&self) {
        self.target.activate(&self.anchor);
    }
}

impl<D: DownloadTarget> Drop for AttachedAnchor<'_, D> {
    fn drop(&mut self) {
        self.target.detach(&self.anchor);
    }
}

/// Filename an exported label is saved under.
#[must_use]
pub fn export_filename(sample_name: &str) -> String {
    format!("{sample_name}-mount.png")
}

/// A PNG-encoded label image ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Download filename, `<sample>-mount.png`.
    pub filename: String,
    /// PNG bytes.
    pub png: Vec<u8>,
}

impl ExportedFile {
    /// Encode `image` as PNG under `filename`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Encode`] if PNG encoding fails.
    pub fn encode(filename: String, image: &RgbaImage) -> Result<Self, ExportError> {
        let mut png = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png);
        encoder.write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(Self { filename, png })
    }

    /// The PNG as a `data:image/png;base64,...` URI.
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Exports the label of one mounted instance.
#[derive(Debug, Clone)]
pub struct LabelExporter<R, D> {
    record: SampleRecord,
    region: RegionHandle,
    rasterizer: R,
    download: D,
}

impl<R: Rasterizer, D: DownloadTarget> LabelExporter<R, D> {
    /// Create an exporter for `record`, rendered into `region`.
    #[must_use]
    pub const fn new(
        record: SampleRecord,
        region: RegionHandle,
        rasterizer: R,
        download: D,
    ) -> Self {
        Self {
            record,
            region,
            rasterizer,
            download,
        }
    }

    /// The region this exporter captures.
    #[must_use]
    pub const fn region(&self) -> &RegionHandle {
        &self.region
    }

    /// Filename the next export is saved under.
    #[must_use]
    pub fn filename(&self) -> String {
        export_filename(&self.record.name)
    }

    /// Rasterize the label region, encode it and start the download.
    ///
    /// The transient anchor is always detached once it was attached, so
    /// no anchor is left in the document whichever way this returns.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Rasterize`] if the region cannot be
    /// captured, [`ExportError::Encode`] if PNG encoding fails, and
    /// [`ExportError::Download`] if the anchor cannot be created or
    /// attached.
    #[allow(clippy::future_not_send)] // browser rasterizers hold !Send JS handles
    pub async fn export(&self) -> Result<ExportedFile, ExportError> {
        tracing::debug!(sample = %self.record.name, region = %self.region, "exporting label");

        let image = self.rasterizer.rasterize(&self.region).await?;
        let file = ExportedFile::encode(self.filename(), &image)?;

        let anchor = self
            .download
            .create_anchor(&file.data_uri(), &file.filename)?;
        AttachedAnchor::attach(&self.download, anchor)?.activate();

        tracing::info!(
            filename = %file.filename,
            width = image.width(),
            height = image.height(),
            bytes = file.png.len(),
            "label exported"
        );
        Ok(file)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_sample_name_with_mount_suffix() {
        assert_eq!(export_filename("WA-221"), "WA-221-mount.png");
        assert_eq!(export_filename(""), "-mount.png");
    }

    #[test]
    fn encode_produces_png_data_uri() {
        let image = RgbaImage::from_pixel(3, 2, image::Rgba([255, 255, 255, 255]));
        let file = ExportedFile::encode("x-mount.png".into(), &image).unwrap();

        assert!(file.png.starts_with(b"\x89PNG\r\n\x1a\n"));
        assert!(file.data_uri().starts_with("data:image/png;base64,iVBORw0KGgo"));

        let decoded = image::load_from_memory(&file.png).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn raster_errors_convert_into_export_errors() {
        let err: ExportError = RasterError::Detached("wiscar-label-1".into()).into();
        assert!(matches!(err, ExportError::Rasterize(RasterError::Detached(_))));
        assert_eq!(
            err.to_string(),
            "rasterization failed: region wiscar-label-1 is not attached to the document"
        );
    }
}
