//! Integration tests: drive `LabelExporter` against recording rasterizer
//! and download fakes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::executor::block_on;
use wiscar_label::{
    DownloadError, DownloadTarget, ExportError, LabelExporter, RasterError, Rasterizer,
    RegionHandle, RgbaImage, SampleRecord,
};

/// Yields to the executor exactly once.
struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RasterEvent {
    Start(RegionHandle),
    Finish(RegionHandle),
}

/// Paints a fixed 4x2 image, optionally failing, and records every call.
#[derive(Default)]
struct FakeRasterizer {
    events: RefCell<Vec<RasterEvent>>,
    fail: Option<RasterError>,
}

impl FakeRasterizer {
    fn failing(err: RasterError) -> Self {
        Self {
            fail: Some(err),
            ..Self::default()
        }
    }

    fn targets(&self) -> Vec<RegionHandle> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                RasterEvent::Start(region) => Some(region.clone()),
                RasterEvent::Finish(_) => None,
            })
            .collect()
    }
}

impl Rasterizer for FakeRasterizer {
    async fn rasterize(&self, region: &RegionHandle) -> Result<RgbaImage, RasterError> {
        self.events
            .borrow_mut()
            .push(RasterEvent::Start(region.clone()));
        YieldNow(false).await;
        self.events
            .borrow_mut()
            .push(RasterEvent::Finish(region.clone()));

        if let Some(err) = &self.fail {
            return Err(err.clone());
        }
        let mut image = RgbaImage::from_pixel(4, 2, image::Rgba([255, 255, 255, 255]));
        image.put_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        Ok(image)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DownloadEvent {
    Create { id: usize, filename: String },
    Attach(usize),
    Activate(usize),
    Detach(usize),
}

/// Records the anchor lifecycle and tracks which anchors are attached.
#[derive(Default)]
struct FakeDownload {
    next_id: Cell<usize>,
    events: RefCell<Vec<DownloadEvent>>,
    attached: RefCell<Vec<usize>>,
    hrefs: RefCell<Vec<String>>,
    fail_attach: bool,
}

impl FakeDownload {
    fn activated_filenames(&self) -> Vec<String> {
        let events = self.events.borrow();
        events
            .iter()
            .filter_map(|e| match e {
                DownloadEvent::Activate(id) => events.iter().find_map(|c| match c {
                    DownloadEvent::Create { id: cid, filename } if cid == id => {
                        Some(filename.clone())
                    }
                    _ => None,
                }),
                _ => None,
            })
            .collect()
    }
}

impl DownloadTarget for FakeDownload {
    type Anchor = usize;

    fn create_anchor(&self, href: &str, filename: &str) -> Result<usize, DownloadError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.hrefs.borrow_mut().push(href.to_owned());
        self.events.borrow_mut().push(DownloadEvent::Create {
            id,
            filename: filename.to_owned(),
        });
        Ok(id)
    }

    fn attach(&self, anchor: &usize) -> Result<(), DownloadError> {
        if self.fail_attach {
            return Err(DownloadError::Platform("no document body".into()));
        }
        self.attached.borrow_mut().push(*anchor);
        self.events.borrow_mut().push(DownloadEvent::Attach(*anchor));
        Ok(())
    }

    fn activate(&self, anchor: &usize) {
        self.events
            .borrow_mut()
            .push(DownloadEvent::Activate(*anchor));
    }

    fn detach(&self, anchor: &usize) {
        self.attached.borrow_mut().retain(|a| a != anchor);
        self.events.borrow_mut().push(DownloadEvent::Detach(*anchor));
    }
}

#[test]
fn export_rasterizes_own_region_once_and_downloads_named_png() {
    let raster = FakeRasterizer::default();
    let download = FakeDownload::default();
    let region = RegionHandle::new();
    let exporter = LabelExporter::new(
        SampleRecord::new("WA-221"),
        region.clone(),
        &raster,
        &download,
    );

    let file = block_on(exporter.export()).unwrap();

    assert_eq!(raster.targets(), vec![region]);
    assert_eq!(file.filename, "WA-221-mount.png");
    assert!(file.png.starts_with(b"\x89PNG"));
    assert_eq!(download.hrefs.borrow().as_slice(), &[file.data_uri()]);
    assert_eq!(
        *download.events.borrow(),
        vec![
            DownloadEvent::Create {
                id: 0,
                filename: "WA-221-mount.png".into()
            },
            DownloadEvent::Attach(0),
            DownloadEvent::Activate(0),
            DownloadEvent::Detach(0),
        ]
    );
    assert!(download.attached.borrow().is_empty());
}

#[test]
fn exported_png_holds_the_rasterized_pixels() {
    let raster = FakeRasterizer::default();
    let download = FakeDownload::default();
    let exporter = LabelExporter::new(
        SampleRecord::new("Sample-7"),
        RegionHandle::new(),
        &raster,
        &download,
    );

    let file = block_on(exporter.export()).unwrap();
    let decoded = image::load_from_memory(&file.png).unwrap().to_rgba8();

    assert_eq!(decoded.dimensions(), (4, 2));
    assert_eq!(decoded.get_pixel(1, 1).0, [0, 0, 0, 255]);
}

#[test]
fn rasterization_failure_is_returned_and_leaves_no_anchor() {
    let raster = FakeRasterizer::failing(RasterError::Tainted("cross-origin image".into()));
    let download = FakeDownload::default();
    let exporter = LabelExporter::new(
        SampleRecord::new("Sample-7"),
        RegionHandle::new(),
        &raster,
        &download,
    );

    let err = block_on(exporter.export()).unwrap_err();

    assert!(matches!(err, ExportError::Rasterize(RasterError::Tainted(_))));
    assert_eq!(raster.targets().len(), 1);
    assert!(download.events.borrow().is_empty());
    assert!(download.attached.borrow().is_empty());
}

#[test]
fn attach_failure_is_returned_and_nothing_is_activated() {
    let raster = FakeRasterizer::default();
    let download = FakeDownload {
        fail_attach: true,
        ..FakeDownload::default()
    };
    let exporter = LabelExporter::new(
        SampleRecord::new("Sample-7"),
        RegionHandle::new(),
        &raster,
        &download,
    );

    let err = block_on(exporter.export()).unwrap_err();

    assert!(matches!(err, ExportError::Download(DownloadError::Platform(_))));
    assert!(download.activated_filenames().is_empty());
    assert!(download.attached.borrow().is_empty());
}

#[test]
fn rapid_triggers_run_independently() {
    let raster = FakeRasterizer::default();
    let download = FakeDownload::default();
    let region = RegionHandle::new();
    let exporter = LabelExporter::new(
        SampleRecord::new("Sample-7"),
        region.clone(),
        &raster,
        &download,
    );

    let (first, second) = block_on(async { futures::join!(exporter.export(), exporter.export()) });

    first.unwrap();
    second.unwrap();

    // Both rasterizations started before either finished.
    let events = raster.events.borrow();
    assert_eq!(
        events[..2],
        [
            RasterEvent::Start(region.clone()),
            RasterEvent::Start(region.clone())
        ]
    );
    assert_eq!(events.len(), 4);
    assert_eq!(
        download.activated_filenames(),
        vec!["Sample-7-mount.png", "Sample-7-mount.png"]
    );
    assert!(download.attached.borrow().is_empty());
}

#[test]
fn repeated_exports_are_identical() {
    let raster = FakeRasterizer::default();
    let download = FakeDownload::default();
    let exporter = LabelExporter::new(
        SampleRecord::new("Sample-7"),
        RegionHandle::new(),
        &raster,
        &download,
    );

    let a = block_on(exporter.export()).unwrap();
    let b = block_on(exporter.export()).unwrap();

    assert_eq!(a, b);
}

#[test]
fn simultaneous_instances_capture_their_own_regions() {
    let raster = FakeRasterizer::default();
    let download = FakeDownload::default();
    let left = LabelExporter::new(
        SampleRecord::new("A-1"),
        RegionHandle::new(),
        &raster,
        &download,
    );
    let right = LabelExporter::new(
        SampleRecord::new("B-2"),
        RegionHandle::new(),
        &raster,
        &download,
    );

    block_on(left.export()).unwrap();
    block_on(right.export()).unwrap();

    assert_eq!(
        raster.targets(),
        vec![left.region().clone(), right.region().clone()]
    );
    assert_ne!(left.region(), right.region());
    assert_eq!(
        download.activated_filenames(),
        vec!["A-1-mount.png", "B-2-mount.png"]
    );
}

#[test]
fn empty_name_exports_bare_suffix_and_cleans_up() {
    let raster = FakeRasterizer::default();
    let download = FakeDownload::default();
    let exporter = LabelExporter::new(
        SampleRecord::new(""),
        RegionHandle::new(),
        &raster,
        &download,
    );

    let file = block_on(exporter.export()).unwrap();

    assert_eq!(file.filename, "-mount.png");
    assert_eq!(download.activated_filenames(), vec!["-mount.png"]);
    assert!(download.attached.borrow().is_empty());
}
