//! Sample mount label with PNG export.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdDownload;
use wiscar_label::{
    LabelExporter, LabelLayout, LabelLine, RegionHandle, SampleRecord, TRIGGER_CAPTION,
};

use crate::download::BrowserDownload;
use crate::raster::CanvasRasterizer;

/// Props for the [`SampleLabel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct SampleLabelProps {
    /// The sample to label. `None` renders nothing.
    data: Option<SampleRecord>,
}

/// Renders the mount label for a sample with a button that exports the
/// label as `<name>-mount.png`.
///
/// Each mounted instance owns its own [`RegionHandle`], so several labels
/// on one page export their own region. Every click starts an
/// independent export; failures are logged and shown under the button.
#[component]
pub fn SampleLabel(props: SampleLabelProps) -> Element {
    let region = use_hook(RegionHandle::new);
    let mut export_error = use_signal(|| Option::<String>::None);

    let Some(record) = props.data else {
        return rsx! {};
    };

    let LabelLayout {
        title,
        caption,
        bottom,
    } = LabelLayout::render(&record);
    let dom_id = region.dom_id();

    let export_click = move |_: MouseEvent| {
        let exporter = LabelExporter::new(
            record.clone(),
            region.clone(),
            CanvasRasterizer::default(),
            BrowserDownload,
        );
        async move {
            match exporter.export().await {
                Ok(file) => {
                    tracing::info!(filename = %file.filename, "label download started");
                    export_error.set(None);
                }
                Err(e) => {
                    tracing::error!(error = %e, "label export failed");
                    export_error.set(Some(format!("Export failed: {e}")));
                }
            }
        }
    };

    rsx! {
        div { class: "sample-label",
            div { id: "{dom_id}", class: "label-canvas",
                div { class: "label-top",
                    h1 { "{title}" }
                    h3 { "{caption}" }
                }
                div { class: "label-bottom",
                    for (i, line) in bottom.iter().enumerate() {
                        if let LabelLine::Text(text) = line {
                            div { key: "{i}", class: "label-line", "{text}" }
                        } else {
                            hr { key: "{i}", class: "dashed" }
                        }
                    }
                }
            }

            if let Some(ref err) = export_error() {
                p { class: "label-error", "{err}" }
            }

            button {
                class: "label-export",
                onclick: export_click,
                Icon { icon: LdDownload, width: 16, height: 16 }
                "{TRIGGER_CAPTION}"
            }
        }
    }
}
