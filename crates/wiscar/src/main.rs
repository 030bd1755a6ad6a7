use dioxus::logger::tracing::Level;
use dioxus::prelude::*;
use wiscar_io::{Markdown, SampleLabel, TabPanel};
use wiscar_label::{SamplePage, SampleRecord, SiteConfig};

fn main() {
    init_logging();
    dioxus::launch(app);
}

/// Install the tracing logger at info level.
///
/// Returns `false` when a global subscriber was already installed; that
/// subscriber keeps receiving events, so the failure is reported through it.
fn init_logging() -> bool {
    match dioxus::logger::init(Level::INFO) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("logger already installed, keeping it: {e}");
            false
        }
    }
}

/// Top-level pages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Landing,
    Session,
    Sample,
}

impl Page {
    const ALL: [Self; 3] = [Self::Landing, Self::Session, Self::Sample];

    const fn title(self) -> &'static str {
        match self {
            Self::Landing => "Home",
            Self::Session => "Sessions",
            Self::Sample => "Samples",
        }
    }
}

/// Root application component.
///
/// Holds the site configuration and the current page, and composes the
/// landing, session detail and sample pages from it.
fn app() -> Element {
    let config = use_hook(SiteConfig::wiscar);
    let mut page = use_signal(|| Page::Landing);
    let mut sample_name = use_signal(String::new);

    // An empty name means no sample is selected yet.
    let record = {
        let name = sample_name();
        let name = name.trim();
        (!name.is_empty()).then(|| SampleRecord::new(name))
    };

    rsx! {
        style { dangerous_inner_html: include_str!("../assets/site.css") }

        header { class: "site-header",
            h1 { "{config.site_title}" }
            nav { class: "site-nav",
                for p in Page::ALL {
                    button {
                        key: "{p.title()}",
                        class: if page() == p { "current" } else { "" },
                        onclick: move |_| page.set(p),
                        "{p.title()}"
                    }
                }
            }
        }

        main { class: "site-main",
            {match page() {
                Page::Landing => rsx! {
                    Markdown { src: config.landing_text.clone() }
                    TabPanel { group: config.landing_graphic.clone() }
                },
                Page::Session => rsx! {
                    TabPanel { group: config.session_detail.clone() }
                },
                Page::Sample => rsx! {
                    label { r#for: "sample-name", "Sample name " }
                    input {
                        id: "sample-name",
                        class: "sample-input",
                        placeholder: "e.g. WA-221",
                        value: "{sample_name}",
                        oninput: move |e| sample_name.set(e.value()),
                    }
                    {sample_page(config.sample_page, record)}
                },
            }}
        }
    }
}

/// The sample page body for the configured composition.
fn sample_page(kind: SamplePage, record: Option<SampleRecord>) -> Element {
    match kind {
        SamplePage::LabelExporter => rsx! {
            SampleLabel { data: record }
        },
        SamplePage::Default => {
            let Some(record) = record else {
                return rsx! {};
            };
            tracing::debug!(sample = %record.name, "showing default sample page");
            rsx! {
                p { "Sample {record.name}" }
            }
        }
    }
}
