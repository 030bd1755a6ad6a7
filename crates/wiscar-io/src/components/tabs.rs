//! Tab group built from a [`TabGroup`] of the site configuration.

use dioxus::prelude::*;
use wiscar_label::{Panel, TabGroup, TabSpec};

/// Props for the [`TabPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct TabPanelProps {
    /// The tabs to show; the first is selected initially.
    group: TabGroup,
}

/// A row of tab buttons above the selected tab's panel.
///
/// Chart and map panels are provided by host plugins; each panel is
/// rendered as a mount point (`id="panel-<name>"`) the plugin attaches to.
#[component]
pub fn TabPanel(props: TabPanelProps) -> Element {
    let first = props.group.tabs.first().map(|tab| tab.id.clone());
    let selected = use_signal(move || first);

    let group = props.group;
    let active = selected()
        .and_then(|id| group.tabs.iter().find(|tab| tab.id == id).cloned())
        .or_else(|| group.tabs.first().cloned());
    let active_id = active.as_ref().map(|tab| tab.id.clone());

    rsx! {
        div { id: "{group.id}", class: "tab-panel",
            div { class: "tab-list", role: "tablist",
                for tab in group.tabs.iter().cloned() {
                    {tab_button(tab, active_id.as_deref(), selected)}
                }
            }
            if let Some(tab) = active {
                {panel(&tab)}
            }
        }
    }
}

/// One tab button; selecting it stores its id in `selected`.
fn tab_button(
    tab: TabSpec,
    active_id: Option<&str>,
    mut selected: Signal<Option<String>>,
) -> Element {
    let TabSpec { id, title, .. } = tab;
    let class = if active_id == Some(id.as_str()) {
        "tab tab-active"
    } else {
        "tab"
    };
    let key = id.clone();

    rsx! {
        button {
            key: "{key}",
            role: "tab",
            class: "{class}",
            onclick: move |_| selected.set(Some(id.clone())),
            "{title}"
        }
    }
}

/// Mount point for the panel of `tab`.
fn panel(tab: &TabSpec) -> Element {
    let name = tab.panel.name();
    let note = match tab.panel {
        Panel::StepHeatingChart => "Step heating spectrum",
        Panel::AnalysisDetails => "Analysis details",
        Panel::SampleMap => "Sample locations",
        Panel::PlateauAges => "Plateau ages",
    };

    rsx! {
        div {
            id: "panel-{name}",
            class: "plugin-panel",
            role: "tabpanel",
            "data-plugin": "{name}",
            "aria-label": "{tab.title}",
            p { class: "plugin-note", "{note}" }
        }
    }
}
