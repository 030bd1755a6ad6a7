//! Typed site configuration.
//!
//! Describes how the lab's pages are composed: the site title, the
//! landing page text and graphic tabs, the session detail tabs, and what
//! the sample page shows. Panels are a closed set of [`Panel`] variants
//! so the host matches on them statically.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Markdown shown on the landing page of the WiscAr site.
const ABOUT_LAB: &str = include_str!("../assets/about-lab.md");

/// Errors from loading or validating a [`SiteConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("invalid site configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The site title is empty.
    #[error("site title must not be empty")]
    EmptyTitle,

    /// A tab group has no tabs.
    #[error("tab group {0:?} has no tabs")]
    EmptyTabGroup(String),

    /// Two tabs in one group share an id.
    #[error("tab group {group:?} has duplicate tab id {tab:?}")]
    DuplicateTabId {
        /// Group containing the duplicate.
        group: String,
        /// The repeated tab id.
        tab: String,
    },

    /// Two tab groups share an id.
    #[error("duplicate tab group id {0:?}")]
    DuplicateGroupId(String),
}

/// A panel the host knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Panel {
    /// Step heating spectrum for an analysis session.
    StepHeatingChart,
    /// The host's default analysis details view.
    AnalysisDetails,
    /// Map of sample locations.
    SampleMap,
    /// Histogram of plateau ages.
    PlateauAges,
}

impl Panel {
    /// Stable kebab-case name, matching the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StepHeatingChart => "step-heating-chart",
            Self::AnalysisDetails => "analysis-details",
            Self::SampleMap => "sample-map",
            Self::PlateauAges => "plateau-ages",
        }
    }
}

/// One tab: its id, its title, and the panel it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSpec {
    /// Tab id, unique within its group.
    pub id: String,
    /// Title shown on the tab.
    pub title: String,
    /// Panel shown when the tab is selected.
    pub panel: Panel,
}

impl TabSpec {
    fn new(id: &str, title: &str, panel: Panel) -> Self {
        Self {
            id: id.to_owned(),
            title: title.to_owned(),
            panel,
        }
    }
}

/// A set of tabs; the first is selected initially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabGroup {
    /// Group id, unique across the site.
    pub id: String,
    /// Tabs in display order.
    pub tabs: Vec<TabSpec>,
}

/// What the sample page shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplePage {
    /// The host's default sample view.
    Default,
    /// The mount label with PNG export.
    #[default]
    LabelExporter,
}

/// Site-wide page composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Title shown in the site header.
    pub site_title: String,
    /// Landing page text, as markdown.
    pub landing_text: String,
    /// Tabs under the landing text.
    pub landing_graphic: TabGroup,
    /// Tabs on the session detail page.
    pub session_detail: TabGroup,
    /// Sample page composition.
    #[serde(default)]
    pub sample_page: SamplePage,
}

impl SiteConfig {
    /// The WiscAr lab site.
    #[must_use]
    pub fn wiscar() -> Self {
        Self {
            site_title: "WiscAr".to_owned(),
            landing_text: ABOUT_LAB.to_owned(),
            landing_graphic: TabGroup {
                id: "landingGraphicTabs".to_owned(),
                tabs: vec![
                    TabSpec::new("sample-map", "Sample map", Panel::SampleMap),
                    TabSpec::new("plateau-ages", "Plateau ages histogram", Panel::PlateauAges),
                ],
            },
            session_detail: TabGroup {
                id: "sessionDetailTabs".to_owned(),
                tabs: vec![
                    TabSpec::new("stepHeating", "Step heating chart", Panel::StepHeatingChart),
                    TabSpec::new("analysisDetails", "Analysis details", Panel::AnalysisDetails),
                ],
            },
            sample_page: SamplePage::LabelExporter,
        }
    }

    /// Parse a JSON configuration document and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the other
    /// [`ConfigError`] variants for documents that fail [`validate`].
    ///
    /// [`validate`]: Self::validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Tab groups in page order.
    #[must_use]
    pub fn tab_groups(&self) -> [&TabGroup; 2] {
        [&self.landing_graphic, &self.session_detail]
    }

    /// Check the structural invariants of the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }

        let mut group_ids = HashSet::new();
        for group in self.tab_groups() {
            if !group_ids.insert(group.id.as_str()) {
                return Err(ConfigError::DuplicateGroupId(group.id.clone()));
            }
            if group.tabs.is_empty() {
                return Err(ConfigError::EmptyTabGroup(group.id.clone()));
            }
            let mut tab_ids = HashSet::new();
            for tab in &group.tabs {
                if !tab_ids.insert(tab.id.as_str()) {
                    return Err(ConfigError::DuplicateTabId {
                        group: group.id.clone(),
                        tab: tab.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::wiscar()
    }
}
