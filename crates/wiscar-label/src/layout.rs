//! The fixed mount-label layout.
//!
//! A label has two blocks. The top block carries a title and a caption
//! naming the sample; the bottom block is the printable strip that is
//! cast into the epoxy mount, with dashed cut rules between its lines.
//!
//! The literal strings are reproduced exactly as printed on existing
//! mounts, including the `Samlpe` spelling in the caption.

use serde::Serialize;

use crate::record::SampleRecord;

/// Title line of the top block.
pub const TITLE: &str = "Open the pod bay doors, please, HAL";

/// Caption on the export trigger control.
pub const TRIGGER_CAPTION: &str = "Open the Doors for David";

const CAST_INSTRUCTIONS: &str = "Cast in Epoxy, Cut on Lines";
const STANDARD: &str = "Standard";
const MUSEUM_NAME: &str = "Museum Name";

/// One entry of the bottom block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum LabelLine {
    /// A line of printed text.
    Text(String),
    /// A dashed cut rule.
    Rule,
}

impl LabelLine {
    /// The printed text, or `None` for a rule.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Rule => None,
        }
    }
}

/// The rendered composition of one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelLayout {
    /// Top block title.
    pub title: String,
    /// Top block caption naming the sample.
    pub caption: String,
    /// Bottom block lines in print order.
    pub bottom: Vec<LabelLine>,
}

impl LabelLayout {
    /// Build the label for `record`.
    #[must_use]
    pub fn render(record: &SampleRecord) -> Self {
        let name = &record.name;
        tracing::debug!(sample = %name, "rendering sample label");

        Self {
            title: TITLE.to_owned(),
            caption: format!("Samlpe Name: {name}"),
            bottom: vec![
                LabelLine::Text(CAST_INSTRUCTIONS.to_owned()),
                LabelLine::Rule,
                LabelLine::Text(STANDARD.to_owned()),
                LabelLine::Rule,
                LabelLine::Text(format!("Sample # ({name})")),
                LabelLine::Rule,
                LabelLine::Text(MUSEUM_NAME.to_owned()),
            ],
        }
    }

    /// Text lines of the top block, title first.
    #[must_use]
    pub fn top_lines(&self) -> [&str; 2] {
        [self.title.as_str(), self.caption.as_str()]
    }

    /// Text lines of the bottom block, skipping rules.
    pub fn bottom_text(&self) -> impl Iterator<Item = &str> {
        self.bottom.iter().filter_map(LabelLine::text)
    }
}

/// Render the label for an optional record.
///
/// A host that has no record to show gets `None` back and renders
/// nothing; a missing record is not an error.
#[must_use]
pub fn render_label(record: Option<&SampleRecord>) -> Option<LabelLayout> {
    record.map(LabelLayout::render)
}
