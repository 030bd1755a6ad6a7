//! Dioxus UI components for the WiscAr site.
//!
//! Provides the sample label with its export trigger, tab groups built
//! from the site configuration, and markdown blocks.

mod label;
mod markdown;
mod tabs;

pub use label::SampleLabel;
pub use markdown::{Markdown, render_markdown};
pub use tabs::TabPanel;
