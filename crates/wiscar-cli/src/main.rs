//! wiscar-cli: maintenance tool for the WiscAr site content.
//!
//! Validates site configuration documents and previews sample mount
//! labels without a browser.
//!
//! # Usage
//!
//! ```text
//! cargo run --bin wiscar-cli -- check site.json
//! cargo run --bin wiscar-cli -- label WA-221 --json
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wiscar_label::{LabelLayout, LabelLine, SampleRecord, SiteConfig, export_filename};

/// Site configuration checks and label previews for WiscAr.
#[derive(Parser)]
#[command(name = "wiscar-cli", version)]
struct Cli {
    /// Log at info level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and validate a site configuration JSON file.
    Check {
        /// Path to the configuration document.
        path: PathBuf,
    },
    /// Print the mount label and export filename for a sample.
    Label {
        /// Sample name.
        name: String,

        /// Print the label layout as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load and validate a configuration file, returning a summary.
fn check(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    tracing::info!(path = %path.display(), "checking site configuration");
    let json = std::fs::read_to_string(path)?;
    let config = SiteConfig::from_json(&json)?;

    let mut summary = format!(
        "{}: ok ({:?} sample page)\n",
        config.site_title, config.sample_page
    );
    for group in config.tab_groups() {
        summary.push_str(&format!("  {}\n", group.id));
        for tab in &group.tabs {
            let (id, title, panel) = (&tab.id, &tab.title, tab.panel.name());
            summary.push_str(&format!("    {id} \"{title}\" -> {panel}\n"));
        }
    }
    Ok(summary)
}

/// Render the label for `name` as plain text.
fn label_text(name: &str) -> String {
    let layout = LabelLayout::render(&SampleRecord::new(name));

    let top = layout.top_lines().map(str::to_owned);
    let bottom = layout.bottom.iter().map(|line| match line {
        LabelLine::Text(text) => text.clone(),
        LabelLine::Rule => "- - - - - - - - - - - -".to_owned(),
    });

    let mut lines: Vec<String> = top.into_iter().collect();
    lines.push(String::new());
    lines.extend(bottom);
    lines.push(String::new());
    lines.push(format!("=> {}", export_filename(name)));
    lines.join("\n") + "\n"
}

fn label_json(name: &str) -> Result<String, serde_json::Error> {
    let layout = LabelLayout::render(&SampleRecord::new(name));
    let value = serde_json::json!({
        "filename": export_filename(name),
        "layout": layout,
    });
    serde_json::to_string_pretty(&value)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = match cli.command {
        Command::Check { path } => check(&path).map_err(|e| format!("{}: {e}", path.display())),
        Command::Label { name, json: false } => Ok(label_text(&name)),
        Command::Label { name, json: true } => label_json(&name).map_err(|e| e.to_string()),
    };

    match output {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
