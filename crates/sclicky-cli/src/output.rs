//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use sclicky_core::{LinkRecord, Platform};

/// Shown by list views when nothing is saved
const EMPTY_STATE: &str = "No links saved yet. Add one with `sclicky add <url>`.";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is in human mode
    pub fn is_human(&self) -> bool {
        matches!(self.format, OutputFormat::Human)
    }

    /// Print a single link
    pub fn print_link(&self, link: &LinkRecord) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:           {}", link.id);
                println!("URL:          {}", link.url);
                println!("Platform:     {}", link.platform);
                println!("Total Clicks: {}", link.clicks);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(link).unwrap_or_default());
            }
            OutputFormat::Quiet => {
                println!("{}", link.id);
            }
        }
    }

    /// Print a list of links
    pub fn print_links(&self, links: &[LinkRecord]) {
        match self.format {
            OutputFormat::Human => print!("{}", render_list(links)),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(links).unwrap_or_default());
            }
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", link.id);
                }
            }
        }
    }

    /// Print the platform labels
    pub fn print_platforms(&self) {
        match self.format {
            OutputFormat::Human | OutputFormat::Quiet => {
                for platform in Platform::ALL {
                    println!("{}", platform);
                }
            }
            OutputFormat::Json => {
                let labels: Vec<_> = Platform::ALL.iter().map(Platform::label).collect();
                println!("{}", serde_json::json!(labels));
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (shown in every mode except quiet)
    pub fn warning(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Human rendering of the list view
fn render_list(links: &[LinkRecord]) -> String {
    if links.is_empty() {
        return format!("{}\n", EMPTY_STATE);
    }

    let mut out = String::from("My Saved Links\n\n");
    for link in links {
        out.push_str(&format!(
            "{:<13} | {:<9} | {:>5} | {}\n",
            link.id.to_string(),
            link.platform.label(),
            link.clicks,
            truncate(&link.url, 60)
        ));
    }
    let clicks: u64 = links.iter().map(|l| l.clicks).sum();
    out.push_str(&format!("\n{} link(s), {} total click(s)\n", links.len(), clicks));
    out
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
