//! Status command handler

use anyhow::Result;

use sclicky_core::{Config, KeyValueStore, LinkRegistry};

use crate::output::{Output, OutputFormat};

/// Show registry and storage status
pub fn show<S: KeyValueStore>(
    registry: &LinkRegistry<S>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let location = config
        .file_store()
        .path_for(registry.key())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|e| format!("(invalid: {})", e));

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "links": registry.len(),
                    "total_clicks": registry.total_clicks(),
                    "storage": {
                        "key": registry.key(),
                        "location": location,
                        "durable": registry.is_durable(),
                        "last_error": registry.last_persist_error().map(|e| e.to_string()),
                        "recoverable": registry.last_persist_error().map(|e| e.is_recoverable())
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", registry.len());
        }
        OutputFormat::Human => {
            println!("Sclicky Status");
            println!("==============");
            println!();
            println!("Contents:");
            println!("  Links:        {}", registry.len());
            println!("  Total clicks: {}", registry.total_clicks());
            println!();
            println!("Storage:");
            println!("  Key:      {}", registry.key());
            println!("  Location: {}", location);
            match registry.last_persist_error() {
                None => println!("  State:    saved"),
                Some(e) => {
                    println!("  State:    NOT SAVED ({})", e);
                    if let Some(hint) = e.recovery_suggestion() {
                        println!("  Hint:     {}", hint);
                    }
                }
            }
        }
    }

    Ok(())
}
