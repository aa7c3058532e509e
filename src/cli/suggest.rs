//! Suggestion submission command

use feedback_core::{error::Result, open_portal};

use super::helpers::{load_config, print_json, suggestion_line, GlobalOpts, OutputFormat};

/// Handle suggestion submission command
pub fn handle(
    text: String,
    name: Option<String>,
    category: Option<String>,
    format: OutputFormat,
    opts: &GlobalOpts,
) -> Result<()> {
    let config = load_config(opts)?;
    let mut portal = open_portal(&config)?;

    let record = portal.submit_suggestion(
        name.as_deref().unwrap_or_default(),
        category.as_deref().unwrap_or_default(),
        &text,
    )?;

    match format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Text => {
            println!("Suggestion recorded.");
            println!("{}", suggestion_line(&record));
        }
    }
    Ok(())
}
