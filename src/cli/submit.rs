//! Feedback submission command

use feedback_core::{error::Result, open_portal, Identity};
use tracing::debug;

use super::helpers::{feedback_line, load_config, print_json, GlobalOpts, OutputFormat};

/// Handle feedback submission command
pub fn handle(
    text: String,
    name: Option<String>,
    email: Option<String>,
    location: Option<String>,
    format: OutputFormat,
    opts: &GlobalOpts,
) -> Result<()> {
    let config = load_config(opts)?;
    let mut portal = open_portal(&config)?;

    let identity = Identity {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        location: location.unwrap_or_default(),
    };
    debug!("Submitting feedback ({} chars)", text.len());

    let record = portal.submit_feedback(identity, &text)?;

    match format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Text => {
            println!("Thank you! Your feedback was recorded.");
            println!("{}", feedback_line(&record));
        }
    }
    Ok(())
}
