//! List the most recent records of a collection

use feedback_core::{error::Result, open_portal};

use super::helpers::{
    feedback_line, load_config, print_json, suggestion_line, Collection, GlobalOpts,
    OutputFormat,
};

/// Handle list command
pub fn handle(
    limit: usize,
    collection: Collection,
    format: OutputFormat,
    opts: &GlobalOpts,
) -> Result<()> {
    let config = load_config(opts)?;
    let portal = open_portal(&config)?;

    match collection {
        Collection::Feedback => {
            let records = portal.feedback().latest(limit);
            match format {
                OutputFormat::Json => print_json(&records)?,
                OutputFormat::Text if records.is_empty() => println!("No feedback yet."),
                OutputFormat::Text => records.iter().for_each(|r| println!("{}", feedback_line(r))),
            }
        }
        Collection::Suggestions => {
            let records = portal.suggestions().latest(limit);
            match format {
                OutputFormat::Json => print_json(&records)?,
                OutputFormat::Text if records.is_empty() => println!("No suggestions yet."),
                OutputFormat::Text => records
                    .iter()
                    .for_each(|r| println!("{}", suggestion_line(r))),
            }
        }
    }
    Ok(())
}
