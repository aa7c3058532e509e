//! Sentiment summary command

use feedback_core::{error::Result, open_portal, SentimentLabel, SentimentSummary};

use super::helpers::{load_config, print_json, Collection, GlobalOpts, OutputFormat};

const BAR_WIDTH: usize = 30;

/// Handle summary command
pub fn handle(collection: Collection, format: OutputFormat, opts: &GlobalOpts) -> Result<()> {
    let config = load_config(opts)?;
    let portal = open_portal(&config)?;

    let summary = match collection {
        Collection::Feedback => portal.feedback_summary(),
        Collection::Suggestions => portal.suggestion_summary(),
    };

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => print_histogram(&summary),
    }
    Ok(())
}

fn print_histogram(summary: &SentimentSummary) {
    println!("Sentiment summary ({} records)", summary.total);
    for label in SentimentLabel::ALL {
        let share = summary.share(label);
        let bar = "#".repeat((share * BAR_WIDTH as f64).round() as usize);
        println!(
            "  {:<8} {:>5}  {:<width$} {:>5.1}%",
            label.as_str(),
            summary.count(label),
            bar,
            share * 100.0,
            width = BAR_WIDTH
        );
    }
    if let Some(mean) = summary.mean_score {
        println!("  mean score {:+.4}", mean);
    }
}
