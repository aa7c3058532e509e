//! Feedback Portal command-line front end
//!
//! Submit feedback and suggestions, inspect and export the collections,
//! and ask the assistant questions. Logs go to stderr so that exported CSV
//! on stdout stays clean.

mod cli;

use clap::{Parser, Subcommand};
use cli::config::ConfigAction;
use cli::helpers::{Collection, GlobalOpts, OutputFormat};
use feedback_core::error::Result;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "feedback-portal")]
#[command(about = "Citizen feedback portal with sentiment tagging", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides storage.data_dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit citizen feedback
    Submit {
        /// Feedback text
        #[arg(short, long)]
        text: String,

        /// Citizen name (optional)
        #[arg(short, long)]
        name: Option<String>,

        /// Contact email (optional)
        #[arg(short, long)]
        email: Option<String>,

        /// Location (optional)
        #[arg(long)]
        location: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Submit a policy suggestion
    Suggest {
        /// Suggestion text
        #[arg(short, long)]
        text: String,

        /// Citizen name (optional)
        #[arg(short, long)]
        name: Option<String>,

        /// Policy area, e.g. "transport"
        #[arg(short, long)]
        category: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the most recent records
    List {
        /// Maximum number of records
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Collection to list
        #[arg(short, long, value_enum, default_value_t = Collection::Feedback)]
        collection: Collection,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Export a collection as CSV
    Export {
        /// Collection to export
        #[arg(short, long, value_enum, default_value_t = Collection::Feedback)]
        collection: Collection,

        /// Output path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the sentiment histogram of a collection
    Summary {
        /// Collection to summarise
        #[arg(short, long, value_enum, default_value_t = Collection::Feedback)]
        collection: Collection,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Ask the government assistant a question
    Ask {
        /// Question text
        question: String,

        /// Maximum tokens to generate (defaults to llm.max_tokens)
        #[arg(long)]
        max_tokens: Option<usize>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Our crates at the requested level, HTTP internals only on warnings
    let level = level.as_str().to_lowercase();
    let filter = EnvFilter::new(format!(
        "feedback_core={level},feedback_portal={level},reqwest=warn,hyper=warn"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Feedback portal v{} starting...", env!("CARGO_PKG_VERSION"));

    let opts = GlobalOpts {
        config_path: cli.config,
        data_dir: cli.data_dir,
    };

    match cli.command {
        Commands::Submit {
            text,
            name,
            email,
            location,
            format,
        } => cli::submit::handle(text, name, email, location, format, &opts),
        Commands::Suggest {
            text,
            name,
            category,
            format,
        } => cli::suggest::handle(text, name, category, format, &opts),
        Commands::List {
            limit,
            collection,
            format,
        } => cli::list::handle(limit, collection, format, &opts),
        Commands::Export { collection, output } => cli::export::handle(collection, output, &opts),
        Commands::Summary { collection, format } => {
            cli::summary::handle(collection, format, &opts)
        }
        Commands::Ask {
            question,
            max_tokens,
        } => cli::ask::handle(question, max_tokens, &opts).await,
        Commands::Config { action } => cli::config::handle(action, &opts),
    }
}
