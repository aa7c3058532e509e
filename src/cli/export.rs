//! Collection export command

use feedback_core::{error::Result, open_portal, storage::csv_store::write_atomic};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

use super::helpers::{load_config, Collection, GlobalOpts};

/// Handle export command
///
/// Writes the canonical CSV bytes to `output`, or to stdout when unset.
pub fn handle(collection: Collection, output: Option<PathBuf>, opts: &GlobalOpts) -> Result<()> {
    let config = load_config(opts)?;
    let portal = open_portal(&config)?;

    let (bytes, count) = match collection {
        Collection::Feedback => (portal.feedback().export()?, portal.feedback().len()),
        Collection::Suggestions => (portal.suggestions().export()?, portal.suggestions().len()),
    };

    match output {
        Some(path) => {
            debug!("Exporting {:?} to {}...", collection, path.display());
            write_atomic(&path, &bytes)?;
            info!("Exported {} records to {}", count, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
