//! Ask the government assistant a question

use feedback_core::{error::Result, LlmService, TextGenerator};
use tracing::{debug, warn};

use super::helpers::{load_config, GlobalOpts};

/// Handle ask command
pub async fn handle(question: String, max_tokens: Option<usize>, opts: &GlobalOpts) -> Result<()> {
    let config = load_config(opts)?;
    let max_tokens = max_tokens.unwrap_or(config.llm.max_tokens);

    let llm = LlmService::new(config.llm_config());
    if !llm.is_configured() {
        warn!("No API key configured; set ANTHROPIC_API_KEY or llm.api_key");
    }
    debug!("Asking {} (max {} tokens)", llm.model(), max_tokens);

    let reply = llm.generate(&question, max_tokens).await?;
    println!("{}", reply.trim());
    Ok(())
}
