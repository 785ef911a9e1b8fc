//! Ask command handler.
//!
//! Runs one message through the same pipeline the HTTP API uses.

use super::startup::build_engine;
use clap::Args;
use verse_chat::validate_message;
use verse_core::{config::AppConfig, AppResult};

/// Ask a single question from the command line
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The message to answer
    pub message: String,

    /// Output as JSON (same shape as POST /chat)
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        validate_message(&self.message)?;

        let engine = build_engine(config).await?;
        let reply = engine.handle(&self.message).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&reply)?);
            return Ok(());
        }

        println!("{}", reply.reply);
        if !reply.sources.is_empty() {
            println!();
            println!("Sources:");
            for (corpus, ids) in reply.sources.iter() {
                println!("  {}: {}", corpus, ids.join(", "));
            }
        }

        Ok(())
    }
}
