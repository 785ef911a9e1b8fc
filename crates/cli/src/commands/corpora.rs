//! Corpora command handler.

use clap::Args;
use verse_core::{config::AppConfig, AppResult};
use verse_knowledge::CorpusStore;

/// List configured corpora and what was loaded for each
#[derive(Args, Debug)]
pub struct CorporaCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CorporaCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let store = CorpusStore::load(config)?;
        let summaries = store.summaries();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
            return Ok(());
        }

        println!(
            "{:<16} {:>8} {:>8} {:>6}",
            "CORPUS", "RECORDS", "ROWS", "DIM"
        );
        for corpus in &config.corpora {
            match summaries.iter().find(|s| s.name == corpus.name) {
                Some(s) => println!(
                    "{:<16} {:>8} {:>8} {:>6}",
                    s.name, s.records, s.rows, s.dimension
                ),
                None => println!("{:<16} {:>8}", corpus.name, "missing"),
            }
        }

        Ok(())
    }
}
