//! Command handlers for the verse CLI.

pub mod ask;
pub mod corpora;
pub mod serve;
mod startup;

pub use ask::AskCommand;
pub use corpora::CorporaCommand;
pub use serve::ServeCommand;
