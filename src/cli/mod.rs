//! CLI module

pub mod commands;
pub mod prompt;

pub use commands::{Connector, HyperliquidConnector, RunOutcome};
pub use prompt::{Prompter, TerminalPrompter};
