// CLI module
// Public interface for the interactive chat loop

mod commands;
mod repl;

pub use commands::{format_help, Command};
pub use repl::{prompt_rating, Repl};
