pub mod config;
pub mod errors;
pub mod output;
pub mod repl;

pub use config::{CliConfig, OutputFormat, Overrides};
pub use errors::{extract_snippet, CliError};
pub use output::{render_source, render_statement, render_tokens};
pub use repl::run_interactive;
