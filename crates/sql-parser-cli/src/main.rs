use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use sql_parser::IdentifierQuote;
use sql_parser_cli::config::parse_identifier_quote;
use sql_parser_cli::{
    render_source, render_tokens, run_interactive, CliConfig, CliError, OutputFormat, Overrides,
};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlparse")]
#[command(about = "Parse SQL and print the syntax tree", long_about = None)]
struct Cli {
    /// SQL file to parse; stdin when absent or `-`
    file: Option<PathBuf>,

    /// Output format [default: debug]
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Multi-line output (one clause per line for SQL)
    #[arg(long)]
    pretty: bool,

    /// Print the token stream instead of parsing
    #[arg(long)]
    tokens: bool,

    /// Quoted identifier style: double or backtick
    #[arg(long, value_parser = parse_identifier_quote)]
    quote: Option<IdentifierQuote>,

    /// Maximum expression and subquery nesting
    #[arg(long)]
    max_depth: Option<usize>,

    /// Read statements from a prompt until `0` or `exit`
    #[arg(long, short)]
    interactive: bool,

    /// YAML config file (identifier_quote, format, pretty, max_depth)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = CliConfig::resolve(
        cli.config.as_deref(),
        Overrides {
            identifier_quote: cli.quote,
            format: cli.format,
            pretty: cli.pretty,
            max_depth: cli.max_depth,
        },
    )
    .context("Failed to load sqlparse configuration")?;
    tracing::debug!(?config, "resolved configuration");

    if cli.interactive {
        let stdin = io::stdin();
        return run_interactive(stdin.lock(), io::stdout(), &config)
            .context("Interactive session failed");
    }

    let (name, source) = read_input(cli.file.as_deref())?;
    let rendered = if cli.tokens {
        render_tokens(&name, &source, &config)?
    } else {
        render_source(&name, &source, &config)?
    };
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Returns a display name for error messages along with the source text.
fn read_input(path: Option<&Path>) -> Result<(String, String), CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            let name = path.display().to_string();
            let source = std::fs::read_to_string(path).map_err(|source| {
                CliError::InputReadError {
                    name: name.clone(),
                    source,
                }
            })?;
            Ok((name, source))
        }
        _ => {
            let name = "<stdin>".to_string();
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|source| CliError::InputReadError {
                    name: name.clone(),
                    source,
                })?;
            Ok((name, source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "sqlparse", "--format", "json", "--quote", "backtick", "-vv", "q.sql",
        ]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.quote, Some(IdentifierQuote::Backtick));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.file, Some(PathBuf::from("q.sql")));
        assert!(!cli.pretty && !cli.tokens && !cli.interactive);
    }

    #[test]
    fn test_bad_quote_is_rejected() {
        assert!(Cli::try_parse_from(["sqlparse", "--quote", "single"]).is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "SELECT 1;").unwrap();

        let (name, source) = read_input(Some(file.path())).unwrap();
        assert_eq!(name, file.path().display().to_string());
        assert_eq!(source, "SELECT 1;");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(Some(&dir.path().join("missing.sql"))).unwrap_err();
        assert!(matches!(err, CliError::InputReadError { .. }));
        assert!(err.to_string().contains("missing.sql"));
    }
}
