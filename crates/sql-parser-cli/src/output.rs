//! Turning parse results into the text written to stdout.

use crate::config::{CliConfig, OutputFormat};
use crate::errors::CliError;
use sql_parser::{parse_script_with, to_sql_with, tokenize_with, FormatMode, Statement, Token};

/// Parse every statement in `source` and render them with the configured format.
///
/// `name` labels the input in error messages (a file path or `<stdin>`).
pub fn render_source(name: &str, source: &str, config: &CliConfig) -> Result<String, CliError> {
    let statements = parse_script_with(source, &config.parser_config())
        .map_err(|error| CliError::parse(name, source, error))?;
    tracing::debug!(count = statements.len(), input = name, "parsed statements");

    let rendered = statements
        .iter()
        .map(|statement| render_statement(statement, config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join("\n"))
}

pub fn render_statement(statement: &Statement, config: &CliConfig) -> Result<String, CliError> {
    Ok(match config.format {
        OutputFormat::Debug if config.pretty => format!("{statement:#?}"),
        OutputFormat::Debug => format!("{statement:?}"),
        OutputFormat::Json if config.pretty => serde_json::to_string_pretty(statement)?,
        OutputFormat::Json => serde_json::to_string(statement)?,
        OutputFormat::Sql => {
            let mode = if config.pretty {
                FormatMode::Pretty
            } else {
                FormatMode::Compact
            };
            // Same quote character as the input.
            format!(
                "{};",
                to_sql_with(statement, mode, config.identifier_quote)
            )
        }
    })
}

/// Dump the token stream instead of parsing. JSON output gives one token
/// per line; every other format gives `line:column kind text`.
pub fn render_tokens(name: &str, source: &str, config: &CliConfig) -> Result<String, CliError> {
    let tokens = tokenize_with(source, &config.parser_config())
        .map_err(|error| CliError::parse(name, source, error))?;
    tracing::debug!(count = tokens.len(), input = name, "tokenized");

    let lines = tokens
        .iter()
        .map(|token| render_token(token, config.format))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

fn render_token(token: &Token, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string(token)?,
        OutputFormat::Debug | OutputFormat::Sql => format!(
            "{}:{}\t{:?}\t{}",
            token.position.line, token.position.column, token.kind, token.text
        ),
    })
}
