use crate::errors::CliError;
use serde::{Deserialize, Serialize};
use sql_parser::config::DEFAULT_MAX_DEPTH;
use sql_parser::{IdentifierQuote, ParserConfig};
use std::path::Path;

/// How parsed statements are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rust debug dump of the syntax tree
    #[default]
    Debug,
    /// Syntax tree as JSON, one document per statement
    Json,
    /// Statements printed back as SQL
    Sql,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub identifier_quote: IdentifierQuote,
    pub format: OutputFormat,
    pub pretty: bool,
    pub max_depth: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            identifier_quote: IdentifierQuote::Double,
            format: OutputFormat::Debug,
            pretty: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Values given on the command line. `None`/`false` leaves the file's value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub identifier_quote: Option<IdentifierQuote>,
    pub format: Option<OutputFormat>,
    pub pretty: bool,
    pub max_depth: Option<usize>,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::ConfigLoadError {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| CliError::ConfigLoadError {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Load `path` if given, otherwise start from the defaults.
    pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Self, CliError> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(overrides))
    }

    /// **Precedence**: command line > config file > defaults
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(quote) = overrides.identifier_quote {
            self.identifier_quote = quote;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(max_depth) = overrides.max_depth {
            self.max_depth = max_depth;
        }
        self.pretty |= overrides.pretty;
        self
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig::default()
            .with_identifier_quote(self.identifier_quote)
            .with_max_depth(self.max_depth)
    }
}

/// clap value parser for `--quote`.
pub fn parse_identifier_quote(value: &str) -> Result<IdentifierQuote, String> {
    match value.to_lowercase().as_str() {
        "double" => Ok(IdentifierQuote::Double),
        "backtick" => Ok(IdentifierQuote::Backtick),
        _ => Err(format!(
            "Invalid identifier quote: {}. Must be 'double' or 'backtick'",
            value
        )),
    }
}
