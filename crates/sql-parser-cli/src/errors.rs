use sql_parser::ParseError;
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to load configuration file: {path}\n{source}")]
    ConfigLoadError {
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("Failed to read SQL from {name}")]
    InputReadError {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{error}\n  --> {name}:{}:{}\n{snippet}", .error.line(), .error.column())]
    Parse {
        name: String,
        error: ParseError,
        snippet: String,
    },

    #[error("Failed to serialize output")]
    Serialize(#[from] serde_json::Error),
}

impl CliError {
    /// Wrap a parse error together with a caret snippet of `source`.
    pub fn parse(name: impl Into<String>, source: &str, error: ParseError) -> Self {
        let snippet = extract_snippet(source, &error, 2);
        CliError::Parse {
            name: name.into(),
            error,
            snippet,
        }
    }
}

/// Render the lines leading up to an error, with a caret line under the
/// offending token.
///
/// Tabs before the error column are kept so the caret lines up in a terminal.
pub fn extract_snippet(source: &str, error: &ParseError, context_lines: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let target_line = (error.line() as usize).saturating_sub(1);
    let start_line = target_line.saturating_sub(context_lines);

    let mut snippet_lines: Vec<String> = (start_line..=target_line)
        .map(|idx| {
            let line = lines.get(idx).copied().unwrap_or("");
            format!("{:4} | {}", idx + 1, line)
        })
        .collect();

    let line = lines.get(target_line).copied().unwrap_or("");
    let indent: String = line
        .chars()
        .take((error.column() as usize).saturating_sub(1))
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    snippet_lines.push(format!(
        "     | {}{}",
        indent,
        "^".repeat(caret_width(source, error))
    ));

    snippet_lines.join("\n")
}

/// Characters the error covers on its own line; at least one.
fn caret_width(source: &str, error: &ParseError) -> usize {
    source
        .get(Range::<usize>::from(error.range))
        .map(|text| text.chars().take_while(|&c| c != '\n').count())
        .unwrap_or(0)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sql_parser::parse;

    #[test]
    fn test_snippet_points_at_token() {
        let sql = "SELECT a\nFROM t\nWHERE a = = 1";
        let err = parse(sql).unwrap_err();
        let snippet = extract_snippet(sql, &err, 1);
        assert_eq!(
            snippet,
            "   2 | FROM t\n   3 | WHERE a = = 1\n     |           ^"
        );
    }

    #[test]
    fn test_snippet_underlines_whole_token() {
        let sql = "SELECT 12abc";
        let err = parse(sql).unwrap_err();
        let snippet = extract_snippet(sql, &err, 0);
        assert_eq!(snippet, "   1 | SELECT 12abc\n     |        ^^^^^");
    }

    #[test]
    fn test_snippet_at_end_of_input() {
        let sql = "SELECT a FROM\n";
        let err = parse(sql).unwrap_err();
        assert_eq!((err.line(), err.column()), (2, 1));
        let snippet = extract_snippet(sql, &err, 1);
        assert_eq!(snippet, "   1 | SELECT a FROM\n   2 | \n     | ^");
    }

    #[test]
    fn test_snippet_keeps_tabs() {
        let sql = "\tSELECT FROM t";
        let err = parse(sql).unwrap_err();
        let snippet = extract_snippet(sql, &err, 0);
        assert_eq!(snippet, "   1 | \tSELECT FROM t\n     | \t       ^^^^");
    }

    #[test]
    fn test_parse_error_display() {
        let sql = "SELECT 'abc";
        let err = CliError::parse("query.sql", sql, parse(sql).unwrap_err());
        assert_eq!(
            err.to_string(),
            "lexical error at line 1, column 8: unterminated string literal\n  --> query.sql:1:8\n   1 | SELECT 'abc\n     |        ^^^^"
        );
    }
}
