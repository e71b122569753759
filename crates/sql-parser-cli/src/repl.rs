//! Interactive prompt: read lines until one contains a `;`, then parse the
//! accumulated text. `0` or `exit` on an empty buffer leaves the loop.

use crate::config::CliConfig;
use crate::output::render_source;
use std::io::{self, BufRead, Write};

const PROMPT: &str = "sql> ";
const CONTINUATION: &str = "  -> ";
const INPUT_NAME: &str = "<input>";

pub fn run_interactive<R: BufRead, W: Write>(
    input: R,
    mut out: W,
    config: &CliConfig,
) -> io::Result<()> {
    let mut buffer = String::new();
    prompt(&mut out, &buffer)?;

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();

        if buffer.is_empty() && (trimmed == "0" || trimmed.eq_ignore_ascii_case("exit")) {
            return Ok(());
        }
        if !buffer.is_empty() || !trimmed.is_empty() {
            buffer.push_str(&line);
            buffer.push('\n');
        }
        if line.contains(';') {
            evaluate(&mut out, &buffer, config)?;
            buffer.clear();
        }
        prompt(&mut out, &buffer)?;
    }

    // End of input in the middle of a statement
    if !buffer.trim().is_empty() {
        writeln!(out)?;
        evaluate(&mut out, &buffer, config)?;
    }
    Ok(())
}

fn evaluate<W: Write>(out: &mut W, source: &str, config: &CliConfig) -> io::Result<()> {
    match render_source(INPUT_NAME, source, config) {
        Ok(rendered) => writeln!(out, "{rendered}"),
        Err(err) => {
            tracing::debug!(%err, "statement rejected");
            writeln!(out, "{err}")
        }
    }
}

fn prompt<W: Write>(out: &mut W, buffer: &str) -> io::Result<()> {
    let text = if buffer.is_empty() {
        PROMPT
    } else {
        CONTINUATION
    };
    write!(out, "{text}")?;
    out.flush()
}
