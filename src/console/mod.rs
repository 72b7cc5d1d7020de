//! Terminal presentation of a finished run.

use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use supports_color::Stream;

/// Enables colored output only when stdout can show it.
pub fn configure_colors() {
    let enabled = supports_color::on(Stream::Stdout).is_some();
    colored::control::set_override(enabled);
}

/// Prints the generated document followed by a confirmation naming the
/// output file.
pub fn write_success(mut out: impl Write, diagram: &str, output: &Path) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Generated Mermaid diagram:".bold())?;
    writeln!(out, "{diagram}")?;
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("Mermaid diagram has been saved to '{}'", output.display()).green()
    )?;
    out.flush()
}
