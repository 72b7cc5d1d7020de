use std::io::{self, BufRead, Write};

pub const DIRECTORY_PROMPT: &str =
    "Enter directory path to scan (press Enter for current directory): ";

/// Asks for the directory to scan and returns the answered line without its
/// line ending. End of input counts as an empty answer.
pub fn prompt_for_directory(mut input: impl BufRead, mut output: impl Write) -> io::Result<String> {
    write!(output, "{DIRECTORY_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.strip_suffix('\n').unwrap_or(&line);
    let answer = answer.strip_suffix('\r').unwrap_or(answer);

    Ok(answer.to_string())
}
