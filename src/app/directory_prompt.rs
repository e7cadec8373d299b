//! Interactive choice of the export root.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const PROMPT: &str = "Download directory (leave empty to cancel): ";

/// Returns the output directory: `--output-dir` if given, else asks on stdin.
///
/// `Ok(None)` means the user cancelled.
pub(crate) fn choose_output_dir(explicit: Option<PathBuf>) -> io::Result<Option<PathBuf>> {
    if explicit.is_some() {
        return Ok(explicit);
    }
    let stdin = io::stdin();
    let stderr = io::stderr();
    let home = std::env::var_os("HOME").map(PathBuf::from);
    prompt_for_directory(stdin.lock(), stderr.lock(), home.as_deref())
}

/// Writes the prompt to `output` and reads one line from `input`.
///
/// An empty line or end of input cancels. A leading `~/` expands to `home`.
pub(crate) fn prompt_for_directory<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    home: Option<&Path>,
) -> io::Result<Option<PathBuf>> {
    output.write_all(PROMPT.as_bytes())?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim();
    if answer.is_empty() {
        return Ok(None);
    }

    let path = match (answer.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(answer),
    };
    Ok(Some(path))
}
