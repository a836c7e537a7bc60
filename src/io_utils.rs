//! Text I/O: file/stdin reading, encoding resolution, prompting.
//!
//! All file access flows through here. Input bytes are decoded via
//! `encoding_rs` (UTF-8 unless overridden); generated SQL is always written
//! as UTF-8. The `-` path convention routes through standard streams, and
//! pasted input is read until a terminator line.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

/// Sentinel line ending interactive paste input.
pub const PASTE_TERMINATOR: &str = "END";

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Reads and decodes a whole input document; `-` reads standard input to
/// EOF.
pub fn read_text(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let bytes = if is_dash(path) {
        let mut buffer = Vec::new();
        io::Read::read_to_end(&mut io::stdin().lock(), &mut buffer)
            .context("Reading standard input")?;
        buffer
    } else {
        fs::read(path).with_context(|| format!("Reading input file {path:?}"))?
    };
    decode_bytes(&bytes, encoding)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode input with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if is_dash(path) {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(contents.as_bytes())
            .context("Writing to stdout")?;
        return stdout.flush().context("Flushing stdout");
    }
    fs::write(path, contents).with_context(|| format!("Writing output file {path:?}"))
}

/// Reads pasted lines from stdin until the terminator line (or EOF).
///
/// The terminator comparison is case-insensitive and whitespace-tolerant so
/// a pasted trailing `end ` still stops input.
pub fn read_pasted_text() -> Result<String> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("Reading pasted input")?;
        if line.trim().eq_ignore_ascii_case(PASTE_TERMINATOR) {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Prints `prompt` without a newline and reads one trimmed response line.
/// EOF yields an empty response.
pub fn prompt_line(prompt: &str) -> Result<String> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{prompt}").context("Writing prompt")?;
    stdout.flush().context("Flushing prompt")?;
    let mut response = String::new();
    io::stdin()
        .read_line(&mut response)
        .context("Reading response")?;
    Ok(response.trim().to_string())
}

/// Default destination for a repaired markup file: `input_fixed.html` next
/// to the input.
pub fn default_repair_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("repaired");
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_fixed.{ext}"),
        None => format!("{stem}_fixed.html"),
    };
    input.with_file_name(name)
}

/// Appends `.sql` unless the name already ends with it.
pub fn ensure_sql_extension(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".sql") {
        name.to_string()
    } else {
        format!("{name}.sql")
    }
}
