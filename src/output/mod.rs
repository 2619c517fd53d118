use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::transcript::FetchedTranscript;

pub mod formatters;

pub use formatters::*;

/// Save fetched transcripts to file, returning the path written.
///
/// A path without an extension gets the one matching the format.
pub async fn save_to_file(
    transcripts: &[FetchedTranscript],
    path: &Path,
    format: OutputFormat,
) -> Result<PathBuf> {
    let formatter = formatter_for(format);
    let content = formatter.format_transcripts(transcripts)?;

    let path = if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(formatter.file_extension())
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(&path, content)
        .with_context(|| format!("Failed to write transcripts to {}", path.display()))?;
    Ok(path)
}

/// Print fetched transcripts to stdout
pub fn print_to_console(transcripts: &[FetchedTranscript], format: OutputFormat) -> Result<()> {
    let content = formatter_for(format).format_transcripts(transcripts)?;
    println!("{}", content);
    Ok(())
}
