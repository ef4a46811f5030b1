use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::TtsError;

/// Downloads `url` to `path`, creating parent directories. The file only
/// appears at `path` once the download is complete.
pub fn download_file_from_url(url: &str, path: &Path) -> Result<(), TtsError> {
    let download_err = |message: String| TtsError::Download {
        url: url.to_string(),
        message,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    println!("Downloading {url}...");
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| download_err(e.to_string()))?;

    let pb = ProgressBar::new(response.content_length().unwrap_or(0));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {bytes:>9}/{total_bytes:9} {msg}")
            .map_err(|e| download_err(e.to_string()))?
            .progress_chars("##-"),
    );
    if let Some(name) = path.file_name() {
        pb.set_message(name.to_string_lossy().into_owned());
    }

    let partial = path.with_extension("part");
    {
        let mut file = BufWriter::new(File::create(&partial)?);
        io::copy(&mut pb.wrap_read(response), &mut file)?;
        file.flush()?;
    }
    fs::rename(&partial, path)?;

    pb.finish_with_message(format!("saved to {}", path.display()));
    Ok(())
}

/// Downloads `url` unless `path` already exists.
pub fn ensure_file(url: &str, path: &Path) -> Result<(), TtsError> {
    if path.exists() {
        tracing::debug!("using {}", path.display());
        return Ok(());
    }
    download_file_from_url(url, path)
}
