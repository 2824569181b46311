use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tempfile::NamedTempFile;

use crate::{
    app::{App, Input},
    routes::Transition,
};

const PDF_SIGNATURE: &[u8] = b"%PDF-";
const DOCUMENT_FILE_NAME: &str = "parking-map.pdf";

/// Write the document atomically into `dir`, replacing any earlier copy
fn save_document(dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    if !bytes.starts_with(PDF_SIGNATURE) {
        anyhow::bail!("Response is not a PDF document");
    }

    let path = dir.join(DOCUMENT_FILE_NAME);
    let mut temp_file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
    temp_file
        .write_all(bytes)
        .context("Failed to write parking map")?;

    // Saved copies are never edited in place
    let mut permissions = temp_file
        .as_file()
        .metadata()
        .context("Failed to read parking map metadata")?
        .permissions();
    permissions.set_readonly(true);
    temp_file
        .as_file()
        .set_permissions(permissions)
        .context("Failed to mark parking map read-only")?;
    temp_file
        .persist(&path)
        .with_context(|| format!("Failed to save parking map to {:?}", path))?;

    tracing::info!("Saved parking map ({} bytes) to {:?}", bytes.len(), path);
    Ok(path)
}

async fn load(app: &App) -> Result<(PathBuf, usize)> {
    let url = &app.config().parking_map_url;
    let bytes = app.client().fetch_document(url).await?;
    let dir = app.config().ensure_cache_dir()?;
    let path = save_document(&dir, &bytes)?;
    Ok((path, bytes.len()))
}

async fn load_with_spinner<W: Write>(app: &App, out: &mut W) -> Result<bool> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Loading parking map...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = load(app).await;
    spinner.finish_and_clear();

    match result {
        Ok((path, size)) => {
            writeln!(out, "Parking map ready: {}", path.display())?;
            writeln!(out, "({:.1} KB, open it with any PDF viewer)", size as f64 / 1024.0)?;
            writeln!(out, "[b] Back")?;
            Ok(true)
        }
        Err(e) => {
            tracing::warn!("parking map failed: {:#}", e);
            writeln!(out, "Could not load the parking map: {:#}", e)?;
            writeln!(out, "[r] Retry    [b] Back")?;
            Ok(false)
        }
    }
}

pub async fn show<W: Write>(app: &App, input: &mut Input, out: &mut W) -> Result<Transition> {
    writeln!(out, "ATU Parking Map")?;
    writeln!(out, "{}", app.config().parking_map_url)?;
    out.flush()?;
    let mut loaded = load_with_spinner(app, out).await?;
    out.flush()?;

    while let Some(line) = input.recv().await {
        match line.trim() {
            "" => continue,
            "r" | "retry" if !loaded => {
                loaded = load_with_spinner(app, out).await?;
            }
            "b" | "back" => return Ok(Transition::Back),
            "q" | "quit" => return Ok(Transition::Exit),
            other => writeln!(out, "Unknown command: {}", other)?,
        }
        out.flush()?;
    }
    Ok(Transition::Exit)
}
