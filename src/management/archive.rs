use std::{
    io::{Cursor, Write},
    path::Path,
};

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{error::AppError, types::AlbumEntry, utils};

/// Downloads every cover into `folder` and returns the file names written.
///
/// The folder is created if needed. A cover that cannot be fetched with
/// `200 OK` is logged and skipped, and so is one whose file cannot be written
/// (a name the filesystem rejects, for instance). The remaining covers are
/// still downloaded. Existing files with the same name are overwritten.
///
/// # Errors
///
/// Only failing to create `folder` is an error.
pub async fn persist_covers(
    http: &Client,
    entries: &[AlbumEntry],
    folder: &Path,
) -> Result<Vec<String>, AppError> {
    async_fs::create_dir_all(folder).await?;

    let mut written = Vec::with_capacity(entries.len());
    for entry in entries {
        let response = match http.get(&entry.cover_url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(album = %entry.name, error = %e, "Failed to download image");
                continue;
            }
        };

        if response.status() != StatusCode::OK {
            tracing::warn!(
                album = %entry.name,
                status = %response.status(),
                "Failed to download image"
            );
            continue;
        }

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(album = %entry.name, error = %e, "Failed to read image body");
                continue;
            }
        };

        let file_name = utils::sanitize_filename(&entry.name);
        if let Err(e) = async_fs::write(folder.join(&file_name), &body).await {
            tracing::warn!(
                album = %entry.name,
                file = %file_name,
                error = %e,
                "Failed to write image"
            );
            continue;
        }
        written.push(file_name);
    }

    tracing::info!(
        folder = %folder.display(),
        written = written.len(),
        skipped = entries.len() - written.len(),
        "Persisted covers"
    );
    Ok(written)
}

/// Names of the regular files directly inside `folder`, sorted.
///
/// A folder that does not exist yet is reported as empty.
pub async fn list_folder(folder: &Path) -> Result<Vec<String>, AppError> {
    let mut dir = match async_fs::read_dir(folder).await {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    while let Some(entry) = dir.next().await {
        let entry = entry?;
        if !entry.file_type().await?.is_file() {
            continue;
        }
        // Names that are not valid UTF-8 cannot be served back by name.
        if let Ok(name) = entry.file_name().into_string() {
            files.push(name);
        }
    }

    files.sort();
    Ok(files)
}

/// Bundles the files directly inside `folder` into a zip held in memory.
///
/// Each entry is named after the bare file name; subdirectories are not
/// descended into. The returned bytes are the complete archive.
pub async fn archive_folder(folder: &Path) -> Result<Vec<u8>, AppError> {
    let files = list_folder(folder).await?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for name in &files {
        let contents = async_fs::read(folder.join(name)).await?;
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&contents)?;
    }

    let cursor = zip.finish()?;
    tracing::debug!(folder = %folder.display(), entries = files.len(), "Built archive");
    Ok(cursor.into_inner())
}
