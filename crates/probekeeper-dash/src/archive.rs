//! Dashboard directory management
//!
//! The agent ships a default dashboard set; an operator-supplied zip
//! resource is extracted over it. Extraction failures abort and leave the
//! existing directory contents in place.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use zip::ZipArchive;

use crate::error::DashError;

/// A dashboard document ready for registration
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Registry key, the file stem
    pub name: String,
    /// Raw JSON payload
    pub json: String,
}

/// Extract the dashboard resource archive over `target_dir`
///
/// Mirrors the staging the operator expects: the archive is first copied
/// next to the dashboards, then unpacked. Returns the number of extracted
/// files. Errors never remove what is already in `target_dir`.
#[instrument]
pub async fn refresh_from_resource(
    resource: &Path,
    target_dir: &Path,
) -> Result<usize, DashError> {
    let resource = resource.to_path_buf();
    let target_dir = target_dir.to_path_buf();

    // zip is synchronous; keep the unpacking off the runtime threads
    tokio::task::spawn_blocking(move || extract_archive(&resource, &target_dir))
        .await
        .map_err(|e| DashError::IoError(e.to_string()))?
}

fn extract_archive(resource: &Path, target_dir: &Path) -> Result<usize, DashError> {
    std::fs::create_dir_all(target_dir).map_err(|e| DashError::IoError(e.to_string()))?;

    let staged = target_dir.join(
        resource
            .file_name()
            .ok_or_else(|| DashError::IoError(format!("no file name in {}", resource.display())))?,
    );
    std::fs::copy(resource, &staged).map_err(|e| DashError::IoError(e.to_string()))?;

    let file = File::open(&staged).map_err(|e| DashError::IoError(e.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| DashError::BadArchive(e.to_string()))?;

    let mut extracted = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| DashError::BadArchive(e.to_string()))?;

        // Reject entries that would land outside the dashboard directory
        let Some(relative) = entry.enclosed_name() else {
            return Err(DashError::UnsafeEntry(entry.name().to_string()));
        };
        let dest: PathBuf = target_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&dest).map_err(|e| DashError::IoError(e.to_string()))?;
            continue;
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DashError::IoError(e.to_string()))?;
        }

        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .map_err(|e| DashError::BadArchive(e.to_string()))?;
        std::fs::write(&dest, contents).map_err(|e| DashError::IoError(e.to_string()))?;

        debug!(entry = %dest.display(), "extracted dashboard file");
        extracted += 1;
    }

    info!(count = extracted, dir = %target_dir.display(), "dashboards refreshed from resource");
    Ok(extracted)
}

/// Enumerate dashboard JSON documents in a directory
///
/// Non-JSON files (including the staged archive itself) are skipped; files
/// that fail to read are logged and skipped rather than failing the whole
/// publish pass.
#[instrument]
pub fn list_dashboards(dir: &Path) -> Result<Vec<Dashboard>, DashError> {
    let entries = std::fs::read_dir(dir).map_err(|e| DashError::IoError(e.to_string()))?;

    let mut dashboards = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DashError::IoError(e.to_string()))?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => dashboards.push(Dashboard {
                name: stem.to_string(),
                json,
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable dashboard");
            }
        }
    }

    dashboards.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(dashboards)
}
