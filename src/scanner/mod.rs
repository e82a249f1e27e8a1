pub mod types;

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Instant;

use anyhow::{Context, Result};

use self::types::{RawFileEntry, ScanProgress};

/// Walk `root` and collect one entry per file and directory.
/// Unreadable entries are reported on `progress` and skipped.
pub fn scan(root: &Path, progress: Sender<ScanProgress>) -> Result<Vec<RawFileEntry>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("cannot open scan root {}", root.display()))?;

    let _ = progress.send(ScanProgress::Started { root: root.clone() });
    let start = Instant::now();

    let mut entries = Vec::new();
    let (mut files, mut dirs, mut bytes) = (0u64, 0u64, 0u64);

    for entry in jwalk::WalkDir::new(&root).skip_hidden(false).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report(&progress, e.path().map(Path::to_path_buf).unwrap_or_default(), &e);
                continue;
            }
        };

        let path = entry.path();
        let is_dir = entry.file_type().is_dir();
        let size = if is_dir {
            0
        } else {
            match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    report(&progress, path, &e);
                    continue;
                }
            }
        };

        if is_dir {
            dirs += 1;
        } else {
            files += 1;
            bytes += size;
        }
        entries.push(RawFileEntry { path, size, is_dir });
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Scanned {} in {} ms: {} files, {} dirs, {} bytes",
        root.display(),
        elapsed_ms,
        files,
        dirs,
        bytes
    );
    let _ = progress.send(ScanProgress::Completed {
        total_files: files,
        total_dirs: dirs,
        total_bytes: bytes,
        elapsed_ms,
    });

    Ok(entries)
}

fn report(progress: &Sender<ScanProgress>, path: PathBuf, error: &dyn std::fmt::Display) {
    tracing::warn!("Skipping {}: {}", path.display(), error);
    let _ = progress.send(ScanProgress::Error {
        path,
        message: error.to_string(),
    });
}
