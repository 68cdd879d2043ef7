// src/scanner.rs
//
// Batch driver: discovers image files and extracts one GPS record per image in
// parallel. Per-image failures are counted and logged, never fatal.

use crate::config::ScanSettings;
use crate::error::GpsError;
use crate::exif_extract::extract_from_path;
use crate::gps_record::NormalizedGpsRecord;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use walkdir::WalkDir;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOutcome {
    Record(NormalizedGpsRecord),
    Error(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageResult {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: ImageOutcome,
}

impl ImageResult {
    pub fn record(&self) -> Option<&NormalizedGpsRecord> {
        match &self.outcome {
            ImageOutcome::Record(r) => Some(r),
            ImageOutcome::Error(_) => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanReport {
    /// Sorted by path
    pub results: Vec<ImageResult>,
    pub files_found: usize,
    pub files_skipped: usize,
    /// Records with both latitude and longitude
    pub located: usize,
    /// Readable images without a usable position
    pub missing_gps: usize,
    /// Unreadable files or corrupt GPS metadata
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct Discovered {
    pub files: Vec<PathBuf>,
    pub skipped: usize,
}

fn has_ext(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| *e == ext))
}

/// Collect image files from the given files/directories. Directories are
/// walked recursively; canonical paths are de-duplicated.
pub fn collect_images(paths: &[PathBuf], settings: &ScanSettings, extensions: &[String]) -> Discovered {
    let mut found = Discovered::default();
    let mut seen_paths = HashSet::new();

    let mut push = |path: &Path, found: &mut Discovered| {
        if !has_ext(path, extensions) {
            found.skipped += 1;
            return;
        }
        match path.canonicalize() {
            Ok(canonical) => {
                if seen_paths.insert(canonical.clone()) {
                    found.files.push(canonical);
                }
            }
            Err(e) => log::warn!("Cannot resolve {}: {}", path.display(), e),
        }
    };

    for path in paths {
        if path.is_dir() {
            let mut walker = WalkDir::new(path).follow_links(settings.follow_links);
            if let Some(depth) = settings.max_depth {
                walker = walker.max_depth(depth);
            }
            for entry in walker.into_iter() {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => push(entry.path(), &mut found),
                    Ok(_) => {}
                    Err(e) => log::warn!("Skipping unreadable entry: {}", e),
                }
            }
        } else if path.is_file() {
            push(path, &mut found);
        } else {
            log::warn!("Not a file or directory: {}", path.display());
        }
    }

    found.files.sort();
    found
}

/// Extract GPS records for every discovered image in parallel.
pub fn scan(paths: &[PathBuf], settings: &ScanSettings, extensions: &[String]) -> ScanReport {
    let discovered = collect_images(paths, settings, extensions);
    log::info!("Found {} files, skipped {}", discovered.files.len(), discovered.skipped);

    let failed = AtomicUsize::new(0);
    // Indexed collect keeps the sorted discovery order
    let results: Vec<ImageResult> = discovered
        .files
        .par_iter()
        .map(|path| {
            let outcome = match extract_from_path(path) {
                Ok(record) => ImageOutcome::Record(record),
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    if let Some(gps_err) = e.downcast_ref::<GpsError>() {
                        log::warn!("{}: {} tag is corrupt: {}", path.display(), gps_err.tag(), gps_err);
                    } else {
                        log::warn!("{:#}", e);
                    }
                    ImageOutcome::Error(format!("{:#}", e))
                }
            };
            ImageResult { path: path.clone(), outcome }
        })
        .collect();

    let located = results.iter().filter_map(ImageResult::record).filter(|r| r.has_position()).count();
    let failed = failed.into_inner();

    ScanReport {
        files_found: discovered.files.len(),
        files_skipped: discovered.skipped,
        located,
        missing_gps: results.len() - located - failed,
        failed,
        results,
    }
}
