//! Discovery of sourcemap files on disk.
//!
//! Walks a directory tree, decodes every `.map` file that looks like a
//! sourcemap and collects them into a `MapSet`.
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::detector::is_sourcemap_slice;
use crate::errors::{Error, Result};
use crate::stacktrace::MapSet;
use crate::types::SourceMap;

fn is_ignored<S: AsRef<str>>(entry: &DirEntry, ignore: &[S]) -> bool {
    let path = entry.path().to_string_lossy();
    ignore
        .iter()
        .map(AsRef::as_ref)
        .any(|prefix| !prefix.is_empty() && path.starts_with(prefix))
}

fn is_map_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(".map")
}

/// Loads a single sourcemap file.
pub fn load_sourcemap<P: AsRef<Path>>(path: P) -> Result<SourceMap> {
    let path = path.as_ref();
    fs::read(path)
        .map_err(Error::from)
        .and_then(|bytes| SourceMap::from_slice(&bytes))
        .map_err(|err| Error::BadSourcemapFile(path.display().to_string(), Box::new(err)))
}

/// Recursively finds and decodes all sourcemaps below `root`.
///
/// Paths starting with one of the `ignore` prefixes are skipped, which
/// also prunes whole directories.  `.map` files that are not sourcemaps
/// are skipped as well, and so are indexed sourcemaps and entries the walk
/// cannot read.  Each map is keyed by its path without the `.map` suffix.
/// A sourcemap that fails to decode aborts the search.
pub fn find_sourcemaps<P: AsRef<Path>, S: AsRef<str>>(root: P, ignore: &[S]) -> Result<MapSet> {
    let root = root.as_ref();
    let mut maps = MapSet::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let ignored = is_ignored(entry, ignore);
            if ignored {
                debug!(path = %entry.path().display(), "ignoring path");
            }
            !ignored
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "failed to walk directory");
                continue;
            }
        };
        if !is_map_file(&entry) {
            continue;
        }

        let path = entry.path();
        let bytes = fs::read(path)?;
        if !is_sourcemap_slice(&bytes) {
            warn!(path = %path.display(), "skipping .map file that is not a sourcemap");
            continue;
        }

        let sm = match SourceMap::from_slice(&bytes) {
            Ok(sm) => sm,
            Err(Error::IndexedSourcemap) => {
                warn!(path = %path.display(), "skipping indexed sourcemap");
                continue;
            }
            Err(err) => {
                return Err(Error::BadSourcemapFile(
                    path.display().to_string(),
                    Box::new(err),
                ))
            }
        };
        info!(path = %path.display(), lines = sm.get_table().line_count(), "found sourcemap");
        maps.insert_map_file(&path.to_string_lossy(), sm);
    }

    Ok(maps)
}
