use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{debug, warn};

/// Expands one command-line path into the files to search. Directories are
/// only entered with `recursive`; their entries come back sorted.
pub fn collect_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(root).with_context(|| format!("{}", root.display()))?;
    if meta.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !meta.is_dir() {
        bail!("{}: not a regular file", root.display());
    }
    if !recursive {
        warn!("{}: is a directory", root.display());
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    collect_recursive(root, &mut out);
    Ok(out)
}

fn collect_recursive(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("skipping {}: {err}", dir.display());
            return;
        }
    };
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            collect_recursive(&path, out);
        } else if path.is_file() {
            out.push(path);
        }
    }
}
