use std::fs;
use std::io::{Read, Write};

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::cli::{Config, resolve_use_color};
use crate::fs_walk::collect_files;
use crate::search::{SearchOptions, process_input};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub matched: bool,
    // A path could not be found or read; the search went on without it
    pub had_errors: bool,
}

impl Outcome {
    /// grep's convention: trouble wins over a match.
    pub fn exit_code(self) -> i32 {
        if self.had_errors {
            2
        } else if self.matched {
            0
        } else {
            1
        }
    }
}

/// Runs one search over `cfg.paths`, or over `input` when there are none.
pub fn run<R: Read, W: Write>(cfg: &Config, mut input: R, out: &mut W) -> Result<Outcome> {
    let pattern = yre::compile(cfg.pattern_source())
        .with_context(|| format!("invalid pattern {:?}", cfg.pattern))?;
    debug!("{pattern:?} has {} groups", pattern.group_count());

    let opts = SearchOptions {
        only_matching: cfg.only_matching,
        use_color: resolve_use_color(cfg.color),
        anchored: cfg.anchored(),
    };

    if cfg.paths.is_empty() {
        let mut buffer = String::new();
        input
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        let matched = process_input(&buffer, &pattern, None, &opts, out)?;
        out.flush()?;
        return Ok(Outcome {
            matched,
            had_errors: false,
        });
    }

    let mut outcome = Outcome {
        matched: false,
        had_errors: false,
    };
    let mut files = Vec::new();
    for p in &cfg.paths {
        match collect_files(p, cfg.recursive) {
            Ok(found) => files.extend(found),
            Err(err) => {
                warn!("{err:#}");
                outcome.had_errors = true;
            }
        }
    }

    // Prefix with the file name when there's more than one possible source
    let show_filename = cfg.recursive || files.len() > 1;

    for path in files {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!("{}: {err}", path.display());
                outcome.had_errors = true;
                continue;
            }
        };
        let name = path.to_string_lossy();
        let filename = show_filename.then_some(name.as_ref());
        outcome.matched |= process_input(&content, &pattern, filename, &opts, out)
            .with_context(|| format!("writing results for {}", path.display()))?;
    }
    out.flush()?;

    Ok(outcome)
}
