//! Batch pipelines over directories of documents.
//!
//! Two pipelines share this module:
//!
//! - [`Extractor`] reads every `.docx` file in a directory and writes one
//!   `.txt` per document plus an aggregate JSON record.
//! - [`Formatter`] reads every `.md` résumé in a directory and writes one
//!   styled `.docx` per input.
//!
//! # Example
//!
//! ```no_run
//! use cvdoc::convert::{ExtractOptions, Extractor};
//!
//! fn main() -> cvdoc::Result<()> {
//!     let extractor = Extractor::new(ExtractOptions::default());
//!     let report = extractor.run("upload", "source_analysis")?;
//!     println!("{} documents, {} failed", report.result.len(), report.failures());
//!     Ok(())
//! }
//! ```

mod extract;
mod format;

pub use extract::{ExtractOptions, ExtractionReport, Extractor};
pub use format::{FormatOptions, FormatReport, Formatter};

use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Check whether a path has the given extension, ignoring ASCII case.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// List regular files in `dir` with the given extension, sorted by name.
pub fn collect_inputs(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, ext) {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Output path in `dir` for `input` with its extension replaced.
pub(crate) fn output_path(dir: &Path, input: &Path, ext: &str) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(ext);
    dir.join(name)
}

/// Allocates output paths so that no two inputs of one run share an output.
///
/// Inputs whose stems differ only by case (or only by extension case, such
/// as `cv.docx` and `cv.DOCX`) would otherwise overwrite each other on
/// case-insensitive filesystems. A repeated name becomes `<stem>_<n>.<ext>`
/// with `n` counting from 2.
#[derive(Debug, Default)]
pub(crate) struct OutputNames {
    used: HashSet<String>,
}

impl OutputNames {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reserve and return the output path for `input`.
    pub(crate) fn allocate(&mut self, dir: &Path, input: &Path, ext: &str) -> PathBuf {
        let stem = input.file_stem().unwrap_or_default().to_os_string();
        let mut candidate = output_path(dir, input, ext);
        let mut n = 2;
        while !self.used.insert(file_name(&candidate).to_lowercase()) {
            let mut name = stem.clone();
            name.push(format!("_{}.{}", n, ext));
            candidate = dir.join(name);
            n += 1;
        }
        candidate
    }
}

/// File name of `path` as a string, lossily converted.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
