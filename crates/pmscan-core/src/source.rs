//! Input discovery: the numbered export series and glob-matched files
//!
//! Exports are named `pubmed_{x0}_to_{x1}.xml`, one file per block of
//! `step` records. A file may also sit on disk gzipped as `<name>.gz`.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::error::ScanError;

/// Numbered export series: `x0` runs from `first` to `last` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedSeries {
    pub first: usize,
    pub last: usize,
    pub step: usize,
}

impl Default for ExpectedSeries {
    fn default() -> Self {
        Self {
            first: 0,
            last: 3600,
            step: 100,
        }
    }
}

impl ExpectedSeries {
    /// Expected file names in series order.
    pub fn file_names(&self) -> Vec<String> {
        if self.step == 0 || self.first > self.last {
            return Vec::new();
        }
        (self.first..=self.last)
            .step_by(self.step)
            .map_while(|x0| {
                let x1 = x0.checked_add(self.step - 1)?;
                Some(format!("pubmed_{x0}_to_{x1}.xml"))
            })
            .collect()
    }

    /// Last record number of the final block, `None` if it overflows `usize`
    /// or the series is empty.
    pub fn last_block_end(&self) -> Option<usize> {
        if self.step == 0 || self.first > self.last {
            return None;
        }
        let last_x0 = self.first + (self.last - self.first) / self.step * self.step;
        last_x0.checked_add(self.step - 1)
    }

    /// Pair each expected name with the path found under `dir`, if any.
    ///
    /// The plain file wins over a `.gz` sibling.
    pub fn resolve(&self, dir: &Path) -> Vec<(String, Option<PathBuf>)> {
        self.file_names()
            .into_iter()
            .map(|name| {
                let plain = dir.join(&name);
                let gz = dir.join(format!("{name}.gz"));
                let path = if plain.is_file() {
                    Some(plain)
                } else if gz.is_file() {
                    Some(gz)
                } else {
                    None
                };
                (name, path)
            })
            .collect()
    }
}

/// A file matched by [`discover`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// File name without directory (used in reports)
    pub name: String,
    pub path: PathBuf,
}

/// Glob `pattern` inside `dir`, files only, sorted by path.
pub fn discover(dir: &Path, pattern: &str) -> io::Result<Vec<InputFile>> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let full = Path::new(&escaped).join(pattern);
    let full_str = full.to_string_lossy();

    let mut paths: Vec<PathBuf> = glob::glob(&full_str)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    log::debug!("{} matched {} files", full_str, paths.len());

    Ok(paths
        .into_iter()
        .map(|path| InputFile {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path,
        })
        .collect())
}

/// Read a whole export file as UTF-8, gunzipping `.gz` files.
pub fn read_xml(path: &Path) -> Result<String, ScanError> {
    let file = File::open(path)?;
    let mut content = String::new();

    if path.extension().is_some_and(|ext| ext == "gz") {
        GzDecoder::new(BufReader::new(file)).read_to_string(&mut content)?;
    } else {
        BufReader::new(file).read_to_string(&mut content)?;
    }

    Ok(content)
}
