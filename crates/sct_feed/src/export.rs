use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sct_core::ConsoleEntry;
use sct_logging::sct_warn;
use tempfile::NamedTempFile;

use crate::ExportError;

/// Ensure the export directory exists; create if missing.
fn ensure_export_dir(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(ExportError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes console snapshots as `date|type|description` lines, escaped with
/// [`ConsoleEntry::to_line`] so every entry occupies exactly one line.
///
/// The file is written to a temp file in the same directory and then renamed
/// over the target, so readers never observe a partial export.
pub struct ConsoleExporter {
    dir: PathBuf,
}

impl ConsoleExporter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, entries: &[ConsoleEntry]) -> Result<PathBuf, ExportError> {
        ensure_export_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        for entry in entries {
            writeln!(tmp, "{}", entry.to_line())?;
        }
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;
        Ok(target)
    }
}

/// Read an export back. Lines that are not in `date|type|description` form
/// are skipped with a warning.
pub fn load_console_export(path: &Path) -> Result<Vec<ConsoleEntry>, ExportError> {
    let text = fs::read_to_string(path)?;
    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        match ConsoleEntry::parse_line(line) {
            Some(entry) => entries.push(entry),
            None => sct_warn!("skipping malformed console line {} in {:?}", idx + 1, path),
        }
    }
    Ok(entries)
}
