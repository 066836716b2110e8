//! Flat-file writer for the collected roster.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{DriveError, Result};
use crate::models::DriveRecord;

/// Write the full roster to every destination path.
///
/// Each destination is created if absent and truncated if present, then
/// receives two lines per record in list order:
///
/// ```text
/// [drive-name]
/// [drive-id]
/// ```
///
/// A failure on one destination does not roll back destinations already
/// written in the same run.
pub fn write_roster(records: &[DriveRecord], paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        write_one(records, path).map_err(|source| DriveError::Write {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

fn write_one(records: &[DriveRecord], path: &Path) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for record in records {
        writeln!(file, "{}", record.name)?;
        writeln!(file, "{}", record.id)?;
    }
    file.flush()
}
