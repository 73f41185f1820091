//! @ai:module:intent Line-delimited JSON output for corpus and prediction records
//! @ai:module:layer infrastructure
//! @ai:module:public_api CorpusWriter, check_output, prepare_output
//! @ai:module:stateless false

use crate::error::{Error, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// @ai:intent Refuse to clobber an existing output unless forced
/// @ai:effects fs:read
pub fn check_output(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::config(format!(
            "Output file {} already exists. Delete it first or pass --force.",
            path.display()
        )));
    }
    Ok(())
}

/// @ai:intent Remove a forced-over output and create its parent directory
/// @ai:effects fs:write
pub fn prepare_output(path: &Path, force: bool) -> Result<()> {
    check_output(path, force)?;

    if path.exists() {
        std::fs::remove_file(path)?;
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(())
}

/// @ai:intent Writes one JSON object per line
pub struct CorpusWriter {
    out: BufWriter<File>,
    written: usize,
}

impl CorpusWriter {
    /// @ai:intent Create the output file
    /// @ai:pre prepare_output succeeded for this path
    /// @ai:effects fs:write
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            out: BufWriter::new(file),
            written: 0,
        })
    }

    /// @ai:intent Append one record
    /// @ai:effects fs:write
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// @ai:intent Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// @ai:intent Flush buffered records
    /// @ai:effects fs:write
    pub fn finish(mut self) -> Result<usize> {
        self.out.flush()?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::record::TestRecord;
    use tempfile::TempDir;

    #[test]
    fn test_existing_output_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.jsonl");
        std::fs::write(&path, "old").unwrap();

        assert!(matches!(prepare_output(&path, false), Err(Error::Configuration(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");

        prepare_output(&path, true).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_creates_missing_parent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dir").join("test.jsonl");
        prepare_output(&path, false).unwrap();
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_one_record_per_line() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.jsonl");

        let record = TestRecord {
            signatures: vec![],
            input: "line\nbreak".to_string(),
            ground_truth: "g()".to_string(),
            source_file_path: "a.ts".to_string(),
        };

        let mut writer = CorpusWriter::create(&path).unwrap();
        writer.write(&record).unwrap();
        writer.write(&record).unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
