/*!
 * Project file writer
 *
 * Documents are stored as UTF-16LE without a byte-order mark, the encoding
 * the wrapper reads. The text is staged in a temporary file beside the target
 * and moved over it, so a failed write never leaves a truncated project.
 */

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{EvbError, Result};
use crate::template::encode_utf16le;

/// Writes assembled documents to disk
#[derive(Debug, Clone)]
pub struct ProjectWriter {
    /// Destination project file
    output_file: PathBuf,
}

impl ProjectWriter {
    /// Create a writer for `output_file`
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
        }
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Encode and store `document`, replacing any existing file; returns bytes written
    pub fn write(&self, document: &str) -> Result<u64> {
        let bytes = encode_utf16le(document);
        let wrap = |source: io::Error| EvbError::OutputWrite {
            path: self.output_file.clone(),
            source,
        };

        let parent = match self.output_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let staged = NamedTempFile::new_in(parent).map_err(wrap)?;
        {
            let mut writer = BufWriter::new(staged.as_file());
            writer.write_all(&bytes).map_err(wrap)?;
            writer.flush().map_err(wrap)?;
        }
        staged
            .persist(&self.output_file)
            .map_err(|err| wrap(err.error))?;

        log::debug!(
            "Wrote {} bytes to {}",
            bytes.len(),
            self.output_file.display()
        );
        Ok(bytes.len() as u64)
    }
}
