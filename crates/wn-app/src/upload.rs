//! Holder for the single uploaded network file.

use std::io;
use std::path::Path;

use tracing::debug;
use wn_core::{INP_EXTENSION, UploadedFile};

use crate::error::{AppError, AppResult};

/// Entry point a file arrived through. Both go through the same checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSource {
    Drop,
    Picker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted,
    /// Name failed the extension filter; nothing changed.
    Ignored,
}

/// Exact, case-sensitive `.inp` suffix match.
pub fn has_inp_extension(filename: &str) -> bool {
    filename.ends_with(INP_EXTENSION)
}

/// Display name of a path, used as the uploaded filename.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Decode raw bytes as UTF-8 text.
pub fn decode_text(filename: &str, bytes: Vec<u8>) -> AppResult<String> {
    String::from_utf8(bytes).map_err(|e| AppError::FileRead {
        filename: filename.to_string(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}

#[derive(Debug, Default)]
pub struct UploadHolder {
    current: Option<UploadedFile>,
}

impl UploadHolder {
    pub fn current(&self) -> Option<&UploadedFile> {
        self.current.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Validate the name, then read and store the file.
    ///
    /// `read` is only invoked for names passing the filter. A failed read
    /// leaves the previous file in place.
    pub fn accept<F>(
        &mut self,
        source: UploadSource,
        filename: &str,
        read: F,
    ) -> AppResult<UploadOutcome>
    where
        F: FnOnce() -> io::Result<Vec<u8>>,
    {
        if !has_inp_extension(filename) {
            debug!(?source, filename, "ignoring file without {} suffix", INP_EXTENSION);
            return Ok(UploadOutcome::Ignored);
        }

        let bytes = read().map_err(|e| AppError::FileRead {
            filename: filename.to_string(),
            source: e,
        })?;
        let content = decode_text(filename, bytes)?;

        debug!(?source, filename, bytes = content.len(), "file loaded");
        self.current = Some(UploadedFile::new(filename, content));
        Ok(UploadOutcome::Accepted)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_match_is_exact() {
        assert!(has_inp_extension("net.inp"));
        assert!(has_inp_extension(".inp"));
        assert!(!has_inp_extension("net.INP"));
        assert!(!has_inp_extension("net.inp.bak"));
        assert!(!has_inp_extension("netinp"));
    }

    #[test]
    fn read_is_skipped_for_rejected_names() {
        let mut holder = UploadHolder::default();
        let outcome = holder
            .accept(UploadSource::Picker, "notes.txt", || {
                panic!("read must not run for rejected names")
            })
            .unwrap();
        assert_eq!(outcome, UploadOutcome::Ignored);
        assert!(!holder.is_loaded());
    }

    #[test]
    fn invalid_utf8_is_a_read_failure() {
        let mut holder = UploadHolder::default();
        let err = holder
            .accept(UploadSource::Drop, "net.inp", || Ok(vec![0xff, 0xfe, 0x00]))
            .unwrap_err();
        assert!(matches!(err, AppError::FileRead { .. }));
        assert_eq!(err.to_string(), "Failed to read file");
        assert!(holder.current().is_none());
    }

    #[test]
    fn file_name_of_path() {
        assert_eq!(file_name_of(Path::new("/tmp/models/net.inp")), "net.inp");
    }
}
