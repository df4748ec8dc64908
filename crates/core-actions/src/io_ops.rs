//! File IO helpers.
//!
//! Synchronous read/write of whole files. Loading normalizes line endings
//! so the buffer only ever holds bare lines; writing re-expands them with the
//! style observed on load.

use core_state::{EditorState, LineEnding, normalize_line_endings};
use core_text::Buffer;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("no file name")]
    NoFileName,
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file read from disk (or a fresh buffer for a path that does not exist yet).
#[derive(Debug)]
pub struct LoadedFile {
    pub buffer: Buffer,
    pub path: PathBuf,
    pub line_ending: LineEnding,
    pub had_trailing_newline: bool,
    pub mixed_line_endings: bool,
    /// The path did not exist; saving will create it.
    pub new_file: bool,
}

impl LoadedFile {
    /// Fresh session for this file: clean, Normal mode, cursor at the origin.
    pub fn into_state(self) -> EditorState {
        let mut state = EditorState::new(self.buffer);
        state.file_name = Some(self.path);
        state.original_line_ending = self.line_ending;
        state.had_trailing_newline = self.had_trailing_newline;
        state
    }
}

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub lines: usize,
    pub bytes: usize,
}

/// Open `path`, normalizing its line endings.
pub fn open_file(path: &Path) -> Result<LoadedFile, IoError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(target: "io", path = %path.display(), "new_file");
            return Ok(LoadedFile {
                buffer: Buffer::new(),
                path: path.to_path_buf(),
                line_ending: LineEnding::Lf,
                had_trailing_newline: true,
                mixed_line_endings: false,
                new_file: true,
            });
        }
        Err(source) => {
            tracing::error!(target: "io", path = %path.display(), error = %source, "file_open_error");
            return Err(IoError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let norm = normalize_line_endings(&content);
    if norm.mixed {
        tracing::warn!(target: "io", path = %path.display(), chosen = ?norm.original, "mixed_line_endings");
    }
    let buffer = Buffer::from_text(&norm.normalized);
    tracing::info!(target: "io", path = %path.display(), lines = buffer.line_count(), ending = ?norm.original, "file_opened");
    Ok(LoadedFile {
        buffer,
        path: path.to_path_buf(),
        line_ending: norm.original,
        had_trailing_newline: norm.had_trailing_newline,
        mixed_line_endings: norm.mixed,
        new_file: false,
    })
}

/// Serialize the buffer using the recorded line ending and trailing newline.
pub fn serialize(state: &EditorState) -> String {
    let ending = state.original_line_ending.as_str();
    let mut content = state.buffer.lines().collect::<Vec<_>>().join(ending);
    if state.had_trailing_newline {
        content.push_str(ending);
    }
    content
}

/// Write the buffer to `target`, or to the session's file name. Clears
/// `dirty` and adopts `target` as the file name on success only.
pub fn write_file(state: &mut EditorState, target: Option<&Path>) -> Result<WriteSummary, IoError> {
    let path = match (target, state.file_name.as_ref()) {
        (Some(p), _) => p.to_path_buf(),
        (None, Some(existing)) => existing.clone(),
        (None, None) => return Err(IoError::NoFileName),
    };
    let content = serialize(state);
    if let Err(source) = std::fs::write(&path, content.as_bytes()) {
        tracing::error!(target: "io", path = %path.display(), error = %source, "file_write_error");
        return Err(IoError::Write { path, source });
    }
    state.dirty = false;
    state.file_name = Some(path.clone());
    let summary = WriteSummary {
        path,
        lines: state.buffer.line_count(),
        bytes: content.len(),
    };
    tracing::info!(target: "io", path = %summary.path.display(), lines = summary.lines, bytes = summary.bytes, "file_written");
    Ok(summary)
}
