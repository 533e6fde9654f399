//! Error types for the core codec.
//!
//! Core decode/encode failures are represented precisely with [`LcfError`] so callers can
//! match on them; everything above the codec (file façades, INI parsing, examples) uses
//! `anyhow` the way the rest of the workspace does.

use thiserror::Error;

pub type LcfResult<T> = Result<T, LcfError>;

#[derive(Debug, Error)]
pub enum LcfError {
    #[error("unexpected end of input while reading {context}")]
    Truncated { context: &'static str },

    #[error("malformed data at {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("text encoding {label} is not available in this build")]
    EncodingUnavailable { label: String },
}

impl LcfError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        LcfError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal problems discovered while loading a file. Logged via `log::warn!` and handed
/// back to the caller instead of silently dropped or escalated to a hard error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    HeaderMismatch { expected: String, found: String },
    UnknownChunk { path: String, tag: u32, len: usize },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadWarning::HeaderMismatch { expected, found } => {
                write!(f, "header mismatch: expected {expected:?}, found {found:?}")
            }
            LoadWarning::UnknownChunk { path, tag, len } => {
                write!(f, "unrecognized chunk {tag} ({len} bytes) at {path}")
            }
        }
    }
}

/// Wraps a successfully decoded value together with the warnings accumulated along the way.
#[derive(Debug, Clone)]
pub struct LoadResult<T> {
    pub value: T,
    pub warnings: Vec<LoadWarning>,
}

impl<T> LoadResult<T> {
    pub fn new(value: T) -> Self {
        LoadResult { value, warnings: Vec::new() }
    }

    pub fn push_warning(&mut self, warning: LoadWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadResult<U> {
        LoadResult { value: f(self.value), warnings: self.warnings }
    }
}
