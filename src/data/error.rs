use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Line-level syntax errors
// ---------------------------------------------------------------------------

/// Why a single line could not be interpreted.
///
/// Produced by the line-level helpers ([`WfReader::extract_value`],
/// [`WfReader::extract_window`]) which do not know where the line came from;
/// the reader wraps it into [`WfError::Malformed`] together with the line number.
///
/// [`WfReader::extract_value`]: super::reader::WfReader::extract_value
/// [`WfReader::extract_window`]: super::reader::WfReader::extract_window
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("expected a `key{0}value` line but found no '{0}'")]
    MissingSeparator(char),
    #[error("missing value")]
    EmptyValue,
    #[error("'{0}' is not a valid count")]
    InvalidCount(String),
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("vector opened inside another vector")]
    NestedVector,
    #[error("vector closed without being opened")]
    UnmatchedVectorEnd,
    #[error("vector opened but never closed")]
    UnterminatedVector,
    #[error("line is not valid UTF-8 (first bad byte at offset {0})")]
    InvalidUtf8(usize),
}

// ---------------------------------------------------------------------------
// Syntax configuration errors
// ---------------------------------------------------------------------------

/// A [`WfSyntax`](super::token::WfSyntax) whose tokens cannot be told apart.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxConfigError {
    #[error("vector markers must not be blank")]
    BlankVectorMarker,
    #[error("vector start and end markers are both '{0}'")]
    SameVectorMarkers(String),
    #[error("vector markers must not contain the value separator '{0}'")]
    MarkerContainsSeparator(char),
    #[error("property and value separators are both '{0}'")]
    SameSeparators(char),
}

// ---------------------------------------------------------------------------
// Read errors
// ---------------------------------------------------------------------------

/// Error type for reading a WF file.
#[derive(Debug, thiserror::Error)]
pub enum WfError {
    #[error("the file {} does not exist", .path.display())]
    NotFound { path: PathBuf },
    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: SyntaxError,
    },
    #[error("unexpected end of input after line {line} while reading {expected}")]
    PrematureEnd { line: usize, expected: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WfError {
    /// 1-based line number the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            WfError::Malformed { line, .. } | WfError::PrematureEnd { line, .. } => Some(*line),
            WfError::NotFound { .. } | WfError::Io(_) => None,
        }
    }
}

pub type WfResult<T> = Result<T, WfError>;
