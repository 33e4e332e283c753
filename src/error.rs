use std::path::PathBuf;

/// Fatal failures of a generation pass.
///
/// Validation problems with individual declarations are not errors; they go
/// through [`crate::diag::Diagnostics`] and the pass carries on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: syn::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("glob pattern matched no files: {0}")]
    NoMatch(String),
    #[error(transparent)]
    Glob(#[from] glob::GlobError),
    #[error("no output directory: OUT_DIR is not set and none was configured")]
    MissingOutDir,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
