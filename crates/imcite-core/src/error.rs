//! Crate-level error type
//!
//! Only two things can actually fail a run: an unreadable or
//! unparseable input bibliography (fatal, raised before any remote
//! query) and file I/O. Remote failures never surface here; the
//! matcher degrades them to "no match".

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read bibliography {path}: {source}")]
    BibliographyRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse bibliography {path}: {source}")]
    BibliographyParse {
        path: PathBuf,
        #[source]
        source: imcite_bibtex::ParseError,
    },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
