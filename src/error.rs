use std::{io, path::PathBuf};
use thiserror::Error;

use crate::{aws::ProviderError, ini::FormatError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("credentials file not found at: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("I/O error accessing {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("invalid expiration {value:?} in [{section}]")]
    Expiry {
        section: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unable to find current user's home directory")]
    Home,

    #[error("{0}")]
    InvalidInput(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
