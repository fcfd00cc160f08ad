//! Errors surfaced by the OBJ/MTL importers.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("Failed to rewind stream for second pass: {0}")]
    Rewind(#[source] io::Error),

    #[error("Face on line {line} has more than {max} vertices")]
    FaceTooLarge { line: usize, max: usize },

    #[error("Too many vertices in OBJ: indices no longer fit in u32")]
    TooManyVertices,
}

pub type ObjResult<T> = Result<T, ObjError>;
