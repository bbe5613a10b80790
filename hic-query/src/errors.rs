use std::{error, fmt};
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, HicError>;

#[derive(Debug)]
pub enum HicError {
    InvalidResolution(String),
    ResolutionNotFound(u32),
    InvalidRange(String),
    UnknownChromosome(String),
    UnknownNormalization(String),
    UnknownCell(String),
    InvalidArgument(String),
    InvalidCount(String),
    UnsupportedFormat(PathBuf),
    MalformedFile(String),
    Allocation { rows: usize, cols: usize },
    Hdf5(hdf5::Error),
}

impl fmt::Display for HicError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HicError::InvalidResolution(msg) => write!(f, "{}", msg),
            HicError::ResolutionNotFound(res) => write!(f, "Resolution {} does not exist.", res),
            HicError::InvalidRange(msg) => write!(f, "Invalid genomic range: {}", msg),
            HicError::UnknownChromosome(name) => write!(f, "Unable to find chromosome named \"{}\".", name),
            HicError::UnknownNormalization(name) => write!(f, "Unable to find normalization \"{}\".", name),
            HicError::UnknownCell(name) => write!(f, "Unable to find cell \"{}\".", name),
            HicError::InvalidArgument(msg) => write!(f, "{}", msg),
            HicError::InvalidCount(msg) => write!(f, "Invalid count: {}", msg),
            HicError::UnsupportedFormat(path) => {
                write!(f, "\"{}\" is not in a supported format (.cool, .mcool, .scool).", path.display())
            }
            HicError::MalformedFile(msg) => write!(f, "Malformed file: {}", msg),
            HicError::Allocation { rows, cols } => {
                write!(f, "Unable to allocate a dense matrix of shape {}x{}.", rows, cols)
            }
            HicError::Hdf5(e) => write!(f, "HDF5 error: {}", e),
        }
    }
}

impl error::Error for HicError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            HicError::Hdf5(e) => Some(e),
            _ => None,
        }
    }
}

impl From<hdf5::Error> for HicError {
    fn from(e: hdf5::Error) -> Self {
        HicError::Hdf5(e)
    }
}
