use std::path::{Path, PathBuf};

use log::info;

use super::chromosome::Reference;
use super::errors::{HicError, Result};
use super::file::HicFile;
use super::reader::CoolerReader;
use super::table::ChromTable;
use super::validation::is_multires_file;

/// A `.mcool` file: the same matrix binned at several resolutions.
#[derive(Debug)]
pub struct MultiResFile {
    path: PathBuf,
    reference: Reference,
    resolutions: Vec<u32>,
}

impl MultiResFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<MultiResFile> {
        let path = path.as_ref().to_path_buf();
        if !is_multires_file(&path) {
            return Err(HicError::UnsupportedFormat(path));
        }

        let file = hdf5::File::open(&path)?;
        let mut resolutions = Vec::new();
        for name in file.group("resolutions")?.member_names()? {
            let res = name.parse::<u32>().map_err(|_| HicError::MalformedFile(format!(
                "\"/resolutions/{}\" is not a valid resolution", name
            )))?;
            resolutions.push(res);
        }
        resolutions.sort_unstable();

        let first = resolutions.first().ok_or_else(|| HicError::MalformedFile(format!(
            "{} does not contain any resolution", path.display()
        )))?;
        let reader = CoolerReader::open(&path, &format!("/resolutions/{}", first))?;
        let reference = reader.read_chroms()?;

        info!("Opened {} with {} resolutions", path.display(), resolutions.len());
        Ok(MultiResFile { path, reference, resolutions })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn chromosomes(&self) -> ChromTable {
        ChromTable::from_reference(&self.reference)
    }

    /// Available resolutions, finest first.
    pub fn resolutions(&self) -> &[u32] {
        &self.resolutions
    }

    pub fn open_resolution(&self, resolution: u32) -> Result<HicFile> {
        if !self.resolutions.contains(&resolution) {
            return Err(HicError::ResolutionNotFound(resolution));
        }
        HicFile::open(&self.path.display().to_string(), Some(resolution as i64))
    }
}
