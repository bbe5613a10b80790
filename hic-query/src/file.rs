use std::path::{Path, PathBuf};

use itertools::process_results;
use log::{debug, info};
use ndarray::{Array1, Array2};

use super::attributes::Attributes;
use super::bin_table::{BinTable, BinTableType};
use super::count::{Count, CountType};
use super::dense::{to_dense, DenseMatrix};
use super::errors::{HicError, Result};
use super::genomic_interval::GenomicInterval;
use super::options::FetchOptions;
use super::reader::CoolerReader;
use super::selector::PixelSelector;
use super::table::{BinFrame, ChromTable, JoinedPixelTable, PixelFrame, PixelTable, Table};
use super::uri::parse_cooler_uri;
use super::validation::{is_cooler, is_hic_file, is_multires_file, is_scool_file};

/// Validates a user supplied resolution.
pub fn get_resolution_checked(resolution: Option<i64>) -> Result<Option<u32>> {
    match resolution {
        None => Ok(None),
        Some(res) if res < 0 => Err(HicError::InvalidResolution(String::from("resolution cannot be negative"))),
        Some(res) if res > u32::MAX as i64 => Err(HicError::InvalidResolution(format!(
            "resolution is too large: {} > {}", res, u32::MAX
        ))),
        Some(res) => Ok(Some(res as u32)),
    }
}

/// One resolution of a Hi-C matrix, opened for querying.
#[derive(Debug)]
pub struct HicFile {
    uri: String,
    path: PathBuf,
    reader: CoolerReader,
    bins: BinTable,
    bin_offsets: Array1<u64>,
}

impl HicFile {
    /// Opens `uri`, either a plain path or a `path::/group` cooler URI.
    ///
    /// Multi-resolution files need `resolution` to pick a group; for single
    /// resolution files it is only checked against the stored bin size.
    pub fn open(uri: &str, resolution: Option<i64>) -> Result<HicFile> {
        let resolution = get_resolution_checked(resolution)?;
        let (path, mut group) = parse_cooler_uri(uri);

        if is_hic_file(&path) {
            return Err(HicError::UnsupportedFormat(path));
        }

        if group == "/" && is_multires_file(&path) {
            let res = resolution.ok_or_else(|| HicError::InvalidResolution(format!(
                "{} is a multi-resolution file: a resolution is required", path.display()
            )))?;
            group = format!("/resolutions/{}", res);
            if !is_cooler(&cooler_uri(&path, &group)) {
                return Err(HicError::ResolutionNotFound(res));
            }
        } else if group == "/" && is_scool_file(&path) {
            return Err(HicError::InvalidArgument(format!(
                "{} is a single-cell file: open one of its cells instead", path.display()
            )));
        }

        let uri = cooler_uri(&path, &group);
        if !is_cooler(&uri) {
            return Err(HicError::UnsupportedFormat(path));
        }

        info!("Opening {}", uri);
        let file = HicFile::from_reader(&uri, CoolerReader::open(&path, &group)?)?;

        if let Some(res) = resolution {
            if file.bins.bin_type() == BinTableType::Fixed && file.resolution() != res {
                return Err(HicError::InvalidResolution(format!(
                    "found an unexpected resolution while opening {}: expected {}, found {}",
                    uri, res, file.resolution()
                )));
            }
        }
        Ok(file)
    }

    pub fn from_reader(uri: &str, reader: CoolerReader) -> Result<HicFile> {
        let reference = reader.read_chroms()?;
        let bins = reader.read_bin_table(reference)?;
        let bin_offsets = reader.read_bin_offsets()?;
        if bin_offsets.len() != bins.len() + 1 {
            return Err(HicError::MalformedFile(format!(
                "bin1_offset index has {} entries, expected {}", bin_offsets.len(), bins.len() + 1
            )));
        }
        let nnz = reader.get_n_pixels()?;
        if bin_offsets[bins.len()] as usize != nnz {
            return Err(HicError::MalformedFile(format!(
                "bin1_offset index ends at {}, but there are {} pixels", bin_offsets[bins.len()], nnz
            )));
        }
        debug!("Loaded {} bins over {} chromosomes, {} pixels", bins.len(), bins.reference().len(), nnz);

        let (path, _) = parse_cooler_uri(uri);
        Ok(HicFile { uri: uri.to_string(), path, reader, bins, bin_offsets })
    }

    pub fn is_cooler(&self) -> bool {
        true
    }

    pub fn is_hic(&self) -> bool {
        false
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Bin size in bp, 0 for variable bin tables.
    pub fn resolution(&self) -> u32 {
        self.bins.bin_size()
    }

    pub fn nbins(&self) -> u64 {
        self.bins.len() as u64
    }

    pub fn nchroms(&self) -> usize {
        self.bins.chromosomes().filter(|chrom| !chrom.is_all()).count()
    }

    pub fn bin_table(&self) -> &BinTable {
        &self.bins
    }

    pub fn chromosomes(&self) -> ChromTable {
        ChromTable::from_reference(self.bins.reference())
    }

    pub fn bins(&self) -> BinFrame {
        BinFrame::from_bin_table(&self.bins)
    }

    pub fn attributes(&self) -> Attributes {
        self.reader.read_attributes(&self.bins)
    }

    pub fn avail_normalizations(&self) -> Result<Vec<String>> {
        self.reader.avail_normalizations()
    }

    pub fn fetch(&self, options: &FetchOptions) -> Result<PixelSelector<'_>> {
        let normalization = options.normalization();
        let weights = if normalization.is_none() {
            None
        } else {
            let weights = self.reader.read_weights(normalization.name())?;
            if weights.len() != self.bins.len() {
                return Err(HicError::MalformedFile(format!(
                    "normalization vector {} has {} values, expected {}",
                    normalization, weights.len(), self.bins.len()
                )));
            }
            Some(weights)
        };

        match options.resolve_ranges()? {
            None => Ok(PixelSelector::genome_wide(&self.reader, &self.bins, &self.bin_offsets, weights)),
            Some((range1, range2)) => {
                let reference = self.bins.reference();
                let coord1 = GenomicInterval::parse(reference, range1, options.query_type)?;
                let coord2 = if range1 == range2 {
                    coord1.clone()
                } else {
                    GenomicInterval::parse(reference, range2, options.query_type)?
                };
                PixelSelector::new(&self.reader, &self.bins, &self.bin_offsets, weights, coord1, coord2)
            }
        }
    }

    /// Sparse pixels as a table: 32-bit integer counts, or 64-bit floats when
    /// normalized or asked for.
    pub fn fetch_df(&self, options: &FetchOptions) -> Result<Table> {
        let selector = self.fetch(options)?;
        match options.effective_count_type() {
            CountType::Int => Ok(Table::Int(pixel_frame::<i32>(&selector, options.join)?)),
            CountType::Float => Ok(Table::Float(pixel_frame::<f64>(&selector, options.join)?)),
        }
    }

    pub fn fetch_dense(&self, options: &FetchOptions) -> Result<DenseMatrix> {
        let selector = self.fetch(options)?;
        match options.effective_count_type() {
            CountType::Int => Ok(DenseMatrix::Int(dense_matrix::<i64>(&selector)?)),
            CountType::Float => Ok(DenseMatrix::Float(dense_matrix::<f64>(&selector)?)),
        }
    }
}

fn cooler_uri(path: &Path, group: &str) -> String {
    if group == "/" {
        path.display().to_string()
    } else {
        format!("{}::{}", path.display(), group)
    }
}

fn pixel_frame<N: Count>(selector: &PixelSelector<'_>, join: bool) -> Result<PixelFrame<N>> {
    if join {
        JoinedPixelTable::from_pixels(selector.iter_joined::<N>(), selector.bins().reference())
            .map(PixelFrame::Joined)
    } else {
        PixelTable::from_pixels(selector.iter::<N>()).map(PixelFrame::Sparse)
    }
}

fn dense_matrix<N: Count>(selector: &PixelSelector<'_>) -> Result<Array2<N>> {
    let window = selector.dense_window();
    process_results(selector.iter::<N>(), |pixels| to_dense(&window, pixels))?
}
