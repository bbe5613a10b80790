use std::path::{Path, PathBuf};

use log::info;

use super::attributes::Attributes;
use super::bin_table::BinTable;
use super::errors::{HicError, Result};
use super::file::HicFile;
use super::reader::CoolerReader;
use super::table::{BinFrame, ChromTable};
use super::validation::is_scool_file;

/// A `.scool` file: one cooler per cell sharing a single bin table.
#[derive(Debug)]
pub struct SingleCellFile {
    path: PathBuf,
    reader: CoolerReader,
    bins: BinTable,
    cells: Vec<String>,
}

impl SingleCellFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SingleCellFile> {
        let path = path.as_ref().to_path_buf();
        if !is_scool_file(&path) {
            return Err(HicError::UnsupportedFormat(path));
        }

        let reader = CoolerReader::open(&path, "/")?;
        let bins = reader.read_bin_table(reader.read_chroms()?)?;
        let cells = reader.get_root().group("cells")?.member_names()?;

        info!("Opened {} with {} cells", path.display(), cells.len());
        Ok(SingleCellFile { path, reader, bins, cells })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn resolution(&self) -> u32 {
        self.bins.bin_size()
    }

    pub fn nbins(&self) -> u64 {
        self.bins.len() as u64
    }

    pub fn chromosomes(&self) -> ChromTable {
        ChromTable::from_reference(self.bins.reference())
    }

    pub fn bins(&self) -> BinFrame {
        BinFrame::from_bin_table(&self.bins)
    }

    /// Cooler attributes of the root group followed by the number of cells.
    pub fn attributes(&self) -> Attributes {
        let mut attrs = self.reader.read_attributes(&self.bins);
        let ncells = self.reader.read_attr("ncells").unwrap_or_else(|| (self.cells.len() as i64).into());
        attrs.push("ncells", ncells);
        attrs
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn open_cell(&self, cell: &str) -> Result<HicFile> {
        if !self.cells.iter().any(|c| c == cell) {
            return Err(HicError::UnknownCell(cell.to_string()));
        }
        HicFile::open(&format!("{}::/cells/{}", self.path.display(), cell), None)
    }
}
