pub mod attributes;
pub mod balancing;
pub mod bin_table;
pub mod chromosome;
pub mod count;
pub mod dense;
pub mod errors;
pub mod file;
pub mod genomic_interval;
pub mod multires;
pub mod options;
pub mod pixel;
pub mod reader;
pub mod selector;
pub mod singlecell;
pub mod table;
pub mod uri;
pub mod validation;

pub use self::attributes::{AttrValue, Attributes};
pub use self::balancing::{Normalization, WeightType, Weights};
pub use self::bin_table::{Bin, BinTable, BinTableType};
pub use self::chromosome::{Chromosome, Reference};
pub use self::count::{Count, CountType};
pub use self::dense::{to_dense, CoordMapper, DenseMatrix, DenseWindow, MatrixBuilder, SymmetricFill};
pub use self::errors::{HicError, Result};
pub use self::file::HicFile;
pub use self::genomic_interval::{GenomicInterval, QueryType};
pub use self::multires::MultiResFile;
pub use self::options::FetchOptions;
pub use self::pixel::{Pixel, ThinPixel};
pub use self::singlecell::SingleCellFile;
pub use self::table::{BinFrame, ChromTable, Factor, JoinedPixelTable, PixelFrame, PixelTable, Table};
pub use self::validation::{is_cooler, is_hic_file, is_multires_file, is_scool_file};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Number of bins of the matrix at `uri`, see [`HicFile::open`].
pub fn nbins(uri: &str, resolution: Option<i64>) -> Result<u64> {
    HicFile::open(uri, resolution).map(|f| f.nbins())
}
