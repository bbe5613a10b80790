use super::bin_table::Bin;

/// Sparse pixel as stored in the `pixels` group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThinPixel<N> {
    pub bin1_id: u64,
    pub bin2_id: u64,
    pub count: N,
}

impl<N> ThinPixel<N> {
    pub fn new(bin1_id: u64, bin2_id: u64, count: N) -> ThinPixel<N> {
        ThinPixel { bin1_id, bin2_id, count }
    }
}

/// Pixel joined with the genomic coordinates of both of its bins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pixel<N> {
    pub bin1: Bin,
    pub bin2: Bin,
    pub count: N,
}
