//! Dense materialization of sparse pixel streams.
//!
//! Intra-chromosome data only stores the upper triangle (`bin1_id <= bin2_id`),
//! so filling a dense window over a single chromosome has to write every pixel
//! twice: once at its own coordinates and once at its mirror.

use log::debug;
use ndarray::Array2;

use super::count::Count;
use super::errors::{HicError, Result};
use super::pixel::ThinPixel;

/// Translates global bin ids into local row/column indices of a dense window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordMapper {
    row_offset: u64,
    col_offset: u64,
}

impl CoordMapper {
    pub fn new(row_offset: u64, col_offset: u64) -> CoordMapper {
        CoordMapper { row_offset, col_offset }
    }

    pub fn row(&self, bin_id: u64) -> i64 {
        bin_id as i64 - self.row_offset as i64
    }

    pub fn col(&self, bin_id: u64) -> i64 {
        bin_id as i64 - self.col_offset as i64
    }

    /// Rows and columns start at the same bin, so local transposition is global transposition.
    pub fn is_aligned(&self) -> bool {
        self.row_offset == self.col_offset
    }
}

/// Allocates zero-filled matrices sized from query spans.
#[derive(Clone, Copy, Debug)]
pub struct MatrixBuilder {
    bin_size: u32,
    total_bins: usize,
}

impl MatrixBuilder {
    pub fn new(bin_size: u32, total_bins: usize) -> MatrixBuilder {
        MatrixBuilder { bin_size, total_bins }
    }

    /// Number of bins covered by `span` bp; a span of 0 stands for the whole matrix.
    pub fn dim(&self, span: u64) -> usize {
        if span == 0 || self.bin_size == 0 {
            return self.total_bins;
        }
        let bin_size = self.bin_size as u64;
        ((span + bin_size - 1) / bin_size) as usize
    }

    pub fn shape(&self, span1: u64, span2: u64) -> (usize, usize) {
        (self.dim(span1), self.dim(span2))
    }

    pub fn build<N: Count>(&self, span1: u64, span2: u64) -> Result<Array2<N>> {
        let (rows, cols) = self.shape(span1, span2);
        zeros(rows, cols)
    }
}

/// Zero-filled matrix; failure to allocate is reported instead of aborting.
pub fn zeros<N: Count>(rows: usize, cols: usize) -> Result<Array2<N>> {
    let size = rows.checked_mul(cols).ok_or(HicError::Allocation { rows, cols })?;
    let mut buffer: Vec<N> = Vec::new();
    buffer.try_reserve_exact(size).map_err(|_| HicError::Allocation { rows, cols })?;
    buffer.resize(size, N::zero());
    Array2::from_shape_vec((rows, cols), buffer).map_err(|_| HicError::Allocation { rows, cols })
}

/// Geometry of a dense query, resolved once before the fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DenseWindow {
    pub row_offset: u64,
    pub col_offset: u64,
    pub num_rows: usize,
    pub num_cols: usize,
    pub mirror: bool,
}

impl DenseWindow {
    pub fn mapper(&self) -> CoordMapper {
        CoordMapper::new(self.row_offset, self.col_offset)
    }
}

/// Single-pass writer placing pixels (and, for intra-chromosome windows, their
/// mirrors) into a pre-zeroed matrix.
pub struct SymmetricFill<N> {
    matrix: Array2<N>,
    mapper: CoordMapper,
    mirror: bool,
}

impl<N: Count> SymmetricFill<N> {
    pub fn new(matrix: Array2<N>, mapper: CoordMapper, mirror: bool) -> SymmetricFill<N> {
        SymmetricFill { matrix, mapper, mirror }
    }

    pub fn push(&mut self, p: &ThinPixel<N>) {
        let i1 = self.mapper.row(p.bin1_id);
        let i2 = self.mapper.col(p.bin2_id);
        self.set(i1, i2, p.count);

        if !self.mirror {
            return;
        }

        let (num_rows, num_cols) = self.dims();
        let delta = i2 - i1;
        if self.mapper.is_aligned() && delta >= 0 && delta < num_rows && i1 < num_cols && i2 < num_rows {
            self.set(i2, i1, p.count);
            return;
        }

        // the transpose lives outside the natural axis: place it from the swapped pair
        let i3 = self.mapper.row(p.bin2_id);
        let i4 = self.mapper.col(p.bin1_id);
        self.set(i3, i4, p.count);
    }

    pub fn fill<I>(mut self, pixels: I) -> Array2<N>
        where I: IntoIterator<Item = ThinPixel<N>> {
        for p in pixels {
            self.push(&p);
        }
        self.matrix
    }

    pub fn finish(self) -> Array2<N> {
        self.matrix
    }

    fn dims(&self) -> (i64, i64) {
        let (rows, cols) = self.matrix.dim();
        (rows as i64, cols as i64)
    }

    fn set(&mut self, i: i64, j: i64, count: N) {
        let (num_rows, num_cols) = self.dims();
        if i >= 0 && i < num_rows && j >= 0 && j < num_cols {
            self.matrix[[i as usize, j as usize]] = count;
        }
    }
}

/// Dense query result; integer counts are widened to 64 bits.
#[derive(Clone, Debug, PartialEq)]
pub enum DenseMatrix {
    Int(Array2<i64>),
    Float(Array2<f64>),
}

impl DenseMatrix {
    pub fn dim(&self) -> (usize, usize) {
        match self {
            DenseMatrix::Int(m) => m.dim(),
            DenseMatrix::Float(m) => m.dim(),
        }
    }
}

/// Allocates the window's matrix and fills it from `pixels` in one pass.
pub fn to_dense<N, I>(window: &DenseWindow, pixels: I) -> Result<Array2<N>>
    where N: Count, I: IntoIterator<Item = ThinPixel<N>> {
    debug!("Materializing {}x{} matrix (row offset {}, col offset {}, mirror {})",
           window.num_rows, window.num_cols, window.row_offset, window.col_offset, window.mirror);
    let matrix = zeros(window.num_rows, window.num_cols)?;
    Ok(SymmetricFill::new(matrix, window.mapper(), window.mirror).fill(pixels))
}
