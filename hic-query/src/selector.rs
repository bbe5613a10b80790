use std::marker::PhantomData;
use std::ops::Range;

use itertools::Itertools;
use log::debug;
use ndarray::Array1;

use super::balancing::Weights;
use super::bin_table::{BinTable, BinTableType};
use super::count::Count;
use super::dense::{DenseWindow, MatrixBuilder};
use super::errors::{HicError, Result};
use super::genomic_interval::GenomicInterval;
use super::pixel::{Pixel, ThinPixel};
use super::reader::CoolerReader;

pub const CHUNKSIZE: usize = 1_000_000;

#[derive(Clone, Debug, PartialEq)]
enum Query {
    GenomeWide,
    Intra,
    Inter,
}

/// Resolved pixel query over one cooler group.
///
/// Yields the stored (upper-triangle) pixels needed to answer the query, in
/// non-decreasing `bin1_id` order, reading the `pixels` group lazily in chunks.
#[derive(Clone, Debug)]
pub struct PixelSelector<'a> {
    reader: &'a CoolerReader,
    bins: &'a BinTable,
    bin_offsets: &'a Array1<u64>,
    weights: Option<Weights>,
    coord1: Option<GenomicInterval>,
    coord2: Option<GenomicInterval>,
    range1: Range<u64>,
    range2: Range<u64>,
    query: Query,
    chunksize: usize,
}

impl<'a> PixelSelector<'a> {
    pub fn genome_wide(reader: &'a CoolerReader, bins: &'a BinTable, bin_offsets: &'a Array1<u64>,
                       weights: Option<Weights>) -> PixelSelector<'a> {
        let all = 0..bins.len() as u64;
        PixelSelector {
            reader,
            bins,
            bin_offsets,
            weights,
            coord1: None,
            coord2: None,
            range1: all.clone(),
            range2: all,
            query: Query::GenomeWide,
            chunksize: CHUNKSIZE,
        }
    }

    pub fn new(reader: &'a CoolerReader, bins: &'a BinTable, bin_offsets: &'a Array1<u64>,
               weights: Option<Weights>, coord1: GenomicInterval, coord2: GenomicInterval)
               -> Result<PixelSelector<'a>> {
        let chrom1 = coord1.chrom().id();
        let chrom2 = coord2.chrom().id();
        if chrom1 > chrom2 {
            return Err(HicError::InvalidRange(format!(
                "query {}; {} overlaps with the lower triangle of the matrix", coord1, coord2
            )));
        }

        let range1 = bins.bin_range(&coord1)?;
        let range2 = bins.bin_range(&coord2)?;
        let query = if chrom1 == chrom2 { Query::Intra } else { Query::Inter };
        debug!("Selecting bins {:?} x {:?} ({:?})", range1, range2, query);

        Ok(PixelSelector {
            reader,
            bins,
            bin_offsets,
            weights,
            coord1: Some(coord1),
            coord2: Some(coord2),
            range1,
            range2,
            query,
            chunksize: CHUNKSIZE,
        })
    }

    pub fn with_chunksize(mut self, chunksize: usize) -> PixelSelector<'a> {
        self.chunksize = chunksize.max(1);
        self
    }

    pub fn bins(&self) -> &'a BinTable {
        self.bins
    }

    /// `None` for genome-wide queries.
    pub fn coord1(&self) -> Option<&GenomicInterval> {
        self.coord1.as_ref()
    }

    pub fn coord2(&self) -> Option<&GenomicInterval> {
        self.coord2.as_ref()
    }

    pub fn bin_range1(&self) -> Range<u64> {
        self.range1.clone()
    }

    pub fn bin_range2(&self) -> Range<u64> {
        self.range2.clone()
    }

    pub fn is_normalized(&self) -> bool {
        self.weights.is_some()
    }

    /// Both dimensions lie on the same chromosome (or span the whole genome).
    pub fn is_symmetric(&self) -> bool {
        self.query != Query::Inter
    }

    pub fn dense_window(&self) -> DenseWindow {
        let builder = MatrixBuilder::new(self.bins.bin_size(), self.bins.len());
        let (num_rows, num_cols) = match (self.bins.bin_type(), &self.coord1, &self.coord2) {
            (BinTableType::Fixed, Some(c1), Some(c2)) => builder.shape(self.span(c1, &self.range1), self.span(c2, &self.range2)),
            (BinTableType::Variable, Some(_), Some(_)) => (range_len(&self.range1), range_len(&self.range2)),
            _ => builder.shape(0, 0),
        };

        DenseWindow {
            row_offset: self.range1.start,
            col_offset: self.range2.start,
            num_rows,
            num_cols,
            mirror: self.is_symmetric(),
        }
    }

    pub fn iter<N: Count>(&self) -> PixelIter<'_, N> {
        PixelIter {
            selector: self,
            spans: self.pixel_spans(),
            span_idx: 0,
            current: 0,
            chunk: None,
            pos: 0,
            done: false,
            _count: PhantomData,
        }
    }

    /// Pixels joined with the coordinates of their bins.
    pub fn iter_joined<N: Count>(&self) -> impl Iterator<Item = Result<Pixel<N>>> + '_ {
        let bins = self.bins;
        self.iter::<N>().map(move |p| {
            let p = p?;
            match (bins.get(p.bin1_id), bins.get(p.bin2_id)) {
                (Some(bin1), Some(bin2)) => Ok(Pixel { bin1, bin2, count: p.count }),
                _ => Err(HicError::MalformedFile(format!(
                    "pixel ({}, {}) refers to a bin outside of the bin table", p.bin1_id, p.bin2_id
                ))),
            }
        })
    }

    /// Measured from the start of the first overlapped bin, so the span covers whole bins.
    fn span(&self, coord: &GenomicInterval, range: &Range<u64>) -> u64 {
        let first_start = self.bins.get(range.start).map(|b| b.start).unwrap_or_else(|| coord.start());
        (coord.end() - first_start) as u64
    }

    fn accept(&self, bin1_id: u64, bin2_id: u64) -> bool {
        match self.query {
            Query::GenomeWide => true,
            Query::Inter => self.range1.contains(&bin1_id) && self.range2.contains(&bin2_id),
            Query::Intra => {
                (self.range1.contains(&bin1_id) && self.range2.contains(&bin2_id))
                    || (self.range2.contains(&bin1_id) && self.range1.contains(&bin2_id))
            }
        }
    }

    /// Pixel index ranges whose rows may hold accepted pixels, ordered by row.
    fn pixel_spans(&self) -> Vec<(usize, usize)> {
        let rows = match self.query {
            Query::GenomeWide | Query::Inter => vec![self.range1.clone()],
            Query::Intra => merge_ranges(self.range1.clone(), self.range2.clone()),
        };

        rows.into_iter()
            .filter(|r| r.start < r.end)
            .filter_map(|r| {
                let lo = *self.bin_offsets.get(r.start as usize)? as usize;
                let hi = *self.bin_offsets.get(r.end as usize)? as usize;
                Some((lo, hi))
            })
            .filter(|(lo, hi)| lo < hi)
            .collect()
    }
}

fn range_len(r: &Range<u64>) -> usize {
    (r.end - r.start) as usize
}

fn merge_ranges(a: Range<u64>, b: Range<u64>) -> Vec<Range<u64>> {
    let (first, second) = if a.start <= b.start { (a, b) } else { (b, a) };
    if second.start <= first.end {
        vec![first.start..first.end.max(second.end)]
    } else {
        vec![first, second]
    }
}

type Chunk = (Array1<u64>, Array1<u64>, Array1<f64>);

/// Lazy, single-pass pixel stream of a [`PixelSelector`].
pub struct PixelIter<'a, N> {
    selector: &'a PixelSelector<'a>,
    spans: Vec<(usize, usize)>,
    span_idx: usize,
    current: usize,
    chunk: Option<Chunk>,
    pos: usize,
    done: bool,
    _count: PhantomData<N>,
}

impl<'a, N: Count> PixelIter<'a, N> {
    fn load_next_chunk(&mut self) -> Result<bool> {
        while self.span_idx < self.spans.len() {
            let (lo, hi) = self.spans[self.span_idx];
            let start = self.current.max(lo);
            if start >= hi {
                self.span_idx += 1;
                continue;
            }
            let end = hi.min(start + self.selector.chunksize);
            self.chunk = Some(self.selector.reader.read_pixel_chunk(start, end)?);
            self.pos = 0;
            self.current = end;
            return Ok(true);
        }
        Ok(false)
    }

    /// `Ok(None)` drops the pixel; a count that `N` cannot hold fails the query.
    fn convert(&self, bin1_id: u64, bin2_id: u64, raw: f64) -> Result<Option<ThinPixel<N>>> {
        let value = match &self.selector.weights {
            Some(weights) => weights.balance(bin1_id, bin2_id, raw),
            None => raw,
        };
        if !value.is_finite() {
            return Ok(None);
        }
        match N::from_f64(value) {
            Some(count) => Ok(Some(ThinPixel::new(bin1_id, bin2_id, count))),
            None => Err(HicError::InvalidCount(format!(
                "pixel ({}, {}) has count {} which cannot be stored as {}; use count_type \"float\"",
                bin1_id, bin2_id, value, std::any::type_name::<N>()
            ))),
        }
    }
}

impl<'a, N: Count> Iterator for PixelIter<'a, N> {
    type Item = Result<ThinPixel<N>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if let Some((bin1, bin2, counts)) = &self.chunk {
                while self.pos < bin1.len() {
                    let i = self.pos;
                    self.pos += 1;
                    let (b1, b2, raw) = (bin1[i], bin2[i], counts[i]);
                    if !self.selector.accept(b1, b2) {
                        continue;
                    }
                    match self.convert(b1, b2, raw) {
                        Ok(Some(p)) => return Some(Ok(p)),
                        Ok(None) => {}
                        Err(e) => {
                            self.done = true;
                            return Some(Err(e));
                        }
                    }
                }
            }

            match self.load_next_chunk() {
                Ok(true) => {}
                Ok(false) => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Collects a fallible pixel stream into plain pixels, stopping at the first error.
pub fn collect_pixels<N, I>(pixels: I) -> Result<Vec<ThinPixel<N>>>
    where I: Iterator<Item = Result<ThinPixel<N>>> {
    itertools::process_results(pixels, |iter| iter.collect_vec())
}
