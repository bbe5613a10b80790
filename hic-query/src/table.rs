//! Column-oriented tables handed back to callers.
//!
//! Chromosome columns are categorical: 1-based codes into a list of levels,
//! the encoding data-frame runtimes use for factors.

use serde::Serialize;

use super::bin_table::BinTable;
use super::chromosome::Reference;
use super::count::Count;
use super::errors::Result;
use super::pixel::{Pixel, ThinPixel};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Factor {
    codes: Vec<i32>,
    levels: Vec<String>,
}

impl Factor {
    pub fn new(levels: Vec<String>) -> Factor {
        Factor { codes: Vec::new(), levels }
    }

    /// Appends the level of a 0-based chromosome id.
    pub fn push(&mut self, chrom_id: u32) {
        self.codes.push(chrom_id as i32 + 1);
    }

    pub fn codes(&self) -> &[i32] {
        &self.codes
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn label(&self, i: usize) -> Option<&str> {
        let code = *self.codes.get(i)?;
        self.levels.get((code - 1) as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn levels(reference: &Reference) -> Vec<String> {
    reference.iter().map(|c| c.name().to_string()).collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChromTable {
    pub name: Vec<String>,
    pub size: Vec<u32>,
}

#[derive(Serialize)]
pub struct ChromRecord<'a> {
    pub name: &'a str,
    pub size: u32,
}

impl ChromTable {
    pub fn from_reference(reference: &Reference) -> ChromTable {
        let mut table = ChromTable::default();
        for chrom in reference.iter().filter(|c| !c.is_all()) {
            table.name.push(chrom.name().to_string());
            table.size.push(chrom.size());
        }
        table
    }

    pub fn len(&self) -> usize {
        self.name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = ChromRecord<'_>> + '_ {
        self.name.iter().zip(self.size.iter()).map(|(name, &size)| ChromRecord { name, size })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinFrame {
    pub chrom: Factor,
    pub start: Vec<u32>,
    pub end: Vec<u32>,
}

#[derive(Serialize)]
pub struct BinRecord<'a> {
    pub chrom: &'a str,
    pub start: u32,
    pub end: u32,
}

impl BinFrame {
    pub fn from_bin_table(bins: &BinTable) -> BinFrame {
        let mut frame = BinFrame {
            chrom: Factor::new(levels(bins.reference())),
            start: Vec::with_capacity(bins.len()),
            end: Vec::with_capacity(bins.len()),
        };
        for bin in bins.iter() {
            frame.chrom.push(bin.chrom);
            frame.start.push(bin.start);
            frame.end.push(bin.end);
        }
        frame
    }

    pub fn len(&self) -> usize {
        self.start.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = BinRecord<'_>> + '_ {
        (0..self.len()).map(move |i| BinRecord {
            chrom: self.chrom.label(i).unwrap_or(""),
            start: self.start[i],
            end: self.end[i],
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PixelTable<N> {
    pub bin1_id: Vec<i64>,
    pub bin2_id: Vec<i64>,
    pub count: Vec<N>,
}

#[derive(Serialize)]
pub struct PixelRecord<N> {
    pub bin1_id: i64,
    pub bin2_id: i64,
    pub count: N,
}

impl<N: Count> PixelTable<N> {
    pub fn from_pixels<I>(pixels: I) -> Result<PixelTable<N>>
        where I: IntoIterator<Item = Result<ThinPixel<N>>> {
        let mut table = PixelTable { bin1_id: Vec::new(), bin2_id: Vec::new(), count: Vec::new() };
        for p in pixels {
            let p = p?;
            table.bin1_id.push(p.bin1_id as i64);
            table.bin2_id.push(p.bin2_id as i64);
            table.count.push(p.count);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = PixelRecord<N>> + '_ {
        (0..self.len()).map(move |i| PixelRecord {
            bin1_id: self.bin1_id[i],
            bin2_id: self.bin2_id[i],
            count: self.count[i],
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct JoinedPixelTable<N> {
    pub chrom1: Factor,
    pub start1: Vec<u32>,
    pub end1: Vec<u32>,
    pub chrom2: Factor,
    pub start2: Vec<u32>,
    pub end2: Vec<u32>,
    pub count: Vec<N>,
}

#[derive(Serialize)]
pub struct JoinedPixelRecord<'a, N> {
    pub chrom1: &'a str,
    pub start1: u32,
    pub end1: u32,
    pub chrom2: &'a str,
    pub start2: u32,
    pub end2: u32,
    pub count: N,
}

impl<N: Count> JoinedPixelTable<N> {
    pub fn from_pixels<I>(pixels: I, reference: &Reference) -> Result<JoinedPixelTable<N>>
        where I: IntoIterator<Item = Result<Pixel<N>>> {
        let mut table = JoinedPixelTable {
            chrom1: Factor::new(levels(reference)),
            start1: Vec::new(),
            end1: Vec::new(),
            chrom2: Factor::new(levels(reference)),
            start2: Vec::new(),
            end2: Vec::new(),
            count: Vec::new(),
        };
        for p in pixels {
            let p = p?;
            table.chrom1.push(p.bin1.chrom);
            table.start1.push(p.bin1.start);
            table.end1.push(p.bin1.end);
            table.chrom2.push(p.bin2.chrom);
            table.start2.push(p.bin2.start);
            table.end2.push(p.bin2.end);
            table.count.push(p.count);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.count.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = JoinedPixelRecord<'_, N>> + '_ {
        (0..self.len()).map(move |i| JoinedPixelRecord {
            chrom1: self.chrom1.label(i).unwrap_or(""),
            start1: self.start1[i],
            end1: self.end1[i],
            chrom2: self.chrom2.label(i).unwrap_or(""),
            start2: self.start2[i],
            end2: self.end2[i],
            count: self.count[i],
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PixelFrame<N> {
    Sparse(PixelTable<N>),
    Joined(JoinedPixelTable<N>),
}

impl<N: Count> PixelFrame<N> {
    pub fn len(&self) -> usize {
        match self {
            PixelFrame::Sparse(t) => t.len(),
            PixelFrame::Joined(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a table query; integer counts unless a normalization or float counts were requested.
#[derive(Clone, Debug, PartialEq)]
pub enum Table {
    Int(PixelFrame<i32>),
    Float(PixelFrame<f64>),
}

impl Table {
    pub fn len(&self) -> usize {
        match self {
            Table::Int(f) => f.len(),
            Table::Float(f) => f.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bin_table::Bin;
    use pretty_assertions::assert_eq;

    fn reference() -> Reference {
        Reference::new(&["chr1", "chr2"], &[2000, 1000]).unwrap()
    }

    #[test]
    fn chromosome_table_skips_the_all_chromosome() {
        let reference = Reference::new(&["All", "chr1"], &[3, 2000]).unwrap();
        let table = ChromTable::from_reference(&reference);
        assert_eq!(table.name, vec![String::from("chr1")]);
        assert_eq!(table.size, vec![2000]);
    }

    #[test]
    fn bin_frame_uses_one_based_factor_codes() {
        let bins = BinTable::fixed(reference(), 1000).unwrap();
        let frame = BinFrame::from_bin_table(&bins);
        assert_eq!(frame.chrom.codes(), &[1, 1, 2]);
        assert_eq!(frame.chrom.levels(), &[String::from("chr1"), String::from("chr2")]);
        assert_eq!(frame.start, vec![0, 1000, 0]);
        assert_eq!(frame.end, vec![1000, 2000, 1000]);
        assert_eq!(frame.records().nth(2).unwrap().chrom, "chr2");
    }

    #[test]
    fn sparse_table_keeps_stream_order() {
        let pixels = vec![Ok(ThinPixel::new(0, 0, 3)), Ok(ThinPixel::new(0, 2, 1))];
        let table = PixelTable::<i32>::from_pixels(pixels).unwrap();
        assert_eq!(table.bin1_id, vec![0, 0]);
        assert_eq!(table.bin2_id, vec![0, 2]);
        assert_eq!(table.count, vec![3, 1]);
    }

    #[test]
    fn joined_table_carries_coordinates() {
        let bin = |id, chrom, start, end| Bin { id, chrom, start, end };
        let pixels = vec![Ok(Pixel { bin1: bin(1, 0, 1000, 2000), bin2: bin(2, 1, 0, 1000), count: 0.5 })];
        let table = JoinedPixelTable::from_pixels(pixels, &reference()).unwrap();
        assert_eq!(table.chrom1.codes(), &[1]);
        assert_eq!(table.chrom2.codes(), &[2]);
        assert_eq!((table.start1[0], table.end1[0]), (1000, 2000));
        assert_eq!((table.start2[0], table.end2[0]), (0, 1000));
        let record = table.records().next().unwrap();
        assert_eq!((record.chrom1, record.chrom2, record.count), ("chr1", "chr2", 0.5));
    }

    #[test]
    fn errors_in_the_stream_abort_conversion() {
        let pixels = vec![Ok(ThinPixel::new(0, 0, 1)), Err(crate::errors::HicError::MalformedFile(String::from("boom")))];
        assert!(PixelTable::<i64>::from_pixels(pixels).is_err());
    }
}
