use std::fmt;
use std::ops::Range;

use itertools::Itertools;
use ndarray::Array1;

use super::chromosome::{Chromosome, Reference};
use super::errors::{HicError, Result};
use super::genomic_interval::GenomicInterval;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinTableType {
    Fixed,
    Variable,
}

impl fmt::Display for BinTableType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinTableType::Fixed => write!(f, "fixed"),
            BinTableType::Variable => write!(f, "variable"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bin {
    pub id: u64,
    pub chrom: u32,
    pub start: u32,
    pub end: u32,
}

#[derive(Clone, Debug)]
pub struct BinTable {
    reference: Reference,
    bin_type: BinTableType,
    bin_size: u32,
    chrom_offsets: Array1<u64>,
    chrom_ids: Array1<u32>,
    starts: Array1<u32>,
    ends: Array1<u32>,
}

impl BinTable {
    pub fn fixed(reference: Reference, bin_size: u32) -> Result<BinTable> {
        if bin_size == 0 {
            return Err(HicError::InvalidResolution(String::from("resolution cannot be 0")));
        }

        let chrom_offsets = build_chrom_offsets(bin_size, &reference);
        let n_bins = chrom_offsets[chrom_offsets.len() - 1] as usize;

        let mut ind = 0_usize;
        let mut chrom_ids = Array1::<u32>::default(n_bins);
        let mut starts = Array1::<u32>::default(n_bins);
        let mut ends = Array1::<u32>::default(n_bins);

        for chrom in reference.iter() {
            let n_bins = n_bins_for(chrom.size(), bin_size);
            for (prev, next) in (0..=n_bins)
                .map(|x| if x != n_bins { x * bin_size } else { chrom.size() })
                .tuple_windows() {
                chrom_ids[ind] = chrom.id();
                starts[ind] = prev;
                ends[ind] = next;
                ind += 1;
            }
        }

        Ok(BinTable { reference, bin_type: BinTableType::Fixed, bin_size, chrom_offsets, chrom_ids, starts, ends })
    }

    pub fn variable(reference: Reference, chrom_ids: Array1<u32>, starts: Array1<u32>, ends: Array1<u32>)
        -> Result<BinTable> {
        if chrom_ids.len() != starts.len() || starts.len() != ends.len() {
            return Err(HicError::MalformedFile(String::from("bin table columns have different lengths")));
        }

        let mut chrom_offsets = Array1::<u64>::zeros(reference.len() + 1);
        for (i, &chrom_id) in chrom_ids.iter().enumerate() {
            if chrom_id as usize >= reference.len() {
                return Err(HicError::MalformedFile(format!("bin #{} refers to unknown chromosome id {}", i, chrom_id)));
            }
            if starts[i] >= ends[i] {
                return Err(HicError::MalformedFile(format!("bin #{} has start >= end", i)));
            }
            if i > 0 && (chrom_id < chrom_ids[i - 1] || (chrom_id == chrom_ids[i - 1] && starts[i] < ends[i - 1])) {
                return Err(HicError::MalformedFile(String::from("bin table is not sorted")));
            }
            chrom_offsets[chrom_id as usize + 1] += 1;
        }
        for i in 1..chrom_offsets.len() {
            chrom_offsets[i] += chrom_offsets[i - 1];
        }

        Ok(BinTable { reference, bin_type: BinTableType::Variable, bin_size: 0, chrom_offsets, chrom_ids, starts, ends })
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn chromosomes(&self) -> std::slice::Iter<Chromosome> {
        self.reference.iter()
    }

    pub fn bin_type(&self) -> BinTableType {
        self.bin_type
    }

    /// Zero for variable bin tables.
    pub fn bin_size(&self) -> u32 {
        self.bin_size
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<Bin> {
        let i = id as usize;
        if i >= self.len() {
            return None;
        }
        Some(Bin { id, chrom: self.chrom_ids[i], start: self.starts[i], end: self.ends[i] })
    }

    pub fn iter(&self) -> impl Iterator<Item = Bin> + '_ {
        (0..self.len() as u64).filter_map(move |id| self.get(id))
    }

    pub fn chrom_offset(&self, chrom_id: u32) -> u64 {
        self.chrom_offsets[chrom_id as usize]
    }

    pub fn chrom_bins(&self, chrom_id: u32) -> Range<u64> {
        self.chrom_offsets[chrom_id as usize]..self.chrom_offsets[chrom_id as usize + 1]
    }

    /// Global id of the bin overlapping `pos`; `pos` must lie within the chromosome.
    pub fn bin_id_at(&self, chrom: &Chromosome, pos: u32) -> Result<u64> {
        if pos >= chrom.size() {
            return Err(HicError::InvalidRange(format!(
                "position {} is past the end of {} ({})", pos, chrom.name(), chrom.size()
            )));
        }

        let bins = self.chrom_bins(chrom.id());
        match self.bin_type {
            BinTableType::Fixed => Ok(bins.start + (pos / self.bin_size) as u64),
            BinTableType::Variable => {
                let ends = &self.ends.as_slice().unwrap_or(&[])[bins.start as usize..bins.end as usize];
                let offset = ends.partition_point(|&end| end <= pos);
                if offset == ends.len() {
                    return Err(HicError::InvalidRange(format!("no bin overlaps {}:{}", chrom.name(), pos)));
                }
                Ok(bins.start + offset as u64)
            }
        }
    }

    /// Half-open range of global bin ids overlapping the interval.
    pub fn bin_range(&self, interval: &GenomicInterval) -> Result<Range<u64>> {
        let first = self.bin_id_at(interval.chrom(), interval.start())?;
        let last = self.bin_id_at(interval.chrom(), interval.end() - 1)?;
        Ok(first..last + 1)
    }
}

fn n_bins_for(size: u32, bin_size: u32) -> u32 {
    ((size as u64 + bin_size as u64 - 1) / bin_size as u64) as u32
}

fn build_chrom_offsets(bin_size: u32, reference: &Reference) -> Array1<u64> {
    let mut count = 0_u64;
    let mut chrom_offsets: Array1<u64> = Array1::default(reference.len() + 1);
    for (i, chrom) in reference.iter().enumerate() {
        chrom_offsets[i] = count;
        count += n_bins_for(chrom.size(), bin_size) as u64;
    }
    chrom_offsets[reference.len()] = count;
    chrom_offsets
}
