use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use super::chromosome::{Chromosome, Reference};
use super::errors::{HicError, Result};

/// Coordinate syntax accepted for range queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum QueryType {
    #[serde(rename = "UCSC")]
    Ucsc,
    #[serde(rename = "BED")]
    Bed,
}

impl Default for QueryType {
    fn default() -> Self {
        QueryType::Ucsc
    }
}

impl FromStr for QueryType {
    type Err = HicError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "UCSC" => Ok(QueryType::Ucsc),
            "BED" => Ok(QueryType::Bed),
            _ => Err(HicError::InvalidArgument(format!(
                "query_type should be either \"UCSC\" or \"BED\", found \"{}\"", s
            ))),
        }
    }
}

/// Half-open, 0-based interval on a single chromosome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenomicInterval {
    chrom: Chromosome,
    start: u32,
    end: u32,
}

impl GenomicInterval {
    pub fn new(chrom: Chromosome, start: u32, end: u32) -> Result<GenomicInterval> {
        if start >= end {
            return Err(HicError::InvalidRange(format!(
                "{}:{}-{}: start position should be smaller than the end position", chrom.name(), start, end
            )));
        }
        if end > chrom.size() {
            return Err(HicError::InvalidRange(format!(
                "{}:{}-{}: end position is past the end of the chromosome ({})",
                chrom.name(), start, end, chrom.size()
            )));
        }
        Ok(GenomicInterval { chrom, start, end })
    }

    pub fn whole(chrom: &Chromosome) -> Result<GenomicInterval> {
        GenomicInterval::new(chrom.clone(), 0, chrom.size())
    }

    pub fn parse(reference: &Reference, query: &str, query_type: QueryType) -> Result<GenomicInterval> {
        let query = query.trim();
        if query.is_empty() {
            return Err(HicError::InvalidRange(String::from("query is empty")));
        }

        // chromosome names are allowed to contain ':' and '-'
        if let Ok(chrom) = reference.find(query) {
            return GenomicInterval::whole(chrom);
        }

        match query_type {
            QueryType::Ucsc => GenomicInterval::parse_ucsc(reference, query),
            QueryType::Bed => GenomicInterval::parse_bed(reference, query),
        }
    }

    pub fn chrom(&self) -> &Chromosome {
        &self.chrom
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn span(&self) -> u32 {
        self.end - self.start
    }

    fn parse_ucsc(reference: &Reference, query: &str) -> Result<GenomicInterval> {
        lazy_static! {
            static ref RE_UCSC: Regex = Regex::new(r"^(?P<chrom>.+):(?P<start>[0-9,]+)-(?P<end>[0-9,]+)$").unwrap();
        }

        let caps = match RE_UCSC.captures(query) {
            Some(caps) => caps,
            None if !query.contains(':') => return Err(HicError::UnknownChromosome(query.to_string())),
            None => return Err(HicError::InvalidRange(format!(
                "unable to parse \"{}\" as a UCSC query (expected chrom:start-end)", query
            ))),
        };
        let chrom = reference.find(&caps["chrom"])?;
        let start = parse_position(&caps["start"], query)?;
        let end = parse_position(&caps["end"], query)?;
        GenomicInterval::new(chrom.clone(), start, end)
    }

    fn parse_bed(reference: &Reference, query: &str) -> Result<GenomicInterval> {
        let toks: Vec<&str> = query.split_whitespace().collect();
        match toks.as_slice() {
            [name] => GenomicInterval::whole(reference.find(name)?),
            [name, start, end] => {
                let chrom = reference.find(name)?;
                let start = parse_position(start, query)?;
                let end = parse_position(end, query)?;
                GenomicInterval::new(chrom.clone(), start, end)
            }
            _ => Err(HicError::InvalidRange(format!(
                "unable to parse \"{}\" as a BED query (expected chrom\\tstart\\tend)", query
            ))),
        }
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom.name(), self.start, self.end)
    }
}

fn parse_position(tok: &str, query: &str) -> Result<u32> {
    tok.replace(',', "")
        .parse::<u32>()
        .map_err(|_| HicError::InvalidRange(format!("invalid position \"{}\" in \"{}\"", tok, query)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn reference() -> Reference {
        Reference::new(&["chr1", "chr2", "HLA-A:01"], &[5000, 2500, 300]).unwrap()
    }

    #[rstest]
    #[case("chr1", QueryType::Ucsc, "chr1", 0, 5000)]
    #[case("chr1:1000-2000", QueryType::Ucsc, "chr1", 1000, 2000)]
    #[case("chr2:1,000-2,500", QueryType::Ucsc, "chr2", 1000, 2500)]
    #[case("HLA-A:01", QueryType::Ucsc, "HLA-A:01", 0, 300)]
    #[case("chr2", QueryType::Bed, "chr2", 0, 2500)]
    #[case("chr1\t0\t1000", QueryType::Bed, "chr1", 0, 1000)]
    #[case("chr1 10 20", QueryType::Bed, "chr1", 10, 20)]
    fn parses_valid_queries(#[case] query: &str, #[case] qt: QueryType, #[case] chrom: &str,
                            #[case] start: u32, #[case] end: u32) {
        let interval = GenomicInterval::parse(&reference(), query, qt).unwrap();
        assert_eq!(interval.chrom().name(), chrom);
        assert_eq!((interval.start(), interval.end()), (start, end));
    }

    #[rstest]
    #[case("", QueryType::Ucsc)]
    #[case("chrX", QueryType::Ucsc)]
    #[case("chr1:2000-1000", QueryType::Ucsc)]
    #[case("chr1:1000-1000", QueryType::Ucsc)]
    #[case("chr1:0-5001", QueryType::Ucsc)]
    #[case("chr1:a-b", QueryType::Ucsc)]
    #[case("chr1\t0\t1000", QueryType::Ucsc)]
    #[case("chr1:0-1000", QueryType::Bed)]
    #[case("chr1\t0", QueryType::Bed)]
    fn rejects_malformed_queries(#[case] query: &str, #[case] qt: QueryType) {
        assert!(GenomicInterval::parse(&reference(), query, qt).is_err());
    }

    #[test]
    fn parses_query_types() {
        assert_eq!("UCSC".parse::<QueryType>().unwrap(), QueryType::Ucsc);
        assert_eq!("BED".parse::<QueryType>().unwrap(), QueryType::Bed);
        assert!("bed".parse::<QueryType>().is_err());
    }

    #[test]
    fn whole_chromosome_interval() {
        let reference = reference();
        let interval = GenomicInterval::whole(reference.find("chr2").unwrap()).unwrap();
        assert_eq!((interval.start(), interval.end()), (0, 2500));
        assert_eq!(interval.span(), 2500);
        assert_eq!(interval.to_string(), "chr2:0-2500");
    }
}
