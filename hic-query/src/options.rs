use serde::Deserialize;

use super::balancing::Normalization;
use super::count::CountType;
use super::errors::{HicError, Result};
use super::genomic_interval::QueryType;

/// Parameters of a pixel query. Missing ranges mean "whole genome".
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    pub range1: Option<String>,
    pub range2: Option<String>,
    pub normalization: String,
    pub count_type: CountType,
    pub query_type: QueryType,
    pub join: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            range1: None,
            range2: None,
            normalization: String::from("NONE"),
            count_type: CountType::Int,
            query_type: QueryType::Ucsc,
            join: false,
        }
    }
}

impl FetchOptions {
    pub fn new() -> FetchOptions {
        FetchOptions::default()
    }

    pub fn with_range(mut self, range: &str) -> FetchOptions {
        self.range1 = Some(range.to_string());
        self.range2 = None;
        self
    }

    pub fn with_ranges(mut self, range1: &str, range2: &str) -> FetchOptions {
        self.range1 = Some(range1.to_string());
        self.range2 = Some(range2.to_string());
        self
    }

    pub fn with_normalization(mut self, normalization: &str) -> FetchOptions {
        self.normalization = normalization.to_string();
        self
    }

    pub fn with_count_type(mut self, count_type: CountType) -> FetchOptions {
        self.count_type = count_type;
        self
    }

    pub fn with_query_type(mut self, query_type: QueryType) -> FetchOptions {
        self.query_type = query_type;
        self
    }

    pub fn joined(mut self, join: bool) -> FetchOptions {
        self.join = join;
        self
    }

    pub fn normalization(&self) -> Normalization {
        Normalization::new(&self.normalization)
    }

    /// Normalized counts are always floating point.
    pub fn effective_count_type(&self) -> CountType {
        if self.normalization().is_none() { self.count_type } else { CountType::Float }
    }

    /// `None` for genome-wide queries, otherwise both ranges with `range2` defaulting to `range1`.
    pub fn resolve_ranges(&self) -> Result<Option<(&str, &str)>> {
        let range1 = self.range1.as_deref().filter(|s| !s.is_empty());
        let range2 = self.range2.as_deref().filter(|s| !s.is_empty());
        match (range1, range2) {
            (None, None) => Ok(None),
            (None, Some(_)) => Err(HicError::InvalidArgument(String::from(
                "range2 cannot be specified without range1"
            ))),
            (Some(r1), None) => Ok(Some((r1, r1))),
            (Some(r1), Some(r2)) => Ok(Some((r1, r2))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_to_raw_genome_wide_query() {
        let opts = FetchOptions::new();
        assert_eq!(opts.resolve_ranges().unwrap(), None);
        assert_eq!(opts.effective_count_type(), CountType::Int);
        assert_eq!(opts.query_type, QueryType::Ucsc);
        assert!(!opts.join);
    }

    #[test]
    fn normalization_forces_float_counts() {
        let opts = FetchOptions::new().with_normalization("weight").with_count_type(CountType::Int);
        assert_eq!(opts.effective_count_type(), CountType::Float);
    }

    #[test]
    fn range2_defaults_to_range1() {
        let opts = FetchOptions::new().with_range("chr1");
        assert_eq!(opts.resolve_ranges().unwrap(), Some(("chr1", "chr1")));

        let opts = FetchOptions::new().with_ranges("chr1", "");
        assert_eq!(opts.resolve_ranges().unwrap(), Some(("chr1", "chr1")));

        let opts = FetchOptions { range2: Some(String::from("chr2")), ..FetchOptions::default() };
        assert!(opts.resolve_ranges().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let opts: FetchOptions = serde_json::from_str(
            r#"{"range1": "chr1:0-1000", "normalization": "KR", "query_type": "BED", "count_type": "float"}"#
        ).unwrap();
        assert_eq!(opts.range1.as_deref(), Some("chr1:0-1000"));
        assert_eq!(opts.range2, None);
        assert_eq!(opts.query_type, QueryType::Bed);
        assert_eq!(opts.count_type, CountType::Float);
        assert!(!opts.join);
    }
}
