//! Small cooler files written from scratch with the same layout `cooler` produces.
#![allow(dead_code)]

use std::path::PathBuf;
use std::str::FromStr;

use hdf5::types::VarLenUnicode;
use ndarray::Array1;
use tempfile::TempDir;

pub struct Weight {
    name: &'static str,
    values: Vec<f64>,
    divisive: Option<bool>,
}

/// One cooler group: chromosomes, fixed or variable bins, upper-triangle pixels and weights.
pub struct CoolerFixture {
    chroms: Vec<(&'static str, u32)>,
    bin_size: u32,
    variable_bins: Option<Vec<(i32, i32, i32)>>,
    pixels: Vec<(u64, u64, i32)>,
    float_counts: Option<Vec<f64>>,
    weights: Vec<Weight>,
}

impl CoolerFixture {
    pub fn new(chroms: &[(&'static str, u32)], bin_size: u32) -> CoolerFixture {
        CoolerFixture {
            chroms: chroms.to_vec(),
            bin_size,
            variable_bins: None,
            pixels: Vec::new(),
            float_counts: None,
            weights: Vec::new(),
        }
    }

    /// Bins given as (chrom id, start, end); no `bin-size` attribute is written.
    pub fn variable(chroms: &[(&'static str, u32)], bins: &[(i32, i32, i32)]) -> CoolerFixture {
        CoolerFixture { variable_bins: Some(bins.to_vec()), ..CoolerFixture::new(chroms, 0) }
    }

    pub fn pixels(mut self, pixels: &[(u64, u64, i32)]) -> CoolerFixture {
        self.pixels = pixels.to_vec();
        self.pixels.sort();
        self
    }

    /// Replaces the integer count column with floats, in sorted pixel order.
    pub fn float_counts(mut self, counts: &[f64]) -> CoolerFixture {
        self.float_counts = Some(counts.to_vec());
        self
    }

    pub fn weight(mut self, name: &'static str, values: &[f64], divisive: Option<bool>) -> CoolerFixture {
        self.weights.push(Weight { name, values: values.to_vec(), divisive });
        self
    }

    /// (chrom id, start, end) of every bin.
    pub fn bins(&self) -> Vec<(i32, i32, i32)> {
        if let Some(bins) = &self.variable_bins {
            return bins.clone();
        }
        let mut bins = Vec::new();
        for (id, &(_, size)) in self.chroms.iter().enumerate() {
            let mut start = 0;
            while start < size {
                let end = (start + self.bin_size).min(size);
                bins.push((id as i32, start as i32, end as i32));
                start = end;
            }
        }
        bins
    }

    pub fn write_tables(&self, grp: &hdf5::Group) {
        let chroms = grp.create_group("chroms").unwrap();
        let names: Array1<VarLenUnicode> = self.chroms.iter()
            .map(|(name, _)| VarLenUnicode::from_str(name).unwrap())
            .collect();
        let lengths: Array1<i32> = self.chroms.iter().map(|&(_, size)| size as i32).collect();
        write_dataset(&chroms, "name", &names);
        write_dataset(&chroms, "length", &lengths);

        let bins = self.bins();
        let grp_bins = grp.create_group("bins").unwrap();
        write_dataset(&grp_bins, "chrom", &bins.iter().map(|b| b.0).collect::<Array1<i32>>());
        write_dataset(&grp_bins, "start", &bins.iter().map(|b| b.1).collect::<Array1<i32>>());
        write_dataset(&grp_bins, "end", &bins.iter().map(|b| b.2).collect::<Array1<i32>>());
        for weight in &self.weights {
            let dts = grp_bins.new_dataset_builder()
                .with_data(&Array1::from(weight.values.clone()))
                .create(weight.name)
                .unwrap();
            if let Some(divisive) = weight.divisive {
                dts.new_attr::<bool>().create("divisive_weights").unwrap().write_scalar(&divisive).unwrap();
            }
        }
    }

    pub fn write(&self, grp: &hdf5::Group) {
        self.write_tables(grp);

        let grp_pixels = grp.create_group("pixels").unwrap();
        write_dataset(&grp_pixels, "bin1_id", &self.pixels.iter().map(|p| p.0 as i64).collect::<Array1<i64>>());
        write_dataset(&grp_pixels, "bin2_id", &self.pixels.iter().map(|p| p.1 as i64).collect::<Array1<i64>>());
        match &self.float_counts {
            Some(counts) => write_dataset(&grp_pixels, "count", &Array1::from(counts.clone())),
            None => write_dataset(&grp_pixels, "count", &self.pixels.iter().map(|p| p.2).collect::<Array1<i32>>()),
        }

        let bins = self.bins();
        let bin1_offset: Array1<i64> = (0..=bins.len() as u64)
            .map(|bin| self.pixels.iter().take_while(|p| p.0 < bin).count() as i64)
            .collect();
        let chrom_offset: Array1<i64> = (0..=self.chroms.len() as i32)
            .map(|chrom| bins.iter().take_while(|b| b.0 < chrom).count() as i64)
            .collect();
        let grp_indexes = grp.create_group("indexes").unwrap();
        write_dataset(&grp_indexes, "bin1_offset", &bin1_offset);
        write_dataset(&grp_indexes, "chrom_offset", &chrom_offset);

        write_str_attr(grp, "format", "HDF5::Cooler");
        write_int_attr(grp, "format-version", 3);
        if self.variable_bins.is_some() {
            write_str_attr(grp, "bin-type", "variable");
        } else {
            write_int_attr(grp, "bin-size", self.bin_size as i64);
            write_str_attr(grp, "bin-type", "fixed");
        }
        write_str_attr(grp, "storage-mode", "symmetric-upper");
        write_str_attr(grp, "generated-by", "hic-query tests");
        write_str_attr(grp, "assembly", "test");
        write_int_attr(grp, "nbins", bins.len() as i64);
        write_int_attr(grp, "nchroms", self.chroms.len() as i64);
        write_int_attr(grp, "nnz", self.pixels.len() as i64);
    }
}

pub fn write_dataset<T: hdf5::H5Type>(grp: &hdf5::Group, name: &str, data: &Array1<T>) {
    grp.new_dataset_builder().with_data(data).create(name).unwrap();
}

pub fn write_str_attr(loc: &hdf5::Location, name: &str, value: &str) {
    let value = VarLenUnicode::from_str(value).unwrap();
    loc.new_attr::<VarLenUnicode>().create(name).unwrap().write_scalar(&value).unwrap();
}

pub fn write_int_attr(loc: &hdf5::Location, name: &str, value: i64) {
    loc.new_attr::<i64>().create(name).unwrap().write_scalar(&value).unwrap();
}

/// A file living in its own temporary directory.
pub struct TestFile {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestFile {
    pub fn uri(&self) -> String {
        self.path.display().to_string()
    }
}

fn create(name: &str) -> (TempDir, PathBuf, hdf5::File) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    let file = hdf5::File::create(&path).unwrap();
    (dir, path, file)
}

pub fn write_cool(fixture: &CoolerFixture) -> TestFile {
    let (dir, path, file) = create("test.cool");
    fixture.write(&file);
    TestFile { _dir: dir, path }
}

pub fn write_mcool(fixtures: &[&CoolerFixture]) -> TestFile {
    let (dir, path, file) = create("test.mcool");
    write_str_attr(&file, "format", "HDF5::MCOOL");
    write_int_attr(&file, "format-version", 2);
    let resolutions = file.create_group("resolutions").unwrap();
    for fixture in fixtures {
        let grp = resolutions.create_group(&fixture.bin_size.to_string()).unwrap();
        fixture.write(&grp);
    }
    TestFile { _dir: dir, path }
}

pub fn write_scool(shared: &CoolerFixture, cells: &[(&str, &CoolerFixture)]) -> TestFile {
    let (dir, path, file) = create("test.scool");
    shared.write_tables(&file);
    write_str_attr(&file, "format", "HDF5::SCOOL");
    write_int_attr(&file, "format-version", 1);
    write_int_attr(&file, "bin-size", shared.bin_size as i64);
    write_str_attr(&file, "bin-type", "fixed");
    write_int_attr(&file, "ncells", cells.len() as i64);
    let grp_cells = file.create_group("cells").unwrap();
    for (name, fixture) in cells {
        let grp = grp_cells.create_group(name).unwrap();
        fixture.write(&grp);
    }
    TestFile { _dir: dir, path }
}

pub const CHROMS: [(&str, u32); 2] = [("chr1", 5000), ("chr2", 3000)];

/// chr1: bins 0..5, chr2: bins 5..8 at 1 kb.
///
/// The chr1 x chr1 block holds exactly (0,0,1), (0,1,2) and (2,3,5).
pub fn two_chroms() -> CoolerFixture {
    CoolerFixture::new(&CHROMS, 1000)
        .pixels(&[
            (0, 0, 1), (0, 1, 2), (0, 5, 4),
            (1, 6, 6),
            (2, 3, 5), (2, 5, 1),
            (5, 5, 7), (5, 7, 8),
        ])
        .weight("weight", &[1.0, 0.5, 2.0, f64::NAN, 1.0, 1.0, 2.0, 0.5], None)
        .weight("KR", &[2.0; 8], None)
        .weight("VC", &[2.0; 8], Some(false))
}

/// Same genome at 2.5 kb: chr1 bins 0..2, chr2 bins 2..4.
pub fn two_chroms_coarse() -> CoolerFixture {
    CoolerFixture::new(&CHROMS, 2500)
        .pixels(&[(0, 0, 3), (0, 1, 5), (0, 2, 4), (2, 3, 15)])
}

/// chr1: [0, 1500) [1500, 2000) [2000, 4000) [4000, 5000); chr2: [0, 2500) [2500, 3000).
pub fn two_chroms_variable() -> CoolerFixture {
    CoolerFixture::variable(&CHROMS, &[(0, 0, 1500), (0, 1500, 2000), (0, 2000, 4000), (0, 4000, 5000),
                                        (1, 0, 2500), (1, 2500, 3000)])
        .pixels(&[
            (0, 0, 1), (0, 1, 2), (0, 3, 3), (0, 4, 9),
            (1, 2, 4), (2, 2, 5), (2, 5, 6),
            (3, 3, 7), (4, 5, 8),
        ])
}
