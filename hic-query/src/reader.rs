use std::path::Path;

use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use log::debug;
use ndarray::{s, Array1};

use super::attributes::{AttrValue, Attributes};
use super::balancing::{WeightType, Weights};
use super::bin_table::{BinTable, BinTableType};
use super::chromosome::Reference;
use super::errors::{HicError, Result};

const BIN_COLUMNS: [&str; 3] = ["chrom", "start", "end"];

/// Read access to one cooler group: the root of a `.cool`, a
/// `/resolutions/<res>` group of a `.mcool` or a `/cells/<cell>` group of a `.scool`.
#[derive(Clone, Debug)]
pub struct CoolerReader {
    root: hdf5::Group,
}

impl CoolerReader {
    pub fn open(file_path: &Path, group: &str) -> Result<CoolerReader> {
        let file = hdf5::File::open(file_path)?;
        debug!("Opening group \"{}\" of {}", group, file_path.display());
        CoolerReader::from_group(file.group(group)?)
    }

    pub fn from_group(root: hdf5::Group) -> Result<CoolerReader> {
        for name in &["chroms", "bins"] {
            if !root.link_exists(name) {
                return Err(HicError::MalformedFile(format!("group \"{}\" has no \"{}\" member", root.name(), name)));
            }
        }
        Ok(CoolerReader { root })
    }

    pub fn get_root(&self) -> &hdf5::Group {
        &self.root
    }

    pub fn read_chroms(&self) -> Result<Reference> {
        let grp = self.root.group("chroms")?;
        let names = read_strings(&grp.dataset("name")?)?;
        let lengths = grp.dataset("length")?.read_raw::<u32>()?;
        Reference::new(&names, &lengths)
    }

    pub fn read_bin_table(&self, reference: Reference) -> Result<BinTable> {
        let bin_type = match read_attr(&self.root, "bin-type") {
            Some(AttrValue::Str(ref s)) if s == "variable" => BinTableType::Variable,
            _ => BinTableType::Fixed,
        };

        if bin_type == BinTableType::Fixed {
            if let Some(bin_size) = self.read_bin_size()? {
                return BinTable::fixed(reference, bin_size);
            }
        }

        let grp = self.root.group("bins")?;
        BinTable::variable(
            reference,
            read_dataset::<u32>(&grp, "chrom")?,
            read_dataset::<u32>(&grp, "start")?,
            read_dataset::<u32>(&grp, "end")?,
        )
    }

    /// `bin-size` attribute, falling back to the width of the first bin.
    pub fn read_bin_size(&self) -> Result<Option<u32>> {
        match read_attr(&self.root, "bin-size") {
            Some(AttrValue::Int(v)) if v > 0 => return Ok(Some(v as u32)),
            Some(AttrValue::Str(ref s)) if s == "variable" => return Ok(None),
            _ => {}
        }

        let grp = self.root.group("bins")?;
        if grp.dataset("start")?.size() == 0 {
            return Ok(None);
        }
        let start = read_dataset_slice::<u32>(&grp, "start", 0, 1)?;
        let end = read_dataset_slice::<u32>(&grp, "end", 0, 1)?;
        match end[0].checked_sub(start[0]) {
            Some(width) if width > 0 => Ok(Some(width)),
            _ => Err(HicError::MalformedFile(format!(
                "first bin has start {} and end {}", start[0], end[0]
            ))),
        }
    }

    pub fn get_n_pixels(&self) -> Result<usize> {
        let grp = self.root.group("pixels")?;
        Ok(grp.dataset("bin1_id")?.size())
    }

    pub fn read_bin_offsets(&self) -> Result<Array1<u64>> {
        let grp = self.root.group("indexes")?;
        read_dataset::<u64>(&grp, "bin1_offset")
    }

    pub fn read_pixel_chunk(&self, start: usize, end: usize) -> Result<(Array1<u64>, Array1<u64>, Array1<f64>)> {
        let grp = self.root.group("pixels")?;
        let bin1 = read_dataset_slice::<u64>(&grp, "bin1_id", start, end)?;
        let bin2 = read_dataset_slice::<u64>(&grp, "bin2_id", start, end)?;
        let count = read_dataset_slice::<f64>(&grp, "count", start, end)?;
        Ok((bin1, bin2, count))
    }

    /// Floating-point vectors stored next to the bin table.
    pub fn avail_normalizations(&self) -> Result<Vec<String>> {
        let grp = self.root.group("bins")?;
        let mut norms = Vec::new();
        for name in grp.member_names()? {
            if BIN_COLUMNS.contains(&name.as_str()) {
                continue;
            }
            let is_float = grp.dataset(&name)
                .and_then(|dts| dts.dtype())
                .and_then(|dtype| dtype.to_descriptor())
                .map(|desc| matches!(desc, TypeDescriptor::Float(_)))
                .unwrap_or(false);
            if is_float {
                norms.push(name);
            }
        }
        norms.sort();
        Ok(norms)
    }

    pub fn read_weights(&self, name: &str) -> Result<Weights> {
        let grp = self.root.group("bins")?;
        if BIN_COLUMNS.contains(&name) || !grp.link_exists(name) {
            return Err(HicError::UnknownNormalization(name.to_string()));
        }

        let dts = grp.dataset(name)?;
        let kind = match read_attr(&dts, "divisive_weights") {
            Some(AttrValue::Int(0)) => WeightType::Multiplicative,
            Some(AttrValue::Int(_)) => WeightType::Divisive,
            _ => WeightType::infer(name),
        };
        Ok(Weights::new(dts.read_1d::<f64>()?, kind))
    }

    pub fn read_attr(&self, name: &str) -> Option<AttrValue> {
        read_attr(&self.root, name)
    }

    /// Cooler attributes, in the order the file format documents them.
    pub fn read_attributes(&self, bins: &BinTable) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.push("bin-size", bins.bin_size() as i64);
        attrs.push("bin-type", bins.bin_type().to_string());
        attrs.push("format", self.read_attr("format").unwrap_or_else(|| AttrValue::from("HDF5::Cooler")));
        attrs.push("format-version", self.read_attr("format-version").unwrap_or(AttrValue::Int(3)));
        for name in &["storage-mode", "creation-date", "generated-by", "assembly", "metadata", "format-url",
                      "nbins", "nchroms", "nnz", "sum", "cis"] {
            attrs.push_opt(name, self.read_attr(name));
        }
        attrs
    }
}

/// Scalar attribute of any object, or `None` when missing or of an unsupported type.
pub fn read_attr(loc: &hdf5::Location, name: &str) -> Option<AttrValue> {
    let attr = loc.attr(name).ok()?;
    match attr.dtype().and_then(|dtype| dtype.to_descriptor()).ok()? {
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => attr.read_scalar::<i64>().ok().map(AttrValue::Int),
        TypeDescriptor::Boolean => attr.read_scalar::<bool>().ok().map(|b| AttrValue::Int(b as i64)),
        TypeDescriptor::Enum(_) => attr.read_scalar::<i8>().ok().map(|b| AttrValue::Int(b as i64)),
        TypeDescriptor::Float(_) => attr.read_scalar::<f64>().ok().map(AttrValue::Float),
        TypeDescriptor::VarLenUnicode => attr.read_scalar::<VarLenUnicode>().ok().map(|s| AttrValue::from(s.as_str())),
        TypeDescriptor::VarLenAscii => attr.read_scalar::<VarLenAscii>().ok().map(|s| AttrValue::from(s.as_str())),
        TypeDescriptor::FixedAscii(_) => attr.read_scalar::<FixedAscii<256>>().ok().map(|s| AttrValue::from(s.as_str())),
        TypeDescriptor::FixedUnicode(_) => attr.read_scalar::<FixedUnicode<256>>().ok().map(|s| AttrValue::from(s.as_str())),
        _ => None,
    }
}

pub fn read_strings(dts: &hdf5::Dataset) -> Result<Vec<String>> {
    let names = match dts.dtype()?.to_descriptor()? {
        TypeDescriptor::VarLenUnicode => dts.read_raw::<VarLenUnicode>()?.iter().map(|s| s.as_str().to_string()).collect(),
        TypeDescriptor::VarLenAscii => dts.read_raw::<VarLenAscii>()?.iter().map(|s| s.as_str().to_string()).collect(),
        TypeDescriptor::FixedAscii(_) => dts.read_raw::<FixedAscii<256>>()?.iter().map(|s| s.as_str().to_string()).collect(),
        TypeDescriptor::FixedUnicode(_) => dts.read_raw::<FixedUnicode<256>>()?.iter().map(|s| s.as_str().to_string()).collect(),
        other => return Err(HicError::MalformedFile(format!("expected strings in {}, found {:?}", dts.name(), other))),
    };
    Ok(names)
}

pub fn read_dataset_slice<T: hdf5::H5Type>(grp: &hdf5::Group, name: &str, start: usize, end: usize)
                                           -> Result<Array1<T>> {
    let dts = grp.dataset(name)?;
    Ok(dts.read_slice_1d(s![start..end])?)
}

pub fn read_dataset<T: hdf5::H5Type>(grp: &hdf5::Group, name: &str) -> Result<Array1<T>> {
    let dts = grp.dataset(name)?;
    Ok(dts.read_1d::<T>()?)
}
