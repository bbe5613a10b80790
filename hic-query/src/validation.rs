//! Format sniffing. None of these predicates fail: unreadable input is simply "not a match".

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::attributes::AttrValue;
use super::reader::read_attr;
use super::uri::parse_cooler_uri;

const HIC_MAGIC: &[u8; 4] = b"HIC\0";

fn format_attr(loc: &hdf5::Location) -> Option<String> {
    match read_attr(loc, "format") {
        Some(AttrValue::Str(s)) => Some(s),
        _ => None,
    }
}

fn has_members(grp: &hdf5::Group, names: &[&str]) -> bool {
    names.iter().all(|name| grp.link_exists(name))
}

/// Accepts plain paths as well as `path::/group` URIs.
pub fn is_cooler(uri: &str) -> bool {
    let (path, group) = parse_cooler_uri(uri);
    let grp = match hdf5::File::open(&path).and_then(|f| f.group(&group)) {
        Ok(grp) => grp,
        Err(_) => return false,
    };

    if let Some(format) = format_attr(&grp) {
        if format != "HDF5::Cooler" {
            return false;
        }
    }
    has_members(&grp, &["chroms", "bins", "pixels", "indexes"])
}

pub fn is_multires_file<P: AsRef<Path>>(path: P) -> bool {
    let file = match hdf5::File::open(path.as_ref()) {
        Ok(f) => f,
        Err(_) => return false,
    };

    match format_attr(&file) {
        Some(format) => format == "HDF5::MCOOL",
        None => file.group("resolutions")
            .and_then(|grp| grp.member_names())
            .map(|names| !names.is_empty())
            .unwrap_or(false),
    }
}

pub fn is_scool_file<P: AsRef<Path>>(path: P) -> bool {
    let file = match hdf5::File::open(path.as_ref()) {
        Ok(f) => f,
        Err(_) => return false,
    };

    match format_attr(&file) {
        Some(format) => format == "HDF5::SCOOL",
        None => has_members(&file, &["chroms", "bins", "cells"]),
    }
}

pub fn is_hic_file<P: AsRef<Path>>(path: P) -> bool {
    let mut magic = [0_u8; 4];
    File::open(path.as_ref())
        .and_then(|mut f| f.read_exact(&mut magic))
        .map(|_| &magic == HIC_MAGIC)
        .unwrap_or(false)
}
