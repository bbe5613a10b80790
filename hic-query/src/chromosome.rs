use ahash::AHashMap;

use super::errors::{HicError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chromosome {
    id: u32,
    name: String,
    size: u32,
}

impl Chromosome {
    pub fn new(id: u32, name: &str, size: u32) -> Chromosome {
        Chromosome { id, name: name.to_string(), size }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Some files carry a synthetic "All" chromosome spanning the genome.
    pub fn is_all(&self) -> bool {
        self.name.eq_ignore_ascii_case("all")
    }
}

/// Ordered set of chromosomes, as stored in the `chroms` group.
#[derive(Clone, Debug, Default)]
pub struct Reference {
    chroms: Vec<Chromosome>,
    name2id: AHashMap<String, usize>,
}

impl Reference {
    pub fn new<S: AsRef<str>>(names: &[S], sizes: &[u32]) -> Result<Reference> {
        if names.len() != sizes.len() {
            return Err(HicError::MalformedFile(format!(
                "found {} chromosome names but {} chromosome sizes", names.len(), sizes.len()
            )));
        }

        let mut chroms = Vec::with_capacity(names.len());
        let mut name2id = AHashMap::default();
        for (i, (name, &size)) in names.iter().zip(sizes.iter()).enumerate() {
            let name = name.as_ref();
            if name2id.insert(name.to_string(), i).is_some() {
                return Err(HicError::MalformedFile(format!("duplicate chromosome \"{}\"", name)));
            }
            chroms.push(Chromosome::new(i as u32, name, size));
        }

        Ok(Reference { chroms, name2id })
    }

    pub fn len(&self) -> usize {
        self.chroms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chroms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<Chromosome> {
        self.chroms.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Chromosome> {
        self.chroms.get(id as usize)
    }

    pub fn find(&self, name: &str) -> Result<&Chromosome> {
        self.name2id
            .get(name)
            .map(|&i| &self.chroms[i])
            .ok_or_else(|| HicError::UnknownChromosome(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.chroms.iter().map(|c| c.name()).collect()
    }
}
