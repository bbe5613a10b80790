use std::fmt;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AttrValue::Int(v) => write!(f, "{}", v),
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

/// Ordered, named attribute list. Optional attributes missing from the file are absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Attributes {
        Attributes { entries: Vec::new() }
    }

    pub fn push<V: Into<AttrValue>>(&mut self, name: &str, value: V) {
        self.entries.push((name.to_string(), value.into()));
    }

    pub fn push_opt<V: Into<AttrValue>>(&mut self, name: &str, value: Option<V>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<(String, AttrValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_skips_missing() {
        let mut attrs = Attributes::new();
        attrs.push("bin-size", 1000_i64);
        attrs.push("format", "HDF5::Cooler");
        attrs.push_opt::<String>("assembly", None);
        attrs.push_opt("sum", Some(12.5));

        assert_eq!(attrs.names(), vec!["bin-size", "format", "sum"]);
        assert_eq!(attrs.get("bin-size"), Some(&AttrValue::Int(1000)));
        assert_eq!(attrs.get("assembly"), None);
        assert_eq!(attrs.get("sum").unwrap().to_string(), "12.5");
    }
}
