use std::path::PathBuf;

/// Splits a cooler URI (`path/to/file.mcool::/resolutions/1000`) into file path and group.
pub fn parse_cooler_uri(uri: &str) -> (PathBuf, String) {
    match uri.rfind("::") {
        Some(i) => {
            let group = &uri[i + 2..];
            let group = if group.starts_with('/') { group.to_string() } else { format!("/{}", group) };
            (PathBuf::from(&uri[..i]), group)
        }
        None => (PathBuf::from(uri), String::from("/")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_group_from_path() {
        assert_eq!(parse_cooler_uri("a.cool"), (PathBuf::from("a.cool"), String::from("/")));
        assert_eq!(
            parse_cooler_uri("data/a.mcool::/resolutions/100"),
            (PathBuf::from("data/a.mcool"), String::from("/resolutions/100"))
        );
        assert_eq!(
            parse_cooler_uri("a.scool::cells/c1"),
            (PathBuf::from("a.scool"), String::from("/cells/c1"))
        );
    }
}
