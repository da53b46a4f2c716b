//! Item name lists
//!
//! Names given on the command line are either payload file names
//! (`123456.wem`, `sounds/123456.wem`) or `[list.txt]`, which stands for every
//! whitespace-separated name in `list.txt`.

use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// Names read from a list file: split on whitespace, no comments
pub fn names_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(&path)?;
    let names: Vec<String> = content.split_whitespace().map(str::to_string).collect();
    debug!("Read {} names from {:?}", names.len(), path.as_ref());
    Ok(names)
}

/// Expand every `[file]` argument into the names listed in `file`
pub fn expand_item_list<S: AsRef<str>>(items: &[S]) -> Result<Vec<String>> {
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        let item = item.as_ref();
        match item.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            Some(list_file) => result.extend(names_from_file(list_file)?),
            None => result.push(item.to_string()),
        }
    }
    Ok(result)
}

/// Item id named by a payload file: its file stem
///
/// `"sounds/123456.wem"` and `"123456"` both name item `"123456"`.
pub fn item_id(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

/// File name an extracted payload is written to
pub fn payload_file_name(id: &str, extension: &str) -> String {
    format!("{}.{}", id, extension)
}
