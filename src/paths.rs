//! Path helpers for links between generated pages.

use std::path::{Component, Path};

/// Forward-slash link from directory `from_dir` to file `to`. Both paths must
/// share a root (they are both inside the output tree).
pub fn relative_link(from_dir: &Path, to: &Path) -> String {
    let from: Vec<Component> = from_dir.components().collect();
    let to: Vec<Component> = to.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// `../` repeated once per directory between `page` and `root`.
pub fn up_prefix(root: &Path, page: &Path) -> String {
    let depth = page
        .parent()
        .and_then(|dir| dir.strip_prefix(root).ok())
        .map(|rel| rel.components().count())
        .unwrap_or(0);
    "../".repeat(depth)
}
