/*!
 * Utility functions for evbgen
 */

use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::types::TreeNode;

/// Resolve `path` against the current directory and fold `.`/`..` lexically.
///
/// The filesystem is not consulted, so the path does not need to exist.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Count every node of a captured tree, descendants included
pub fn count_nodes(tree: &[TreeNode]) -> u64 {
    let mut count = 0;
    let mut pending: Vec<&[TreeNode]> = vec![tree];
    while let Some(level) = pending.pop() {
        for node in level {
            count += 1;
            if let TreeNode::Dir(dir) = node {
                pending.push(&dir.children);
            }
        }
    }
    count
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
