/*!
 * Directory tree capture
 *
 * The tree is read with a single depth-first walk and rebuilt with an explicit
 * stack of open directories, so recursion depth never follows tree depth.
 * Symlinks are classified by the link itself and never followed, which keeps
 * link cycles from being traversed.
 */

use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::FilesystemError;
use crate::types::{DirEntry, FileEntry, TreeNode};

/// Reads a directory into an in-memory [`TreeNode`] snapshot
#[derive(Debug, Clone, Default)]
pub struct TreeReader {
    /// Sort siblings by name instead of keeping directory listing order
    sort_entries: bool,
}

impl TreeReader {
    /// Create a reader that keeps platform listing order
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort siblings by file name for reproducible output across platforms
    pub fn sort_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    /// Capture the immediate children of `root` and, recursively, their contents
    pub fn read(&self, root: &Path) -> Result<Vec<TreeNode>, FilesystemError> {
        let mut walker = WalkDir::new(root).follow_links(false);
        if self.sort_entries {
            walker = walker.sort_by_file_name();
        }
        let mut entries = walker.into_iter();

        match entries.next() {
            Some(Ok(entry)) if entry.file_type().is_dir() => {}
            Some(Ok(_)) => {
                return Err(FilesystemError::new(
                    root,
                    io::Error::new(io::ErrorKind::Other, "not a directory"),
                ))
            }
            Some(Err(err)) => return Err(to_filesystem_error(err, root)),
            None => return Ok(Vec::new()),
        }

        // Open directories; the bottom frame collects the root's children
        let mut open: Vec<(String, Vec<TreeNode>)> = vec![(String::new(), Vec::new())];

        for entry in entries {
            let entry = entry.map_err(|err| to_filesystem_error(err, root))?;
            close_until(&mut open, entry.depth());

            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().is_dir() {
                open.push((name, Vec::new()));
            } else if let Some((_, children)) = open.last_mut() {
                children.push(TreeNode::File(FileEntry { name }));
            }
        }

        close_until(&mut open, 1);
        let tree = open.pop().map(|(_, children)| children).unwrap_or_default();
        log::debug!(
            "Captured {} top-level entries under {}",
            tree.len(),
            root.display()
        );
        Ok(tree)
    }
}

/// Read `root` in platform listing order
pub fn read_tree(root: &Path) -> Result<Vec<TreeNode>, FilesystemError> {
    TreeReader::new().read(root)
}

/// Fold finished directories into their parents until `depth` frames remain
fn close_until(open: &mut Vec<(String, Vec<TreeNode>)>, depth: usize) {
    while open.len() > depth.max(1) {
        if let Some((name, children)) = open.pop() {
            if let Some((_, parent)) = open.last_mut() {
                parent.push(TreeNode::Dir(DirEntry { name, children }));
            }
        }
    }
}

fn to_filesystem_error(err: walkdir::Error, root: &Path) -> FilesystemError {
    let path = err.path().unwrap_or(root).to_path_buf();
    FilesystemError::new(path, io::Error::from(err))
}
