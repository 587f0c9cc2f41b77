/*!
 * Core types and data structures for evbgen
 */

use std::path::PathBuf;

/// One entry of a captured directory tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// Regular file, or any non-directory entry such as a symlink
    File(FileEntry),
    /// Directory together with its own captured contents
    Dir(DirEntry),
}

impl TreeNode {
    /// Entry name without any path component
    pub fn name(&self) -> &str {
        match self {
            TreeNode::File(file) => &file.name,
            TreeNode::Dir(dir) => &dir.name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Dir(_))
    }
}

/// Represents a file leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name
    pub name: String,
}

/// Represents a directory in the file system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Directory name
    pub name: String,
    /// Directory contents in listing order
    pub children: Vec<TreeNode>,
}

impl FileEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl DirEntry {
    pub fn new(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

/// Behaviour flags of the virtualization wrapper, embedded as `true`/`false`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvbOptions {
    pub delete_extracted_on_exit: bool,
    pub compress_files: bool,
    pub share_virtual_system: bool,
    pub map_executable_with_temporary_file: bool,
    pub allow_running_of_virtual_exe_files: bool,
}

impl Default for EvbOptions {
    fn default() -> Self {
        Self {
            delete_extracted_on_exit: true,
            compress_files: true,
            share_virtual_system: false,
            map_executable_with_temporary_file: true,
            allow_running_of_virtual_exe_files: true,
        }
    }
}

/// How substituted names and paths are treated before injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escaping {
    /// Inject values verbatim
    #[default]
    None,
    /// Escape `<`, `>`, `&`, `'` and `"`
    Xml,
}

/// Template file overrides; unset roles fall back to the bundled templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplatePaths {
    pub project: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub file: Option<PathBuf>,
}

/// Counters collected while rendering a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// File fragments emitted
    pub files: usize,
    /// Directory fragments emitted
    pub dirs: usize,
    /// Nodes rejected by the filter (descendants of a rejected dir not counted)
    pub skipped: usize,
}
